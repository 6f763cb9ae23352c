//! 徽章仓储
//!
//! 提供用户徽章的授予、查询与撤销

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::traits::BadgeRepositoryTrait;
use crate::error::{DataError, Result};
use crate::models::{Badge, NewBadge};

/// 徽章仓储
pub struct BadgeRepository {
    pool: PgPool,
}

impl BadgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 授予徽章，返回新记录的 ID
    pub async fn award(&self, new_badge: &NewBadge) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO badges (uid, name, metadata_json)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_badge.uid)
        .bind(&new_badge.name)
        .bind(&new_badge.metadata_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// 根据 ID 获取徽章
    pub async fn get(&self, id: i64) -> Result<Option<Badge>> {
        let badge = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, uid, name, metadata_json, awarded
            FROM badges
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(badge)
    }

    /// 按授予时间倒序列出用户的全部徽章
    pub async fn list_for_user(&self, uid: i64) -> Result<Vec<Badge>> {
        let badges = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, uid, name, metadata_json, awarded
            FROM badges
            WHERE uid = $1
            ORDER BY awarded DESC
            "#,
        )
        .bind(uid)
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    /// 检查用户是否已持有指定名称的徽章
    pub async fn has_badge(&self, uid: i64, name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM badges WHERE uid = $1 AND name = $2)
            "#,
        )
        .bind(uid)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// 撤销徽章
    ///
    /// 徽章是可收回的奖励记录，撤销即物理删除
    pub async fn remove(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM badges WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "badge",
                id,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl BadgeRepositoryTrait for BadgeRepository {
    async fn award(&self, new_badge: &NewBadge) -> Result<i64> {
        self.award(new_badge).await
    }

    async fn get(&self, id: i64) -> Result<Option<Badge>> {
        self.get(id).await
    }

    async fn list_for_user(&self, uid: i64) -> Result<Vec<Badge>> {
        self.list_for_user(uid).await
    }

    async fn has_badge(&self, uid: i64, name: &str) -> Result<bool> {
        self.has_badge(uid, name).await
    }

    async fn remove(&self, id: i64) -> Result<()> {
        self.remove(id).await
    }
}
