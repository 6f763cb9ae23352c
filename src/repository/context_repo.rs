//! 上下文仓储
//!
//! 提供上下文的创建、查询、随机分发与使用计数

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::traits::ContextRepositoryTrait;
use crate::error::{DataError, Result};
use crate::models::{Context, NewContext};

/// 上下文仓储
pub struct ContextRepository {
    pool: PgPool,
}

impl ContextRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 创建与查询 ====================

    /// 创建上下文，返回新记录的 ID
    pub async fn create(&self, new_context: &NewContext) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO contexts (r_realid, context_json, metadata_json, tag, total_used)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id
            "#,
        )
        .bind(new_context.r_realid)
        .bind(&new_context.context_json)
        .bind(&new_context.metadata_json)
        .bind(&new_context.tag)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// 根据 ID 获取上下文
    pub async fn get(&self, id: i64) -> Result<Option<Context>> {
        let context = sqlx::query_as::<_, Context>(
            r#"
            SELECT id, r_realid, context_json, metadata_json, tag, total_used,
                   created_at, updated_at
            FROM contexts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(context)
    }

    /// 在指定轮次内均匀随机取一个上下文
    ///
    /// 用于给写手分发创作素材；轮次下无上下文时返回 None
    pub async fn get_random_for_round(&self, round_id: i64) -> Result<Option<Context>> {
        let context = sqlx::query_as::<_, Context>(
            r#"
            SELECT id, r_realid, context_json, metadata_json, tag, total_used,
                   created_at, updated_at
            FROM contexts
            WHERE r_realid = $1
            ORDER BY RANDOM()
            LIMIT 1
            "#,
        )
        .bind(round_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(context)
    }

    /// 列出指定轮次的全部上下文
    pub async fn list_for_round(&self, round_id: i64) -> Result<Vec<Context>> {
        let contexts = sqlx::query_as::<_, Context>(
            r#"
            SELECT id, r_realid, context_json, metadata_json, tag, total_used,
                   created_at, updated_at
            FROM contexts
            WHERE r_realid = $1
            ORDER BY id ASC
            "#,
        )
        .bind(round_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contexts)
    }

    // ==================== 计数器 ====================

    /// 被用于创作的次数 +1
    pub async fn increment_total_used(&self, context_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE contexts
            SET total_used = total_used + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(context_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "context",
                id: context_id,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ContextRepositoryTrait for ContextRepository {
    async fn create(&self, new_context: &NewContext) -> Result<i64> {
        self.create(new_context).await
    }

    async fn get(&self, id: i64) -> Result<Option<Context>> {
        self.get(id).await
    }

    async fn get_random_for_round(&self, round_id: i64) -> Result<Option<Context>> {
        self.get_random_for_round(round_id).await
    }

    async fn list_for_round(&self, round_id: i64) -> Result<Vec<Context>> {
        self.list_for_round(round_id).await
    }

    async fn increment_total_used(&self, context_id: i64) -> Result<()> {
        self.increment_total_used(context_id).await
    }
}
