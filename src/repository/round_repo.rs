//! 轮次仓储
//!
//! 提供轮次查询与本轮统计计数器的维护。
//! 轮次的创建与推进由任务管理侧负责，不在本层。

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::RoundRepositoryTrait;
use crate::error::{DataError, Result};
use crate::models::Round;

/// 轮次仓储
pub struct RoundRepository {
    pool: PgPool,
}

impl RoundRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    /// 根据 ID 获取轮次
    pub async fn get(&self, id: i64) -> Result<Option<Round>> {
        let round = sqlx::query_as::<_, Round>(
            r#"
            SELECT id, tid, rid, total_collected, total_fooled,
                   total_verified_fooled, created_at, updated_at
            FROM rounds
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(round)
    }

    /// 获取任务内指定序号的轮次
    pub async fn get_for_task(&self, task_id: i64, round_number: i32) -> Result<Option<Round>> {
        let round = sqlx::query_as::<_, Round>(
            r#"
            SELECT id, tid, rid, total_collected, total_fooled,
                   total_verified_fooled, created_at, updated_at
            FROM rounds
            WHERE tid = $1 AND rid = $2
            "#,
        )
        .bind(task_id)
        .bind(round_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(round)
    }

    /// 按序号列出任务的全部轮次
    pub async fn list_for_task(&self, task_id: i64) -> Result<Vec<Round>> {
        let rounds = sqlx::query_as::<_, Round>(
            r#"
            SELECT id, tid, rid, total_collected, total_fooled,
                   total_verified_fooled, created_at, updated_at
            FROM rounds
            WHERE tid = $1
            ORDER BY rid ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rounds)
    }

    // ==================== 统计计数器 ====================

    /// 本轮采集样例数 +1
    pub async fn increment_collected(&self, round_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE rounds
            SET total_collected = total_collected + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(round_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "round",
                id: round_id,
            });
        }

        Ok(())
    }

    /// 本轮骗过模型样例数 +1
    pub async fn increment_fooled(&self, round_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE rounds
            SET total_fooled = total_fooled + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(round_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "round",
                id: round_id,
            });
        }

        Ok(())
    }

    /// 本轮经人工确认骗过模型的样例数 +1
    pub async fn increment_verified_fooled(&self, round_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE rounds
            SET total_verified_fooled = total_verified_fooled + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(round_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "round",
                id: round_id,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl RoundRepositoryTrait for RoundRepository {
    async fn get(&self, id: i64) -> Result<Option<Round>> {
        self.get(id).await
    }

    async fn get_for_task(&self, task_id: i64, round_number: i32) -> Result<Option<Round>> {
        self.get_for_task(task_id, round_number).await
    }

    async fn list_for_task(&self, task_id: i64) -> Result<Vec<Round>> {
        self.list_for_task(task_id).await
    }

    async fn increment_collected(&self, round_id: i64) -> Result<()> {
        self.increment_collected(round_id).await
    }

    async fn increment_fooled(&self, round_id: i64) -> Result<()> {
        self.increment_fooled(round_id).await
    }

    async fn increment_verified_fooled(&self, round_id: i64) -> Result<()> {
        self.increment_verified_fooled(round_id).await
    }
}
