//! 样例仓储
//!
//! 提供样例的创建、验证候选选取、验证计数与数据导出。
//! 所有写操作都是单条语句，随语句提交生效；计数器一律使用
//! 数据库侧相对更新，避免并发下的读改写丢失。

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};

use super::traits::ExampleRepositoryTrait;
use crate::error::{DataError, Result};
use crate::models::{Context, Example, ExampleSplit, NewExample};

/// 样例仓储
pub struct ExampleRepository {
    pool: PgPool,
}

impl ExampleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 创建与查询 ====================

    /// 创建样例
    ///
    /// 新样例总是以未撤回、未举报、未验证、未划分、计数器全零入库，
    /// 返回新记录的 ID
    pub async fn create(&self, new_example: &NewExample) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO examples (
                cid, uid, model_wrong, model_endpoint_name, input_json, output_json,
                metadata_json, tag, retracted, flagged, verified, split,
                total_verified, verified_correct, verified_incorrect, verified_flagged
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, FALSE, FALSE, $9, 0, 0, 0, 0)
            RETURNING id
            "#,
        )
        .bind(new_example.cid)
        .bind(new_example.uid)
        .bind(new_example.model_wrong)
        .bind(&new_example.model_endpoint_name)
        .bind(&new_example.input_json)
        .bind(&new_example.output_json)
        .bind(&new_example.metadata_json)
        .bind(&new_example.tag)
        .bind(ExampleSplit::Undecided)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// 根据 ID 获取样例
    pub async fn get(&self, id: i64) -> Result<Option<Example>> {
        let example = sqlx::query_as::<_, Example>(
            r#"
            SELECT id, cid, uid, model_wrong, model_endpoint_name, input_json,
                   output_json, metadata_json, tag, retracted, flagged, verified,
                   split, total_verified, verified_correct, verified_incorrect,
                   verified_flagged, created_at, updated_at
            FROM examples
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(example)
    }

    // ==================== 验证候选选取 ====================

    /// 在指定轮次内随机选取一个待验证样例
    ///
    /// 候选条件：创建者不是验证者本人、未撤回、验证次数未达配额。
    /// 随机性由数据库保证（均匀分布）；无候选时返回 None，不是错误。
    /// 选取不做任何预留，同一样例可能被并发分配给多个验证者。
    pub async fn next_to_validate(
        &self,
        round_id: i64,
        validator_uid: i64,
        quota: i32,
    ) -> Result<Option<Example>> {
        let example = sqlx::query_as::<_, Example>(
            r#"
            SELECT e.id, e.cid, e.uid, e.model_wrong, e.model_endpoint_name,
                   e.input_json, e.output_json, e.metadata_json, e.tag, e.retracted,
                   e.flagged, e.verified, e.split, e.total_verified,
                   e.verified_correct, e.verified_incorrect, e.verified_flagged,
                   e.created_at, e.updated_at
            FROM examples e
            JOIN contexts c ON e.cid = c.id
            WHERE c.r_realid = $1
              AND e.uid != $2
              AND e.retracted = FALSE
              AND e.total_verified < $3
            ORDER BY RANDOM()
            LIMIT 1
            "#,
        )
        .bind(round_id)
        .bind(validator_uid)
        .bind(quota)
        .fetch_optional(&self.pool)
        .await?;

        Ok(example)
    }

    /// 在指定轮次内随机选取一个骗过模型的待验证样例
    ///
    /// 与 next_to_validate 相同的候选条件，再加 model_wrong = TRUE
    pub async fn next_fooling_to_validate(
        &self,
        round_id: i64,
        validator_uid: i64,
        quota: i32,
    ) -> Result<Option<Example>> {
        let example = sqlx::query_as::<_, Example>(
            r#"
            SELECT e.id, e.cid, e.uid, e.model_wrong, e.model_endpoint_name,
                   e.input_json, e.output_json, e.metadata_json, e.tag, e.retracted,
                   e.flagged, e.verified, e.split, e.total_verified,
                   e.verified_correct, e.verified_incorrect, e.verified_flagged,
                   e.created_at, e.updated_at
            FROM examples e
            JOIN contexts c ON e.cid = c.id
            WHERE c.r_realid = $1
              AND e.uid != $2
              AND e.retracted = FALSE
              AND e.total_verified < $3
              AND e.model_wrong = TRUE
            ORDER BY RANDOM()
            LIMIT 1
            "#,
        )
        .bind(round_id)
        .bind(validator_uid)
        .bind(quota)
        .fetch_optional(&self.pool)
        .await?;

        Ok(example)
    }

    // ==================== 验证计数器 ====================

    /// 累计验证次数 +1
    pub async fn increment_total_verified(&self, example_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE examples
            SET total_verified = total_verified + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(example_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "example",
                id: example_id,
            });
        }

        Ok(())
    }

    /// 判定为正确的次数 +1
    pub async fn increment_verified_correct(&self, example_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE examples
            SET verified_correct = verified_correct + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(example_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "example",
                id: example_id,
            });
        }

        Ok(())
    }

    /// 判定为错误的次数 +1
    pub async fn increment_verified_incorrect(&self, example_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE examples
            SET verified_incorrect = verified_incorrect + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(example_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "example",
                id: example_id,
            });
        }

        Ok(())
    }

    /// 被举报的次数 +1
    pub async fn increment_verified_flagged(&self, example_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE examples
            SET verified_flagged = verified_flagged + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(example_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "example",
                id: example_id,
            });
        }

        Ok(())
    }

    // ==================== 生命周期 ====================

    /// 标记样例验证结束
    ///
    /// 语句提交后即持久化
    pub async fn mark_verified(&self, example_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE examples
            SET verified = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(example_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "example",
                id: example_id,
            });
        }

        Ok(())
    }

    /// 设置撤回标记
    ///
    /// 撤回是逻辑删除，样例记录保留
    pub async fn set_retracted(&self, example_id: i64, retracted: bool) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE examples
            SET retracted = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(example_id)
        .bind(retracted)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "example",
                id: example_id,
            });
        }

        Ok(())
    }

    /// 设置举报标记
    pub async fn set_flagged(&self, example_id: i64, flagged: bool) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE examples
            SET flagged = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(example_id)
        .bind(flagged)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "example",
                id: example_id,
            });
        }

        Ok(())
    }

    /// 覆盖生成式样例的输入与元数据
    ///
    /// 用于写手对生成内容再编辑后的保存
    pub async fn update_regenerated_content(
        &self,
        example_id: i64,
        input_json: &Value,
        metadata_json: &Value,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE examples
            SET input_json = $2, metadata_json = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(example_id)
        .bind(input_json)
        .bind(metadata_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound {
                entity: "example",
                id: example_id,
            });
        }

        Ok(())
    }

    // ==================== 数据导出 ====================

    /// 导出某任务下指定用户的样例（连同上下文），随机顺序，限量返回
    pub async fn download_for_user(
        &self,
        task_id: i64,
        user_id: i64,
        amount: i64,
    ) -> Result<Vec<(Example, Context)>> {
        let rows = sqlx::query(
            r#"
            SELECT e.id, e.cid, e.uid, e.model_wrong, e.model_endpoint_name,
                   e.input_json, e.output_json, e.metadata_json, e.tag, e.retracted,
                   e.flagged, e.verified, e.split, e.total_verified,
                   e.verified_correct, e.verified_incorrect, e.verified_flagged,
                   e.created_at, e.updated_at,
                   c.id AS ctx_id, c.r_realid AS ctx_r_realid,
                   c.context_json AS ctx_context_json,
                   c.metadata_json AS ctx_metadata_json, c.tag AS ctx_tag,
                   c.total_used AS ctx_total_used, c.created_at AS ctx_created_at,
                   c.updated_at AS ctx_updated_at
            FROM examples e
            JOIN contexts c ON e.cid = c.id
            JOIN rounds r ON c.r_realid = r.id
            WHERE r.tid = $1 AND e.uid = $2
            ORDER BY RANDOM()
            LIMIT $3
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(amount)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::example_with_context).collect()
    }

    /// 导出某任务的全部样例（连同上下文），不限量
    pub async fn download_all(&self, task_id: i64) -> Result<Vec<(Example, Context)>> {
        let rows = sqlx::query(
            r#"
            SELECT e.id, e.cid, e.uid, e.model_wrong, e.model_endpoint_name,
                   e.input_json, e.output_json, e.metadata_json, e.tag, e.retracted,
                   e.flagged, e.verified, e.split, e.total_verified,
                   e.verified_correct, e.verified_incorrect, e.verified_flagged,
                   e.created_at, e.updated_at,
                   c.id AS ctx_id, c.r_realid AS ctx_r_realid,
                   c.context_json AS ctx_context_json,
                   c.metadata_json AS ctx_metadata_json, c.tag AS ctx_tag,
                   c.total_used AS ctx_total_used, c.created_at AS ctx_created_at,
                   c.updated_at AS ctx_updated_at
            FROM examples e
            JOIN contexts c ON e.cid = c.id
            JOIN rounds r ON c.r_realid = r.id
            WHERE r.tid = $1
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::example_with_context).collect()
    }

    /// 从联查结果行解出（样例, 上下文）对
    ///
    /// 上下文列带 ctx_ 前缀，避免与样例列重名
    fn example_with_context(row: &PgRow) -> Result<(Example, Context)> {
        let example = Example::from_row(row)?;
        let context = Context {
            id: row.try_get("ctx_id")?,
            r_realid: row.try_get("ctx_r_realid")?,
            context_json: row.try_get("ctx_context_json")?,
            metadata_json: row.try_get("ctx_metadata_json")?,
            tag: row.try_get("ctx_tag")?,
            total_used: row.try_get("ctx_total_used")?,
            created_at: row.try_get("ctx_created_at")?,
            updated_at: row.try_get("ctx_updated_at")?,
        };

        Ok((example, context))
    }
}

#[async_trait]
impl ExampleRepositoryTrait for ExampleRepository {
    async fn create(&self, new_example: &NewExample) -> Result<i64> {
        self.create(new_example).await
    }

    async fn get(&self, id: i64) -> Result<Option<Example>> {
        self.get(id).await
    }

    async fn next_to_validate(
        &self,
        round_id: i64,
        validator_uid: i64,
        quota: i32,
    ) -> Result<Option<Example>> {
        self.next_to_validate(round_id, validator_uid, quota).await
    }

    async fn next_fooling_to_validate(
        &self,
        round_id: i64,
        validator_uid: i64,
        quota: i32,
    ) -> Result<Option<Example>> {
        self.next_fooling_to_validate(round_id, validator_uid, quota)
            .await
    }

    async fn increment_total_verified(&self, example_id: i64) -> Result<()> {
        self.increment_total_verified(example_id).await
    }

    async fn increment_verified_correct(&self, example_id: i64) -> Result<()> {
        self.increment_verified_correct(example_id).await
    }

    async fn increment_verified_incorrect(&self, example_id: i64) -> Result<()> {
        self.increment_verified_incorrect(example_id).await
    }

    async fn increment_verified_flagged(&self, example_id: i64) -> Result<()> {
        self.increment_verified_flagged(example_id).await
    }

    async fn mark_verified(&self, example_id: i64) -> Result<()> {
        self.mark_verified(example_id).await
    }

    async fn set_retracted(&self, example_id: i64, retracted: bool) -> Result<()> {
        self.set_retracted(example_id, retracted).await
    }

    async fn set_flagged(&self, example_id: i64, flagged: bool) -> Result<()> {
        self.set_flagged(example_id, flagged).await
    }

    async fn update_regenerated_content(
        &self,
        example_id: i64,
        input_json: &Value,
        metadata_json: &Value,
    ) -> Result<()> {
        self.update_regenerated_content(example_id, input_json, metadata_json)
            .await
    }

    async fn download_for_user(
        &self,
        task_id: i64,
        user_id: i64,
        amount: i64,
    ) -> Result<Vec<(Example, Context)>> {
        self.download_for_user(task_id, user_id, amount).await
    }

    async fn download_all(&self, task_id: i64) -> Result<Vec<(Example, Context)>> {
        self.download_all(task_id).await
    }
}
