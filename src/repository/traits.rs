//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{Badge, Context, Example, NewBadge, NewContext, NewExample, Round};

/// 样例仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExampleRepositoryTrait: Send + Sync {
    // 创建与查询
    async fn create(&self, new_example: &NewExample) -> Result<i64>;
    async fn get(&self, id: i64) -> Result<Option<Example>>;

    // 验证候选选取
    async fn next_to_validate(
        &self,
        round_id: i64,
        validator_uid: i64,
        quota: i32,
    ) -> Result<Option<Example>>;
    async fn next_fooling_to_validate(
        &self,
        round_id: i64,
        validator_uid: i64,
        quota: i32,
    ) -> Result<Option<Example>>;

    // 验证计数器
    async fn increment_total_verified(&self, example_id: i64) -> Result<()>;
    async fn increment_verified_correct(&self, example_id: i64) -> Result<()>;
    async fn increment_verified_incorrect(&self, example_id: i64) -> Result<()>;
    async fn increment_verified_flagged(&self, example_id: i64) -> Result<()>;

    // 生命周期
    async fn mark_verified(&self, example_id: i64) -> Result<()>;
    async fn set_retracted(&self, example_id: i64, retracted: bool) -> Result<()>;
    async fn set_flagged(&self, example_id: i64, flagged: bool) -> Result<()>;
    async fn update_regenerated_content(
        &self,
        example_id: i64,
        input_json: &Value,
        metadata_json: &Value,
    ) -> Result<()>;

    // 数据导出
    async fn download_for_user(
        &self,
        task_id: i64,
        user_id: i64,
        amount: i64,
    ) -> Result<Vec<(Example, Context)>>;
    async fn download_all(&self, task_id: i64) -> Result<Vec<(Example, Context)>>;
}

/// 上下文仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextRepositoryTrait: Send + Sync {
    async fn create(&self, new_context: &NewContext) -> Result<i64>;
    async fn get(&self, id: i64) -> Result<Option<Context>>;
    async fn get_random_for_round(&self, round_id: i64) -> Result<Option<Context>>;
    async fn list_for_round(&self, round_id: i64) -> Result<Vec<Context>>;
    async fn increment_total_used(&self, context_id: i64) -> Result<()>;
}

/// 轮次仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoundRepositoryTrait: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Round>>;
    async fn get_for_task(&self, task_id: i64, round_number: i32) -> Result<Option<Round>>;
    async fn list_for_task(&self, task_id: i64) -> Result<Vec<Round>>;

    // 轮次统计计数器
    async fn increment_collected(&self, round_id: i64) -> Result<()>;
    async fn increment_fooled(&self, round_id: i64) -> Result<()>;
    async fn increment_verified_fooled(&self, round_id: i64) -> Result<()>;
}

/// 徽章仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepositoryTrait: Send + Sync {
    async fn award(&self, new_badge: &NewBadge) -> Result<i64>;
    async fn get(&self, id: i64) -> Result<Option<Badge>>;
    async fn list_for_user(&self, uid: i64) -> Result<Vec<Badge>>;
    async fn has_badge(&self, uid: i64, name: &str) -> Result<bool>;
    async fn remove(&self, id: i64) -> Result<()>;
}
