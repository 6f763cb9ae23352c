//! 样例提交服务
//!
//! 负责样例写入及其带来的各级计数联动。所有计数更新都走仓储层的
//! 相对自增语句，服务层不读取旧值，因此并发提交不会互相覆盖。

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use crate::error::Result;
use crate::repository::{ContextRepositoryTrait, ExampleRepositoryTrait, RoundRepositoryTrait};
use crate::service::dto::SubmitExampleRequest;

/// 样例提交服务
pub struct SubmissionService<ER, CR, RR>
where
    ER: ExampleRepositoryTrait,
    CR: ContextRepositoryTrait,
    RR: RoundRepositoryTrait,
{
    example_repo: Arc<ER>,
    context_repo: Arc<CR>,
    round_repo: Arc<RR>,
}

impl<ER, CR, RR> SubmissionService<ER, CR, RR>
where
    ER: ExampleRepositoryTrait,
    CR: ContextRepositoryTrait,
    RR: RoundRepositoryTrait,
{
    pub fn new(example_repo: Arc<ER>, context_repo: Arc<CR>, round_repo: Arc<RR>) -> Self {
        Self {
            example_repo,
            context_repo,
            round_repo,
        }
    }

    /// 提交样例
    ///
    /// 完整流程：
    /// 1. 参数校验
    /// 2. 写入样例记录
    /// 3. 上下文使用计数 +1
    /// 4. 轮次采集计数 +1
    /// 5. 若骗过模型，轮次骗过计数 +1
    #[instrument(
        skip(self, request),
        fields(
            context_id = request.context_id,
            round_id = request.round_id,
            user_id = request.user_id,
            model_wrong = request.model_wrong,
        )
    )]
    pub async fn submit(&self, request: SubmitExampleRequest) -> Result<i64> {
        // 1. 参数校验
        request.validate()?;

        // 2. 写入样例记录
        let example_id = self.example_repo.create(&request.to_new_example()).await?;

        // 3. 上下文使用计数
        self.context_repo
            .increment_total_used(request.context_id)
            .await?;

        // 4. 轮次采集计数
        self.round_repo
            .increment_collected(request.round_id)
            .await?;

        // 5. 骗过模型时累计轮次骗过计数
        if request.model_wrong {
            self.round_repo.increment_fooled(request.round_id).await?;
        }

        info!(
            example_id = example_id,
            context_id = request.context_id,
            round_id = request.round_id,
            model_wrong = request.model_wrong,
            "样例提交成功"
        );

        Ok(example_id)
    }

    /// 保存生成式任务中再编辑后的样例内容
    ///
    /// 只覆盖输入与元数据，不回退任何校验计数。
    #[instrument(skip(self, input_json, metadata_json), fields(example_id = example_id))]
    pub async fn regenerate(
        &self,
        example_id: i64,
        input_json: &Value,
        metadata_json: &Value,
    ) -> Result<()> {
        self.example_repo
            .update_regenerated_content(example_id, input_json, metadata_json)
            .await?;

        info!(example_id = example_id, "样例内容已更新");
        Ok(())
    }
}
