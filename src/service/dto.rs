//! 服务层数据传输对象
//!
//! 请求对象在进入服务流程前先通过 `validate` 做参数校验，
//! 校验失败统一返回 [`DataError::Validation`]。

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{DataError, Result};
use crate::models::NewExample;

/// 提交样例请求
///
/// 对应一次用户在指定上下文下与模型交互后提交的完整样例。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExampleRequest {
    /// 所属上下文 ID
    pub context_id: i64,
    /// 所属轮次 ID
    pub round_id: i64,
    /// 提交用户 ID
    pub user_id: i64,
    /// 本次交互是否骗过了模型
    pub model_wrong: bool,
    /// 产生预测的模型端点名称
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_endpoint_name: Option<String>,
    /// 用户输入载荷
    pub input_json: Value,
    /// 模型输出载荷
    pub output_json: Value,
    /// 附加元数据
    #[serde(default = "default_metadata")]
    pub metadata_json: Value,
    /// 业务标签
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

fn default_metadata() -> Value {
    json!({})
}

impl SubmitExampleRequest {
    pub fn new(
        context_id: i64,
        round_id: i64,
        user_id: i64,
        model_wrong: bool,
        input_json: Value,
        output_json: Value,
    ) -> Self {
        Self {
            context_id,
            round_id,
            user_id,
            model_wrong,
            model_endpoint_name: None,
            input_json,
            output_json,
            metadata_json: json!({}),
            tag: None,
        }
    }

    pub fn with_model_endpoint(mut self, endpoint: &str) -> Self {
        self.model_endpoint_name = Some(endpoint.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata_json = metadata;
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// 参数校验
    pub fn validate(&self) -> Result<()> {
        if self.context_id <= 0 {
            return Err(DataError::Validation("context_id 必须为正数".to_string()));
        }
        if self.round_id <= 0 {
            return Err(DataError::Validation("round_id 必须为正数".to_string()));
        }
        if self.user_id <= 0 {
            return Err(DataError::Validation("user_id 必须为正数".to_string()));
        }
        if self.input_json.is_null() {
            return Err(DataError::Validation("input_json 不能为空".to_string()));
        }
        if self.output_json.is_null() {
            return Err(DataError::Validation("output_json 不能为空".to_string()));
        }
        Ok(())
    }

    /// 转换为仓储层插入载荷
    pub fn to_new_example(&self) -> NewExample {
        let mut new_example = NewExample::new(
            self.context_id,
            self.user_id,
            self.model_wrong,
            self.input_json.clone(),
            self.output_json.clone(),
        )
        .with_metadata(self.metadata_json.clone());

        if let Some(ref endpoint) = self.model_endpoint_name {
            new_example = new_example.with_model_endpoint(endpoint);
        }
        if let Some(ref tag) = self.tag {
            new_example = new_example.with_tag(tag);
        }

        new_example
    }
}
