//! 样例实体定义
//!
//! 样例是采集平台的核心数据单元：写手基于上下文提交的一条对抗输入，
//! 连同模型当时的响应与后续的人工验证计数。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::enums::ExampleSplit;

/// 样例
///
/// 一旦提交永不物理删除；撤回与举报都只是置位标记。
/// 四个验证计数器只通过数据库侧的相对更新递增。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub id: i64,
    /// 所属上下文 ID
    pub cid: i64,
    /// 创建者用户 ID
    pub uid: i64,
    /// 模型是否被骗过（模型判错）
    pub model_wrong: bool,
    /// 当时应答的模型端点名
    #[sqlx(default)]
    pub model_endpoint_name: Option<String>,
    /// 写手提交的输入载荷
    pub input_json: Value,
    /// 模型响应载荷
    pub output_json: Value,
    /// 附加元数据
    pub metadata_json: Value,
    /// 自由标签
    #[sqlx(default)]
    pub tag: Option<String>,
    /// 是否已被创建者撤回
    pub retracted: bool,
    /// 是否被举报
    pub flagged: bool,
    /// 是否已结束验证
    pub verified: bool,
    /// 数据集划分
    pub split: ExampleSplit,
    /// 累计验证次数
    #[serde(default)]
    pub total_verified: i32,
    /// 判定为正确的次数
    #[serde(default)]
    pub verified_correct: i32,
    /// 判定为错误的次数
    #[serde(default)]
    pub verified_incorrect: i32,
    /// 被举报的次数
    #[serde(default)]
    pub verified_flagged: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Example {
    /// 检查验证次数是否已达配额
    pub fn has_reached_quota(&self, quota: i32) -> bool {
        self.total_verified >= quota
    }

    /// 检查指定验证者是否可以领取该样例做验证
    ///
    /// 创建者不能验证自己的样例；已撤回或已达配额的样例不再进入验证队列。
    pub fn can_be_validated_by(&self, validator_uid: i64, quota: i32) -> bool {
        self.uid != validator_uid && !self.retracted && !self.has_reached_quota(quota)
    }

    /// 检查是否为可供验证的骗过模型样例
    pub fn is_fooling_candidate_for(&self, validator_uid: i64, quota: i32) -> bool {
        self.model_wrong && self.can_be_validated_by(validator_uid, quota)
    }
}

/// 新样例插入载荷
///
/// 生命周期字段不可设置：新样例总是以未撤回、未举报、未验证、
/// 未划分且计数器全零的状态入库。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExample {
    pub cid: i64,
    pub uid: i64,
    pub model_wrong: bool,
    pub model_endpoint_name: Option<String>,
    pub input_json: Value,
    pub output_json: Value,
    pub metadata_json: Value,
    pub tag: Option<String>,
}

impl NewExample {
    pub fn new(cid: i64, uid: i64, model_wrong: bool, input_json: Value, output_json: Value) -> Self {
        Self {
            cid,
            uid,
            model_wrong,
            model_endpoint_name: None,
            input_json,
            output_json,
            metadata_json: json!({}),
            tag: None,
        }
    }

    /// 记录应答的模型端点名
    pub fn with_model_endpoint(mut self, endpoint: &str) -> Self {
        self.model_endpoint_name = Some(endpoint.to_string());
        self
    }

    /// 附加元数据
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata_json = metadata;
        self
    }

    /// 附加标签
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }
}
