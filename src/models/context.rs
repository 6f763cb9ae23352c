//! 上下文实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// 上下文
///
/// 写手创作样例时依据的素材（一段文章、一张图片的描述等），
/// 归属于某个任务轮次。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub id: i64,
    /// 所属轮次 ID
    pub r_realid: i64,
    /// 上下文素材载荷
    pub context_json: Value,
    /// 附加元数据
    pub metadata_json: Value,
    /// 自由标签
    #[sqlx(default)]
    pub tag: Option<String>,
    /// 被用于创作的次数
    #[serde(default)]
    pub total_used: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新上下文插入载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContext {
    pub r_realid: i64,
    pub context_json: Value,
    pub metadata_json: Value,
    pub tag: Option<String>,
}

impl NewContext {
    pub fn new(round_id: i64, context_json: Value) -> Self {
        Self {
            r_realid: round_id,
            context_json,
            metadata_json: json!({}),
            tag: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata_json = metadata;
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }
}
