//! 徽章实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// 用户徽章
///
/// 对用户贡献行为（采集、验证、骗过模型等）的奖励记录。
/// 徽章与样例不同，可以被物理撤销。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: i64,
    /// 持有者用户 ID
    pub uid: i64,
    /// 徽章名称编码，如 "first_fooling_example"
    pub name: String,
    /// 附加元数据
    pub metadata_json: Value,
    /// 授予时间
    pub awarded: DateTime<Utc>,
}

/// 新徽章插入载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBadge {
    pub uid: i64,
    pub name: String,
    pub metadata_json: Value,
}

impl NewBadge {
    pub fn new(uid: i64, name: &str) -> Self {
        Self {
            uid,
            name: name.to_string(),
            metadata_json: json!({}),
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata_json = metadata;
        self
    }
}
