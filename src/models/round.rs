//! 轮次实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 任务轮次
///
/// 一个任务按轮推进采集，每一轮挂接自己的上下文与样例，
/// 并维护本轮的采集统计计数器。轮次的创建属于任务管理侧。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: i64,
    /// 所属任务 ID
    pub tid: i64,
    /// 轮次序号（任务内从 1 递增）
    pub rid: i32,
    /// 本轮累计采集的样例数
    #[serde(default)]
    pub total_collected: i32,
    /// 本轮骗过模型的样例数
    #[serde(default)]
    pub total_fooled: i32,
    /// 本轮经人工确认骗过模型的样例数
    #[serde(default)]
    pub total_verified_fooled: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_serializes_camel_case() {
        let round = Round {
            id: 1,
            tid: 10,
            rid: 2,
            total_collected: 5,
            total_fooled: 2,
            total_verified_fooled: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&round).unwrap();
        assert_eq!(value["totalCollected"], 5);
        assert_eq!(value["totalVerifiedFooled"], 1);
    }
}
