//! 采集平台枚举类型定义
//!
//! 所有入库枚举都支持数据库（sqlx）和 JSON（serde）序列化

use serde::{Deserialize, Serialize};

/// 样例数据集划分
///
/// 样例提交后先处于 undecided，验证结束后由数据集构建流程划入 train/test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ExampleSplit {
    /// 未划分 - 新样例的初始状态
    #[default]
    Undecided,
    /// 训练集
    Train,
    /// 测试集
    Test,
}

/// 验证结论
///
/// 验证者对单个样例给出的判定，决定累加哪一个验证计数器。
/// 仅在内存中流转，不直接入库。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationVerdict {
    /// 正确 - 验证者认可该样例
    Correct,
    /// 错误 - 验证者否定该样例
    Incorrect,
    /// 举报 - 样例存在质量或合规问题
    Flagged,
}
