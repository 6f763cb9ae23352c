//! 采集平台领域模型
//!
//! 包含样例采集与验证流程的所有核心实体定义

pub mod badge;
pub mod context;
pub mod enums;
pub mod example;
pub mod round;

// 重新导出常用类型
pub use badge::{Badge, NewBadge};
pub use context::{Context, NewContext};
pub use enums::{ExampleSplit, ValidationVerdict};
pub use example::{Example, NewExample};
pub use round::Round;
