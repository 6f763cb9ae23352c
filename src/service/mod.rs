//! 服务层
//!
//! 实现采集平台业务逻辑，协调仓储层的多表计数联动。
//!
//! ## 模块结构
//!
//! - `dto`: 数据传输对象定义
//! - `submission_service`: 样例提交服务（写入 + 计数联动）
//! - `validation_service`: 样例验证服务（候选选取 + 结论落库）

pub mod dto;
pub mod submission_service;
pub mod validation_service;

pub use dto::*;
pub use submission_service::SubmissionService;
pub use validation_service::ValidationService;
