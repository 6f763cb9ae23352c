//! 众包对抗数据采集平台的数据访问层
//!
//! 围绕"人机对抗出题"的采集流程提供样例、上下文、轮次与徽章的
//! 存取能力：写手在指定上下文下尝试骗过模型并提交样例，验证者
//! 随机领取他人样例给出结论，计数在样例与轮次两级同步累计。
//!
//! ## 核心功能
//!
//! - **样例提交**：写入样例并联动上下文、轮次计数
//! - **验证选取**：按配额随机挑选可验证样例（支持仅骗过模型的子集）
//! - **验证计数**：全部采用数据库侧相对自增，并发不丢计数
//! - **生命周期**：撤回、举报、再编辑、验证完结
//! - **数据导出**：按任务导出样例及其上下文（限量随机 / 全量）
//! - **徽章记录**：用户徽章的授予、查询与回收
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层
//! - `config`: 配置加载
//! - `database`: 连接池与迁移
//! - `observability`: 日志初始化
//! - `test_utils`: 测试数据工具

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod observability;
pub mod repository;
pub mod service;
pub mod test_utils;

pub use config::{AppConfig, DatabaseConfig, ObservabilityConfig};
pub use database::Database;
pub use error::{DataError, Result};
pub use models::*;
pub use repository::{
    BadgeRepository, BadgeRepositoryTrait, ContextRepository, ContextRepositoryTrait,
    ExampleRepository, ExampleRepositoryTrait, RoundRepository, RoundRepositoryTrait,
};
pub use service::{SubmissionService, SubmitExampleRequest, ValidationService, dto};
