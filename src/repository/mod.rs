//! 数据库仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 每个写操作都是单条自动提交的语句，本层不开启多语句事务
//! - 随机选取的均匀性由数据库保证
//! - 定义 trait 接口以支持 mock 测试

mod badge_repo;
mod context_repo;
mod example_repo;
mod round_repo;
mod traits;

pub use badge_repo::BadgeRepository;
pub use context_repo::ContextRepository;
pub use example_repo::ExampleRepository;
pub use round_repo::RoundRepository;
pub use traits::*;
