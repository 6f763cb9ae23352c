//! 数据层错误类型
//!
//! 定义仓储层和服务层的业务错误与系统错误

use sqlx::error::ErrorKind;
use thiserror::Error;

/// 数据层错误类型
#[derive(Debug, Error)]
pub enum DataError {
    // === 业务错误 ===
    #[error("记录不存在: {entity} id={id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("违反数据约束: {0}")]
    ConstraintViolation(String),

    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 系统错误 ===
    #[error("数据库连接失败: {0}")]
    Connection(String),

    #[error("数据库错误: {0}")]
    Database(#[source] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// 数据层 Result 类型别名
pub type Result<T> = std::result::Result<T, DataError>;

/// 将 sqlx 驱动错误归类到数据层错误分类
///
/// 连接类故障（IO、TLS、协议、连接池）归入 Connection，
/// 约束冲突（唯一键、外键、非空、检查）归入 ConstraintViolation，
/// 其余保留原始驱动错误。
impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Connection(err.to_string()),
            sqlx::Error::Database(db_err)
                if matches!(
                    db_err.kind(),
                    ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                        | ErrorKind::CheckViolation
                ) =>
            {
                Self::ConstraintViolation(db_err.message().to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl DataError {
    /// 检查是否为可重试的错误
    ///
    /// 本层不做任何重试，重试决策留给调用方。
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// 检查是否为记录缺失错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Connection(_) | Self::Database(_) | Self::Migration(_)
        )
    }

    /// 获取错误码（用于上层 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
        }
    }
}
