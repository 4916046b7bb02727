use sea_orm::DbErr;
use util::system_health::MetricsError;

/// Failures that end the monitor. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("host metrics read failed: {0}")]
    Metrics(#[from] MetricsError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("display output failed: {0}")]
    Io(#[from] std::io::Error),
}
