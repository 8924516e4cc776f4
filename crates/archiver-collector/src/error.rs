//! 에러 타입 정의.

use thiserror::Error;

/// Collector 에러 타입.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 거래소 에러
    #[error("Exchange error: {0}")]
    Exchange(#[from] archiver_exchange::ExchangeError),

    /// 파일 I/O 에러
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV 직렬화 에러
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet/DataFrame 에러
    #[error("Parquet error: {0}")]
    Parquet(#[from] polars::prelude::PolarsError),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result 타입 별칭.
pub type Result<T> = std::result::Result<T, CollectorError>;
