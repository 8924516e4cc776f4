//! Standalone OHLCV archiver for Binance market data.
//!
//! 이 crate는 거래소에서 과거 캔들 데이터를 주기적으로 수집하는 바이너리를 제공합니다:
//! - 체크포인트 기반 증분 수집 (실행 간 이어받기)
//! - 페이지 단위 kline 조회 및 커서 전진
//! - 심볼별 CSV + Parquet 이중 저장

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::{ArchiveConfig, CollectorConfig};
pub use error::{CollectorError, Result};
pub use stats::RunStats;
