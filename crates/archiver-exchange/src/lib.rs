//! # Archiver Exchange
//!
//! 캔들 아카이버를 위한 거래소 시장 데이터 커넥터를 제공합니다:
//! - [`MarketDataSource`] trait: 심볼 목록 조회 및 페이지 단위 kline 조회
//! - [`BinanceClient`]: Binance Spot 공개 REST API 구현체

pub mod connector;
pub mod error;
pub mod traits;

pub use connector::binance::{BinanceClient, BinanceConfig};
pub use error::ExchangeError;
pub use traits::{ExchangeResult, MarketDataSource, SymbolStatus};
