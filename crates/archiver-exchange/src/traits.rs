//! 시장 데이터 소스 trait 정의.

use archiver_core::{Interval, Kline};
use async_trait::async_trait;

use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 거래소가 보고하는 심볼과 거래 상태.
#[derive(Debug, Clone)]
pub struct SymbolStatus {
    /// 심볼 식별자 (예: "BTCUSDT")
    pub symbol: String,
    /// 현재 거래 가능 여부
    pub trading: bool,
}

/// 과거 시장 데이터 조회 인터페이스.
///
/// 아카이버가 거래소에 요구하는 두 가지 기능만 노출합니다. 테스트에서는
/// 이 trait의 스텁 구현으로 거래소 호출을 대체합니다.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 거래소의 전체 심볼 목록과 거래 상태를 조회합니다.
    async fn exchange_symbols(&self) -> ExchangeResult<Vec<SymbolStatus>>;

    /// `start_time_ms` 이후의 kline 한 페이지를 조회합니다.
    ///
    /// 반환되는 캔들은 시작 시간 오름차순이며 최대 `limit`개입니다.
    /// 더 이상 데이터가 없으면 빈 벡터를 반환합니다.
    async fn klines(
        &self,
        symbol: &str,
        interval: Interval,
        start_time_ms: i64,
        limit: u32,
    ) -> ExchangeResult<Vec<Kline>>;
}
