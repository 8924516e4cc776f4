//! 페이지 단위 kline 수집 모듈.
//!
//! 거래소는 요청당 제한된 수의 캔들만 반환하므로, 커서를 마지막 캔들의
//! 시작 시간 + 1ms로 전진시키며 윈도우가 소진될 때까지 반복 조회합니다.

use crate::config::ArchiveConfig;
use crate::Result;
use archiver_core::Kline;
use archiver_exchange::MarketDataSource;
use chrono::{DateTime, Duration, Utc};

/// 한 번의 실행이 수집하는 시간 범위.
///
/// 불변식: 수집이 진행되려면 `start < end`.
#[derive(Debug, Clone, Copy)]
pub struct FetchWindow {
    /// 윈도우 시작 (포함)
    pub start: DateTime<Utc>,
    /// 윈도우 끝 (미포함)
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// 체크포인트에서 끝나는 1일 윈도우를 계산합니다.
    pub fn ending_at(end: DateTime<Utc>) -> Self {
        Self {
            start: end - Duration::days(1),
            end,
        }
    }

    /// 윈도우 시작 (epoch 밀리초).
    pub fn start_ms(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// 윈도우 끝 (epoch 밀리초).
    pub fn end_ms(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

/// 윈도우 내의 kline을 페이지 단위로 모두 수집합니다.
///
/// 커서가 윈도우 끝에 도달하거나 빈 페이지가 반환되면 종료합니다.
/// 반환 순서는 거래소가 준 그대로(시작 시간 오름차순)이며 중복 제거는
/// 하지 않습니다. 거래소 에러는 재시도 없이 그대로 전파됩니다.
pub async fn fetch_history<S>(
    source: &S,
    symbol: &str,
    window: &FetchWindow,
    config: &ArchiveConfig,
) -> Result<Vec<Kline>>
where
    S: MarketDataSource + ?Sized,
{
    let end_ms = window.end_ms();
    let mut cursor = window.start_ms();
    let mut all_klines = Vec::new();

    while cursor < end_ms {
        let page = source
            .klines(symbol, config.interval, cursor, config.page_limit)
            .await?;

        let Some(last) = page.last() else {
            break; // 데이터 소진
        };

        cursor = last.open_time + 1;
        all_klines.extend(page);

        // 거래소 요청 한도 준수
        tokio::time::sleep(config.request_delay()).await;
    }

    Ok(all_klines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archiver_core::Interval;
    use archiver_exchange::{ExchangeResult, SymbolStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn kline_at(open_time: i64) -> Kline {
        Kline {
            open_time,
            open: "100".to_string(),
            high: "110".to_string(),
            low: "90".to_string(),
            close: "105".to_string(),
            volume: "1000".to_string(),
            close_time: open_time + 299_999,
            quote_volume: "10000".to_string(),
            trades: 500,
            taker_buy_base: "500".to_string(),
            taker_buy_quote: "5000".to_string(),
            ignore: "0".to_string(),
        }
    }

    fn zero_delay() -> ArchiveConfig {
        ArchiveConfig {
            request_delay_ms: 0,
            ..ArchiveConfig::default()
        }
    }

    /// 미리 준비된 페이지를 순서대로 반환하는 스텁.
    struct PagedStub {
        pages: Mutex<Vec<Vec<Kline>>>,
        calls: Mutex<usize>,
    }

    impl PagedStub {
        fn new(pages: Vec<Vec<Kline>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl MarketDataSource for PagedStub {
        async fn exchange_symbols(&self) -> ExchangeResult<Vec<SymbolStatus>> {
            Ok(vec![])
        }

        async fn klines(
            &self,
            _symbol: &str,
            _interval: Interval,
            _start_time_ms: i64,
            _limit: u32,
        ) -> ExchangeResult<Vec<Kline>> {
            *self.calls.lock().unwrap() += 1;
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(vec![])
            } else {
                Ok(pages.remove(0))
            }
        }
    }

    /// 호출될 때마다 커서 위치의 캔들 1개를 반환하는 스텁 (빈 페이지 없음).
    struct EndlessStub {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl MarketDataSource for EndlessStub {
        async fn exchange_symbols(&self) -> ExchangeResult<Vec<SymbolStatus>> {
            Ok(vec![])
        }

        async fn klines(
            &self,
            _symbol: &str,
            _interval: Interval,
            start_time_ms: i64,
            _limit: u32,
        ) -> ExchangeResult<Vec<Kline>> {
            *self.calls.lock().unwrap() += 1;
            Ok(vec![kline_at(start_time_ms)])
        }
    }

    fn window_ms(start_ms: i64, end_ms: i64) -> FetchWindow {
        FetchWindow {
            start: DateTime::from_timestamp_millis(start_ms).unwrap(),
            end: DateTime::from_timestamp_millis(end_ms).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_pagination_until_empty_page() {
        // 3개짜리 페이지 2개 + 빈 페이지 1개
        let pages = vec![
            vec![kline_at(1_000), kline_at(2_000), kline_at(3_000)],
            vec![kline_at(4_000), kline_at(5_000), kline_at(6_000)],
        ];
        let stub = PagedStub::new(pages);
        let window = window_ms(1_000, 1_000_000);

        let klines = fetch_history(&stub, "BTCUSDT", &window, &zero_delay())
            .await
            .unwrap();

        assert_eq!(klines.len(), 6);
        let times: Vec<i64> = klines.iter().map(|k| k.open_time).collect();
        assert_eq!(times, vec![1_000, 2_000, 3_000, 4_000, 5_000, 6_000]);
        // 페이지 2개 + 종료를 알린 빈 페이지 1개
        assert_eq!(stub.call_count(), 3);
    }

    #[tokio::test]
    async fn test_terminates_when_cursor_passes_end() {
        // 빈 페이지를 절대 반환하지 않아도 커서가 윈도우 끝을 넘으면 종료
        let stub = EndlessStub {
            calls: Mutex::new(0),
        };
        let window = window_ms(0, 5);

        let klines = fetch_history(&stub, "BTCUSDT", &window, &zero_delay())
            .await
            .unwrap();

        assert_eq!(klines.len(), 5);
        assert_eq!(*stub.calls.lock().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_empty_window_makes_no_calls() {
        let stub = PagedStub::new(vec![vec![kline_at(1_000)]]);
        let window = window_ms(5_000, 5_000);

        let klines = fetch_history(&stub, "BTCUSDT", &window, &zero_delay())
            .await
            .unwrap();

        assert!(klines.is_empty());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        struct FailingStub;

        #[async_trait]
        impl MarketDataSource for FailingStub {
            async fn exchange_symbols(&self) -> ExchangeResult<Vec<SymbolStatus>> {
                Ok(vec![])
            }

            async fn klines(
                &self,
                _symbol: &str,
                _interval: Interval,
                _start_time_ms: i64,
                _limit: u32,
            ) -> ExchangeResult<Vec<Kline>> {
                Err(archiver_exchange::ExchangeError::NetworkError(
                    "connection reset".to_string(),
                ))
            }
        }

        let window = window_ms(0, 1_000);
        let result = fetch_history(&FailingStub, "BTCUSDT", &window, &zero_delay()).await;
        assert!(result.is_err());
    }
}
