//! 원본 캔들스틱(kline) 타입.
//!
//! Binance가 반환하는 12필드 배열을 그대로 보존합니다. 가격/거래량은
//! 정밀도 손실 없이 저장 파일에 그대로 기록되어야 하므로 숫자 타입으로
//! 변환하지 않고 텍스트로 유지합니다.

use serde::{Deserialize, Serialize};

/// CSV 헤더와 Parquet 스키마가 공유하는 컬럼 이름.
///
/// 순서와 개수는 [`Kline`]의 필드 순서와 정확히 일치해야 합니다.
pub const COLUMNS: [&str; 12] = [
    "Open Time",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Close Time",
    "Quote Asset Volume",
    "Number of Trades",
    "Taker Buy Base Asset Volume",
    "Taker Buy Quote Asset Volume",
    "Ignore",
];

/// 하나의 캔들스틱 레코드.
///
/// 시간 필드는 epoch 밀리초, 체결 건수는 정수, 나머지는 API가 반환한
/// 십진수 텍스트 그대로입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kline {
    /// 캔들 시작 시간 (epoch 밀리초)
    pub open_time: i64,
    /// 시가
    pub open: String,
    /// 고가
    pub high: String,
    /// 저가
    pub low: String,
    /// 종가
    pub close: String,
    /// 거래량 (기준 자산 단위)
    pub volume: String,
    /// 캔들 종료 시간 (epoch 밀리초)
    pub close_time: i64,
    /// 거래대금 (호가 자산 단위)
    pub quote_volume: String,
    /// 체결 건수
    pub trades: i64,
    /// 매수자 주도 거래량 (기준 자산)
    pub taker_buy_base: String,
    /// 매수자 주도 거래대금 (호가 자산)
    pub taker_buy_quote: String,
    /// 미사용 필드 (API 예약)
    pub ignore: String,
}

impl Kline {
    /// CSV 한 행에 해당하는 12개 필드를 컬럼 순서대로 반환합니다.
    pub fn to_row(&self) -> [String; 12] {
        [
            self.open_time.to_string(),
            self.open.clone(),
            self.high.clone(),
            self.low.clone(),
            self.close.clone(),
            self.volume.clone(),
            self.close_time.to_string(),
            self.quote_volume.clone(),
            self.trades.to_string(),
            self.taker_buy_base.clone(),
            self.taker_buy_quote.clone(),
            self.ignore.clone(),
        ]
    }
}
