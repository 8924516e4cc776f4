//! 도메인 타입 정의.

pub mod interval;
pub mod kline;

pub use interval::Interval;
pub use kline::{Kline, COLUMNS};
