//! # Archiver Core
//!
//! 캔들 아카이버 전반에서 사용되는 핵심 도메인 타입을 제공합니다:
//! - 원본 12필드 캔들스틱 구조체
//! - 캔들 간격(interval) 정의
//! - CSV/Parquet 공용 컬럼 이름 상수

pub mod types;

pub use types::*;
