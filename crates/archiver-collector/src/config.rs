//! 환경변수 기반 설정 모듈.

use crate::error::CollectorError;
use crate::Result;
use archiver_core::Interval;
use std::path::PathBuf;
use std::time::Duration;

/// Collector 전체 설정.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 출력 데이터 루트 디렉터리
    pub data_dir: PathBuf,
    /// 체크포인트 파일 경로
    pub checkpoint_path: PathBuf,
    /// 아카이브 실행 설정
    pub archive: ArchiveConfig,
}

/// 아카이브 실행 설정.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// 캔들 간격
    pub interval: Interval,
    /// 덮어쓰기 모드 (false = 기존 파일에 추가)
    pub overwrite: bool,
    /// 재시작 모드 (출력 파일이 이미 있는 심볼은 건너뜀)
    pub restart_skip: bool,
    /// 수집 대상 심볼 허용 목록 (None = 거래 가능한 전체 심볼)
    pub symbols: Option<Vec<String>>,
    /// API 요청 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// 페이지당 최대 캔들 수
    pub page_limit: u32,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let interval_str =
            std::env::var("ARCHIVE_INTERVAL").unwrap_or_else(|_| "30m".to_string());
        let interval: Interval = interval_str
            .parse()
            .map_err(CollectorError::Config)?;

        let symbols = std::env::var("ARCHIVE_SYMBOLS").ok().map(|s| {
            s.split(',')
                .map(|sym| sym.trim().to_uppercase())
                .filter(|sym| !sym.is_empty())
                .collect()
        });

        Ok(Self {
            data_dir: PathBuf::from(
                std::env::var("ARCHIVE_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
            checkpoint_path: PathBuf::from(
                std::env::var("ARCHIVE_CHECKPOINT_FILE")
                    .unwrap_or_else(|_| "last_run.txt".to_string()),
            ),
            archive: ArchiveConfig {
                interval,
                overwrite: env_var_bool("ARCHIVE_OVERWRITE", true),
                restart_skip: env_var_bool("ARCHIVE_RESTART", true),
                symbols,
                request_delay_ms: env_var_parse("ARCHIVE_REQUEST_DELAY_MS", 500),
                page_limit: env_var_parse("ARCHIVE_PAGE_LIMIT", 1000),
            },
        })
    }
}

impl ArchiveConfig {
    /// API 요청 간 딜레이를 Duration으로 반환.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            interval: Interval::default(),
            overwrite: true,
            restart_skip: true,
            symbols: None,
            request_delay_ms: 500,
            page_limit: 1000,
        }
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용).
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 환경변수에서 bool 값 파싱.
fn env_var_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}
