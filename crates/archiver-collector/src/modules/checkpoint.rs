//! 실행 체크포인트 관리 모듈.
//!
//! 마지막으로 수집을 완료한 시점을 한 줄짜리 텍스트 파일에 epoch 밀리초로
//! 보관합니다. 다음 실행은 이 워터마크를 기준으로 수집 윈도우를 계산하므로
//! 실행 사이에 공백이나 중복 수집이 생기지 않습니다.

use crate::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tracing::warn;

/// 체크포인트 로드.
///
/// 파일이 없거나 내용이 올바른 비음수 정수가 아니면 현재 시각을 반환합니다
/// (첫 실행 또는 손상된 체크포인트는 "이전 기록 없음"으로 취급).
pub fn load_checkpoint(path: &Path) -> DateTime<Utc> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Utc::now(),
    };

    match content.trim().parse::<i64>() {
        Ok(ms) if ms >= 0 => DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now),
        _ => {
            warn!(
                file = %path.display(),
                "체크포인트 파일 내용이 올바르지 않아 현재 시각부터 시작합니다"
            );
            Utc::now()
        }
    }
}

/// 체크포인트 저장.
///
/// 밀리초 정밀도로 잘라서 기록합니다. 심볼별 실패 여부와 무관하게 실행당
/// 정확히 한 번, 심볼 루프가 끝난 뒤에 호출되어야 합니다.
pub fn save_checkpoint(path: &Path, instant: DateTime<Utc>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, instant.timestamp_millis().to_string())?;
    Ok(())
}
