//! 실행 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 아카이브 실행 통계.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// 총 대상 심볼 수
    pub total: usize,
    /// 아카이브 완료 심볼 수
    pub archived: usize,
    /// 건너뛴 심볼 수 (출력 파일이 이미 존재)
    pub skipped: usize,
    /// 빈 데이터 심볼 수 (조회 성공, 캔들 없음)
    pub empty: usize,
    /// 실패 심볼 수
    pub errors: usize,
    /// 저장된 총 캔들 수
    pub total_klines: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunStats {
    /// 새 통계 객체 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%).
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.archived as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력.
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            archived = self.archived,
            skipped = self.skipped,
            empty = self.empty,
            errors = self.errors,
            total_klines = self.total_klines,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "실행 완료"
        );
    }
}
