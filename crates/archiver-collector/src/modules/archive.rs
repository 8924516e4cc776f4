//! 아카이브 실행 오케스트레이터.
//!
//! 한 번의 실행은 체크포인트에서 윈도우를 계산하고, 대상 심볼을 열거한 뒤,
//! 심볼별로 수집/저장을 수행하고, 마지막에 체크포인트를 갱신합니다.
//! 심볼 하나의 실패는 기록만 하고 실행 전체를 중단하지 않습니다.

use crate::config::CollectorConfig;
use crate::modules::{checkpoint, fetch, writer};
use crate::stats::RunStats;
use crate::Result;
use archiver_exchange::MarketDataSource;
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// 심볼 하나에 대한 처리 결과.
#[derive(Debug)]
pub enum SymbolOutcome {
    /// 수집 및 저장 완료
    Archived {
        /// 저장된 캔들 수
        klines: usize,
        /// 기록된 Parquet 파일 경로
        parquet_path: PathBuf,
    },
    /// 출력 파일이 이미 존재하여 건너뜀
    Skipped,
    /// 조회 성공, 윈도우 내 데이터 없음 (헤더만 있는 아티팩트 쌍 기록)
    Empty,
    /// 수집 또는 저장 실패
    Failed(String),
}

/// 거래 가능한 대상 심볼 목록을 결정합니다.
///
/// 거래소가 보고한 심볼 중 거래 가능 상태인 것만 남기고, 허용 목록이
/// 설정되어 있으면 그 목록과 교집합을 취합니다.
pub async fn resolve_symbols<S>(source: &S, allow_list: Option<&[String]>) -> Result<Vec<String>>
where
    S: MarketDataSource + ?Sized,
{
    let all = source.exchange_symbols().await?;

    Ok(all
        .into_iter()
        .filter(|s| s.trading)
        .map(|s| s.symbol)
        .filter(|symbol| match allow_list {
            Some(allowed) => allowed.iter().any(|a| a == symbol),
            None => true,
        })
        .collect())
}

/// 아카이브 실행 1회를 수행합니다.
///
/// 심볼 열거 실패나 출력 디렉터리 생성 실패는 치명적 에러로 전파되지만,
/// 심볼 단위 실패는 [`SymbolOutcome::Failed`]로 수집되어 루프가 계속됩니다.
/// 체크포인트는 심볼 루프가 끝난 뒤 무조건 현재 시각으로 저장되어
/// 다음 실행의 윈도우가 이번 실행 이후 구간으로 전진합니다.
pub async fn run_archive<S>(source: &S, config: &CollectorConfig) -> Result<RunStats>
where
    S: MarketDataSource + ?Sized,
{
    let start = Instant::now();
    let mut stats = RunStats::new();

    // 1. 윈도우 계산
    let checkpoint_end = checkpoint::load_checkpoint(&config.checkpoint_path);
    let window = fetch::FetchWindow::ending_at(checkpoint_end);
    info!(
        start = %window.start,
        end = %window.end,
        interval = %config.archive.interval,
        "수집 윈도우 계산 완료"
    );

    // 2. 대상 심볼 열거
    let symbols = resolve_symbols(source, config.archive.symbols.as_deref()).await?;
    info!(count = symbols.len(), "대상 심볼 결정 완료");

    // 3. 출력 디렉터리: <data_dir>/<윈도우 끝 ms>/<간격>
    let out_dir = config
        .data_dir
        .join(window.end_ms().to_string())
        .join(config.archive.interval.as_str());
    fs::create_dir_all(&out_dir)?;

    // 4. 재시작 모드: 기존 출력 파일 목록을 한 번만 조회
    let existing = if config.archive.restart_skip {
        existing_files(&out_dir)?
    } else {
        HashSet::new()
    };

    let mode = if config.archive.overwrite {
        writer::WriteMode::Overwrite
    } else {
        writer::WriteMode::Append
    };

    // 5. 심볼별 순차 처리
    let mut preview_path: Option<PathBuf> = None;
    for (idx, symbol) in symbols.iter().enumerate() {
        stats.total += 1;

        debug!(
            symbol = symbol,
            progress = format!("{}/{}", idx + 1, symbols.len()),
            "수집 시작"
        );

        let outcome = if is_complete(&existing, symbol) {
            SymbolOutcome::Skipped
        } else {
            archive_symbol(source, symbol, &window, &out_dir, mode, config).await
        };

        match outcome {
            SymbolOutcome::Archived {
                klines,
                parquet_path,
            } => {
                stats.archived += 1;
                stats.total_klines += klines;
                if preview_path.is_none() {
                    preview_path = Some(parquet_path);
                }
                info!(symbol = symbol, klines = klines, "수집 및 저장 완료");
            }
            SymbolOutcome::Skipped => {
                stats.skipped += 1;
                info!(symbol = symbol, "출력 파일이 이미 존재하여 건너뜀");
            }
            SymbolOutcome::Empty => {
                stats.empty += 1;
                debug!(symbol = symbol, "윈도우 내 데이터 없음");
            }
            SymbolOutcome::Failed(reason) => {
                stats.errors += 1;
                tracing::error!(symbol = symbol, error = %reason, "수집 실패");
            }
        }
    }

    // 6. 체크포인트 갱신: 현재 시각을 저장해 다음 실행의 윈도우가 전진하도록 함
    let new_checkpoint = Utc::now();
    checkpoint::save_checkpoint(&config.checkpoint_path, new_checkpoint)?;
    info!(
        checkpoint = new_checkpoint.timestamp_millis(),
        "체크포인트 저장 완료"
    );

    // 7. 검증 미리보기 (진단 전용)
    if let Some(path) = preview_path {
        preview_parquet(&path);
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// 심볼 하나를 수집하고 두 포맷으로 저장합니다.
///
/// 에러를 전파하는 대신 결과 타입으로 변환해 호출자가 통계로 집계합니다.
async fn archive_symbol<S>(
    source: &S,
    symbol: &str,
    window: &fetch::FetchWindow,
    out_dir: &Path,
    mode: writer::WriteMode,
    config: &CollectorConfig,
) -> SymbolOutcome
where
    S: MarketDataSource + ?Sized,
{
    let klines = match fetch::fetch_history(source, symbol, window, &config.archive).await {
        Ok(klines) => klines,
        Err(e) => return SymbolOutcome::Failed(e.to_string()),
    };

    // 빈 시퀀스도 아티팩트 쌍을 남겨 재시작 모드가 완료로 인식
    if let Err(e) = writer::write_csv(out_dir, symbol, &klines, mode) {
        return SymbolOutcome::Failed(e.to_string());
    }
    match writer::write_parquet(out_dir, symbol, &klines, mode) {
        Ok(_) if klines.is_empty() => SymbolOutcome::Empty,
        Ok(parquet_path) => SymbolOutcome::Archived {
            klines: klines.len(),
            parquet_path,
        },
        Err(e) => SymbolOutcome::Failed(e.to_string()),
    }
}

/// 출력 디렉터리의 파일 이름 목록을 조회합니다.
fn existing_files(dir: &Path) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if let Ok(name) = entry.file_name().into_string() {
            names.insert(name);
        }
    }
    Ok(names)
}

/// 심볼의 출력이 완전한지 판정합니다.
///
/// CSV와 Parquet이 모두 있어야 완료로 간주합니다. 한쪽만 있는 심볼은
/// 다음 실행에서 다시 수집되어 덮어쓰입니다.
fn is_complete(existing: &HashSet<String>, symbol: &str) -> bool {
    existing.contains(&format!("{}.csv", symbol))
        && existing.contains(&format!("{}.parquet", symbol))
}

/// 기록된 Parquet 아티팩트 하나를 다시 읽어 미리보기를 로그로 남깁니다.
///
/// 순수 진단용이며 실패해도 실행 결과에 영향을 주지 않습니다.
fn preview_parquet(path: &Path) {
    match writer::read_parquet(path) {
        Ok(df) => {
            info!(
                file = %path.display(),
                rows = df.height(),
                "검증 미리보기:\n{}",
                df.head(Some(5))
            );
        }
        Err(e) => {
            warn!(file = %path.display(), error = %e, "검증 미리보기 실패");
        }
    }
}
