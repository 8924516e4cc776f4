//! 이중 포맷 저장 모듈.
//!
//! 심볼 하나의 캔들 시퀀스를 CSV(행 지향)와 Parquet(컬럼 지향)로 기록합니다.
//! 두 파일은 같은 논리적 데이터셋을 담지만 파일시스템 객체로는 서로 독립입니다.

use crate::Result;
use archiver_core::{Kline, COLUMNS};
use polars::prelude::*;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// 출력 파일 기록 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// 기존 파일을 대체
    Overwrite,
    /// 기존 파일 뒤에 행 추가
    Append,
}

/// 캔들 시퀀스를 CSV 파일로 기록합니다.
///
/// 덮어쓰기 모드는 헤더와 전체 행을 새로 쓰고, 추가 모드는 파일이 이미
/// 있으면 헤더 없이 행만 덧붙입니다. 성공 시 기록한 파일 경로를 반환합니다.
pub fn write_csv(
    dir: &Path,
    symbol: &str,
    klines: &[Kline],
    mode: WriteMode,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", symbol));

    let (file, write_header) = match mode {
        WriteMode::Overwrite => (File::create(&path)?, true),
        WriteMode::Append => {
            let existed = path.is_file();
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            (file, !existed)
        }
    };

    let mut writer = csv::Writer::from_writer(file);
    if write_header {
        writer.write_record(COLUMNS)?;
    }
    for kline in klines {
        writer.write_record(kline.to_row())?;
    }
    writer.flush()?;

    Ok(path)
}

/// 캔들 시퀀스를 Parquet 파일로 기록합니다.
///
/// Parquet은 제자리 추가가 불가능하므로 추가 모드에서는 기존 테이블을
/// 읽어 새 행을 이어 붙인 뒤 전체를 다시 씁니다. 어느 모드든 성공 시
/// 완전한 파일 하나가 남습니다.
pub fn write_parquet(
    dir: &Path,
    symbol: &str,
    klines: &[Kline],
    mode: WriteMode,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.parquet", symbol));

    let mut df = build_dataframe(klines)?;
    if mode == WriteMode::Append && path.is_file() {
        let existing = read_parquet(&path)?;
        df = existing.vstack(&df)?;
    }

    let mut file = File::create(&path)?;
    ParquetWriter::new(&mut file).finish(&mut df)?;

    Ok(path)
}

/// Parquet 파일을 DataFrame으로 읽습니다.
pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    Ok(ParquetReader::new(file).finish()?)
}

/// 12개 고정 스키마 컬럼으로 DataFrame을 구성합니다.
///
/// 컬럼 이름과 순서는 CSV 헤더와 동일한 [`COLUMNS`]에서 가져오며,
/// 시간/체결 건수는 Int64, 십진수 텍스트 필드는 String 타입입니다.
/// 길이가 어긋난 컬럼은 polars가 구성 에러로 거부합니다.
fn build_dataframe(klines: &[Kline]) -> Result<DataFrame> {
    let n = klines.len();
    let mut open_time = Vec::with_capacity(n);
    let mut open = Vec::with_capacity(n);
    let mut high = Vec::with_capacity(n);
    let mut low = Vec::with_capacity(n);
    let mut close = Vec::with_capacity(n);
    let mut volume = Vec::with_capacity(n);
    let mut close_time = Vec::with_capacity(n);
    let mut quote_volume = Vec::with_capacity(n);
    let mut trades = Vec::with_capacity(n);
    let mut taker_buy_base = Vec::with_capacity(n);
    let mut taker_buy_quote = Vec::with_capacity(n);
    let mut ignore = Vec::with_capacity(n);

    for kline in klines {
        open_time.push(kline.open_time);
        open.push(kline.open.clone());
        high.push(kline.high.clone());
        low.push(kline.low.clone());
        close.push(kline.close.clone());
        volume.push(kline.volume.clone());
        close_time.push(kline.close_time);
        quote_volume.push(kline.quote_volume.clone());
        trades.push(kline.trades);
        taker_buy_base.push(kline.taker_buy_base.clone());
        taker_buy_quote.push(kline.taker_buy_quote.clone());
        ignore.push(kline.ignore.clone());
    }

    let columns = vec![
        Column::new(COLUMNS[0].into(), open_time),
        Column::new(COLUMNS[1].into(), open),
        Column::new(COLUMNS[2].into(), high),
        Column::new(COLUMNS[3].into(), low),
        Column::new(COLUMNS[4].into(), close),
        Column::new(COLUMNS[5].into(), volume),
        Column::new(COLUMNS[6].into(), close_time),
        Column::new(COLUMNS[7].into(), quote_volume),
        Column::new(COLUMNS[8].into(), trades),
        Column::new(COLUMNS[9].into(), taker_buy_base),
        Column::new(COLUMNS[10].into(), taker_buy_quote),
        Column::new(COLUMNS[11].into(), ignore),
    ];

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_klines() -> Vec<Kline> {
        vec![
            Kline {
                open_time: 1_700_000_000_000,
                open: "100".to_string(),
                high: "110".to_string(),
                low: "90".to_string(),
                close: "105".to_string(),
                volume: "1000".to_string(),
                close_time: 1_700_000_300_000,
                quote_volume: "10000".to_string(),
                trades: 500,
                taker_buy_base: "500".to_string(),
                taker_buy_quote: "5000".to_string(),
                ignore: "0".to_string(),
            },
            Kline {
                open_time: 1_700_000_300_000,
                open: "105".to_string(),
                high: "115".to_string(),
                low: "95".to_string(),
                close: "110".to_string(),
                volume: "2000".to_string(),
                close_time: 1_700_000_600_000,
                quote_volume: "20000".to_string(),
                trades: 600,
                taker_buy_base: "600".to_string(),
                taker_buy_quote: "6000".to_string(),
                ignore: "0".to_string(),
            },
        ]
    }

    #[test]
    fn test_csv_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "BTCUSDT", &sample_klines(), WriteMode::Overwrite)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], COLUMNS.join(","));
        assert!(lines[1].starts_with("1700000000000,100,"));
        assert!(lines[2].starts_with("1700000300000,105,"));
    }

    #[test]
    fn test_csv_overwrite_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "BTCUSDT", &sample_klines(), WriteMode::Overwrite).unwrap();
        let path = write_csv(
            dir.path(),
            "BTCUSDT",
            &sample_klines()[..1],
            WriteMode::Overwrite,
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 헤더 + 1행
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_csv_append_keeps_single_header() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "BTCUSDT", &sample_klines(), WriteMode::Append).unwrap();
        let path =
            write_csv(dir.path(), "BTCUSDT", &sample_klines(), WriteMode::Append).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content
            .lines()
            .filter(|line| line.starts_with("Open Time"))
            .count();

        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 5); // 헤더 1 + 행 4
    }

    #[test]
    fn test_parquet_row_count_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            dir.path(),
            "BTCUSDT",
            &sample_klines(),
            WriteMode::Overwrite,
        )
        .unwrap();

        let df = read_parquet(&path).unwrap();
        assert_eq!(df.height(), 2);

        // 컬럼 이름/순서가 CSV 헤더와 정확히 일치해야 함
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, COLUMNS.to_vec());
    }

    #[test]
    fn test_parquet_column_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            dir.path(),
            "BTCUSDT",
            &sample_klines(),
            WriteMode::Overwrite,
        )
        .unwrap();

        let df = read_parquet(&path).unwrap();
        assert_eq!(df.column("Open Time").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Close Time").unwrap().dtype(), &DataType::Int64);
        assert_eq!(
            df.column("Number of Trades").unwrap().dtype(),
            &DataType::Int64
        );
        assert_eq!(df.column("Open").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Volume").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_parquet_append_stacks_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_parquet(
            dir.path(),
            "BTCUSDT",
            &sample_klines(),
            WriteMode::Overwrite,
        )
        .unwrap();
        let path = write_parquet(
            dir.path(),
            "BTCUSDT",
            &sample_klines()[..1],
            WriteMode::Append,
        )
        .unwrap();

        let df = read_parquet(&path).unwrap();
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_empty_sequence_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(dir.path(), "BTCUSDT", &[], WriteMode::Overwrite).unwrap();
        let parquet_path =
            write_parquet(dir.path(), "BTCUSDT", &[], WriteMode::Overwrite).unwrap();

        let content = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().count(), 1);

        let df = read_parquet(&parquet_path).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 12);
    }
}
