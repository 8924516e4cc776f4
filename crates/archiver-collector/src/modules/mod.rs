//! 아카이브 실행 모듈.

pub mod archive;
pub mod checkpoint;
pub mod fetch;
pub mod writer;

pub use archive::{resolve_symbols, run_archive, SymbolOutcome};
pub use checkpoint::{load_checkpoint, save_checkpoint};
pub use fetch::{fetch_history, FetchWindow};
pub use writer::{read_parquet, write_csv, write_parquet, WriteMode};
