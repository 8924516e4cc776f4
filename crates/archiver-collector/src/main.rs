//! Standalone OHLCV archiver CLI.

use archiver_collector::{modules, CollectorConfig};
use archiver_exchange::{BinanceClient, BinanceConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "archiver-collector")]
#[command(about = "Binance OHLCV Data Archiver", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 아카이브 실행 1회 (윈도우 계산 → 수집 → 저장 → 체크포인트 갱신)
    Run {
        /// 특정 심볼만 수집 (쉼표로 구분, 예: "BTCUSDT,ETHUSDT")
        #[arg(long)]
        symbols: Option<String>,
    },

    /// 수집 대상 심볼 목록 출력
    Symbols,

    /// 현재 체크포인트 출력
    Checkpoint,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("archiver_collector={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Kline Archiver 시작");

    // 설정 로드
    let mut config = CollectorConfig::from_env()?;
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        interval = %config.archive.interval,
        "설정 로드 완료"
    );

    // 거래소 클라이언트 생성
    let client = BinanceClient::new(BinanceConfig::default())?;

    // 명령 실행
    match cli.command {
        Commands::Run { symbols } => {
            if let Some(s) = symbols {
                config.archive.symbols = Some(
                    s.split(',')
                        .map(|sym| sym.trim().to_uppercase())
                        .filter(|sym| !sym.is_empty())
                        .collect(),
                );
            }

            let stats = modules::run_archive(&client, &config).await?;
            stats.log_summary("캔들 아카이브");
        }
        Commands::Symbols => {
            let symbols =
                modules::resolve_symbols(&client, config.archive.symbols.as_deref()).await?;
            tracing::info!(count = symbols.len(), "거래 가능 심볼 조회 완료");
            for symbol in symbols {
                println!("{}", symbol);
            }
        }
        Commands::Checkpoint => {
            let checkpoint = modules::load_checkpoint(&config.checkpoint_path);
            println!("{} ({})", checkpoint.timestamp_millis(), checkpoint);
        }
    }

    tracing::info!("Kline Archiver 종료");

    Ok(())
}
