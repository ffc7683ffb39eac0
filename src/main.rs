//! 命令行前端
//!
//! 弹窗式交互的命令行对应物：翻译一段文本（可附带回译校对），
//! 并维护最近优先的翻译历史。

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dualtrans::config::constants;
use dualtrans::history::{HistoryEntry, HistoryLog};
use dualtrans::{detect, Engine, ServiceConfig, TranslateResult, TranslationService};

/// 历史文件位置
const HISTORY_FILE: &str = "~/.config/dualtrans/history.json";

#[derive(Parser)]
#[command(name = "dualtrans", version, about = "双语批次翻译调度引擎")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 翻译一段文本
    Translate {
        /// 待翻译文本
        text: String,
        /// 翻译引擎（bulk/simple），缺省取配置
        #[arg(long)]
        engine: Option<Engine>,
        /// 源语言，缺省按文本自动取向
        #[arg(long)]
        from: Option<String>,
        /// 目标语言，缺省按文本自动取向
        #[arg(long)]
        to: Option<String>,
        /// 附带回译，核对译文意思
        #[arg(long)]
        back: bool,
        /// 不写入历史
        #[arg(long)]
        no_history: bool,
    },
    /// 查看最近的翻译历史
    History {
        /// 显示条数
        #[arg(long, default_value_t = constants::HISTORY_CAP)]
        limit: usize,
    },
    /// 清空翻译历史
    ClearHistory,
}

#[tokio::main]
async fn main() -> TranslateResult<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Translate {
            text,
            engine,
            from,
            to,
            back,
            no_history,
        } => translate(text, engine, from, to, back, no_history).await,
        Command::History { limit } => show_history(limit),
        Command::ClearHistory => history_log().clear(),
    }
}

async fn translate(
    text: String,
    engine: Option<Engine>,
    from: Option<String>,
    to: Option<String>,
    back: bool,
    no_history: bool,
) -> TranslateResult<()> {
    let config = ServiceConfig::load();
    let engine = engine.unwrap_or(config.default_engine);

    // 语言对：显式给定优先，否则按文本内容自动取向
    let (source_lang, target_lang) = match (from, to) {
        (Some(f), Some(t)) => (f, t),
        (f, t) => detect::orient_pair(
            &text,
            f.as_deref().unwrap_or(&config.default_source_lang),
            t.as_deref().unwrap_or(&config.default_target_lang),
        ),
    };

    let service = TranslationService::new(config)?;

    if back {
        let round_trip = service
            .translate_round_trip(engine, &source_lang, &target_lang, &text)
            .await;
        print_result(&round_trip.text);
        if !round_trip.back.is_empty() {
            println!("回译: {}", round_trip.back);
        }
        if !no_history && !round_trip.text.is_empty() {
            record_history(&source_lang, &target_lang, &text, &round_trip.text);
        }
    } else {
        let translated = service
            .translate_text(engine, &source_lang, &target_lang, &text)
            .await;
        print_result(&translated);
        if !no_history && !translated.is_empty() {
            record_history(&source_lang, &target_lang, &text, &translated);
        }
    }

    Ok(())
}

fn print_result(translated: &str) {
    if translated.is_empty() {
        println!("翻译不可用，请切换引擎或检查网络");
    } else {
        println!("{}", translated);
    }
}

fn record_history(from: &str, to: &str, src: &str, out: &str) {
    if let Err(e) = history_log().record(HistoryEntry::now(from, to, src, out)) {
        tracing::warn!("历史写入失败: {}", e);
    }
}

fn show_history(limit: usize) -> TranslateResult<()> {
    let entries = history_log().entries();
    if entries.is_empty() {
        println!("暂无翻译历史");
        return Ok(());
    }

    for entry in entries.iter().take(limit) {
        println!(
            "[{}] {} -> {}",
            format_timestamp(entry.t),
            entry.from,
            entry.to
        );
        println!("  {}", entry.src);
        println!("  {}", entry.out);
    }
    Ok(())
}

fn history_log() -> HistoryLog {
    HistoryLog::with_file(dualtrans::config::expand_home(HISTORY_FILE))
}

/// 历史时间戳格式化为 `月-日 时:分`
fn format_timestamp(millis: u64) -> String {
    use chrono::{Local, TimeZone};

    match Local.timestamp_millis_opt(millis as i64).single() {
        Some(dt) => dt.format("%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}
