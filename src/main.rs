//! signaliq 命令行入口
//! scan：批量拉取并评分；analyze：离线评分本地标记文件；signatures：列出当前签名表

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

use signaliq::export::{render_table, save_csv, to_pretty_json};
use signaliq::{
    init_global_matcher, parse_url_list, BatchScanner, ConfigManager, HttpFetcher, MatchMode,
    RetryPolicy, RuleLoader, ScanAbort, SignalMatcher, SignatureRegistry,
};

#[derive(Parser)]
#[command(
    name = "signaliq",
    about = "Tech-signal scoring engine: detects ad pixels, analytics and e-commerce fingerprints",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and score a list of URLs.
    Scan(ScanArgs),
    /// Score a saved markup file offline.
    Analyze(AnalyzeArgs),
    /// List the active signature table.
    Signatures(SignaturesArgs),
}

#[derive(Args)]
struct RegistryArgs {
    /// Append front-end stack signatures (1 point each).
    #[arg(long)]
    web_stack: bool,

    /// Load signatures from a JSON file instead of the built-in table.
    #[arg(long, value_name = "PATH")]
    signatures: Option<PathBuf>,
}

#[derive(Args)]
struct ScanArgs {
    /// URLs to scan (scheme optional, https:// is assumed).
    urls: Vec<String>,

    /// File with one URL per line (# starts a comment).
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// CSV output path.
    #[arg(long, value_name = "PATH", default_value = "scan_results.csv")]
    csv: PathBuf,

    /// Print results as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Extra attempts for retriable failures.
    #[arg(long, default_value_t = 1)]
    retries: u8,

    /// Maximum number of pages fetched at once.
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    /// Override the browser User-Agent.
    #[arg(long)]
    user_agent: Option<String>,

    /// Match against the whole page instead of script/link tags only.
    #[arg(long)]
    full_text: bool,

    #[command(flatten)]
    registry: RegistryArgs,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Saved HTML or script file.
    file: PathBuf,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Match against the whole file instead of script/link tags only.
    #[arg(long)]
    full_text: bool,

    #[command(flatten)]
    registry: RegistryArgs,
}

#[derive(Args)]
struct SignaturesArgs {
    /// Print the table in the JSON loading format.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    registry: RegistryArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Scan(args) => run_scan(args).await,
        Commands::Analyze(args) => run_analyze(args).await,
        Commands::Signatures(args) => run_signatures(args).await,
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

async fn load_registry(args: &RegistryArgs) -> Result<Arc<SignatureRegistry>> {
    match &args.signatures {
        Some(path) => {
            let registry = RuleLoader::from_json_file(path)
                .await
                .with_context(|| format!("Failed to load signatures from {}", path.display()))?;
            if args.web_stack {
                warn!("--web-stack is ignored when a custom signature file is given");
            }
            Ok(Arc::new(registry))
        }
        None if args.web_stack => Ok(SignatureRegistry::web_stack()),
        None => Ok(SignatureRegistry::builtin()),
    }
}

fn match_mode(full_text: bool) -> MatchMode {
    if full_text { MatchMode::FullText } else { MatchMode::TagScoped }
}

async fn collect_urls(urls: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut all: Vec<String> = urls.iter().map(|u| u.trim().to_string()).filter(|u| !u.is_empty()).collect();
    if let Some(path) = file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;
        all.extend(parse_url_list(&text));
    }
    Ok(all)
}

async fn run_scan(args: ScanArgs) -> Result<()> {
    let urls = collect_urls(&args.urls, args.file.as_deref()).await?;
    if urls.is_empty() {
        bail!("No URLs given: pass URLs as arguments or use --file");
    }

    let retry = if args.retries == 0 { RetryPolicy::Never } else { RetryPolicy::Times(args.retries) };
    let mut builder = ConfigManager::custom()
        .timeout(Duration::from_secs(args.timeout.max(1)))
        .retry(retry)
        .concurrency(args.concurrency)
        .match_mode(match_mode(args.full_text));
    if let Some(ua) = &args.user_agent {
        builder = builder.user_agent(ua.as_str());
    }
    let config = builder.build();

    let registry = load_registry(&args.registry).await?;
    let matcher = Arc::new(SignalMatcher::new(registry, config.match_mode));
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let scanner = BatchScanner::new(fetcher, matcher, config.concurrency);

    let (trigger, abort) = ScanAbort::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl-C, stopping scan and keeping finished results");
            trigger.abort();
        }
    });

    let report = scanner.scan_many_abortable(&urls, abort).await;

    let rows = save_csv(&args.csv, &report.results)
        .with_context(|| format!("Failed to write CSV to {}", args.csv.display()))?;
    info!("Wrote {} rows to {}", rows, args.csv.display());

    if args.json {
        println!("{}", to_pretty_json(&report.results)?);
    } else {
        print!("{}", render_table(&report.results));
    }

    let failed = report.results.iter().filter(|r| !r.is_success()).count();
    eprintln!(
        "Scanned {}/{} URLs ({} failed){}. Results saved to {}",
        report.results.len(),
        report.total,
        failed,
        if report.aborted { ", aborted" } else { "" },
        args.csv.display()
    );
    Ok(())
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let markup = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let registry = load_registry(&args.registry).await?;
    init_global_matcher(SignalMatcher::new(registry, match_mode(args.full_text)))?;

    let result = signaliq::scan(&args.file.display().to_string(), &markup);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_table(std::slice::from_ref(&result)));
    }
    Ok(())
}

async fn run_signatures(args: SignaturesArgs) -> Result<()> {
    let registry = load_registry(&args.registry).await?;
    if args.json {
        println!("{}", RuleLoader::to_json(&registry)?);
        return Ok(());
    }

    for signature in registry.all_signatures() {
        println!("{:<20} {:>3}  {:<12} {}", signature.name, signature.points, signature.category.to_string(), signature.rule.describe());
    }
    Ok(())
}
