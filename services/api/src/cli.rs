use crate::infra::{build_service, parse_format, parse_sort};
use crate::report::{render_analysis, render_assessment, render_history};
use crate::server;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use prospector::analysis::{
    CollectedSignals, MetricComparison, RecommendationEngine, RecommendationPolicy,
};
use prospector::config::{AppConfig, MAX_HISTORY_LIMIT};
use prospector::error::AppError;
use prospector::history::{export_history, ExportFormat, HistorySort};
use prospector::telemetry;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "prospector",
    about = "Score websites for sales prospecting and track the results",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Collect signals for a URL, score it and store the result
    Analyze(AnalyzeArgs),
    /// Re-score previously collected signals from a JSON file
    Score(ScoreArgs),
    /// Inspect or export stored analyses
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List stored analyses
    List(HistoryListArgs),
    /// Write stored analyses as JSON or CSV
    Export(HistoryExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Page to analyze (http or https)
    pub(crate) url: String,
    /// Print the full result as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file with `lighthouseResults`, `siteInfo` and `lastUpdated`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Compare metric display strings byte-wise, as older reports did
    #[arg(long)]
    pub(crate) lexicographic_metrics: bool,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryListArgs {
    /// Case-insensitive URL substring filter
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// date-desc, date-asc, score-desc or score-asc
    #[arg(long, value_parser = parse_sort)]
    pub(crate) sort: Option<HistorySort>,
    /// Maximum number of entries to show
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_HISTORY_LIMIT as u64))]
    pub(crate) limit: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryExportArgs {
    /// json or csv
    #[arg(long, value_parser = parse_format, default_value = "json")]
    pub(crate) format: ExportFormat,
    /// Destination file (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Score(args) => run_score(args),
        Command::History {
            command: HistoryCommand::List(args),
        } => run_history_list(args),
        Command::History {
            command: HistoryCommand::Export(args),
        } => run_history_export(args),
    }
}

fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let service = build_service(&config)?;
    let result = service.analyze(&args.url).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_analysis(&result));
    }
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let file = File::open(&args.input)?;
    let signals: CollectedSignals = serde_json::from_reader(io::BufReader::new(file))?;

    let policy = RecommendationPolicy {
        metric_comparison: if args.lexicographic_metrics {
            MetricComparison::Lexicographic
        } else {
            MetricComparison::Numeric
        },
    };
    let assessment = signals.assess(&RecommendationEngine::new(policy));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print!("{}", render_assessment(&assessment));
    }
    Ok(())
}

fn run_history_list(args: HistoryListArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let service = build_service(&config)?;

    let mut query = service.default_query();
    if let Some(search) = args.search {
        query = query.with_search(search);
    }
    if let Some(sort) = args.sort {
        query = query.with_sort(sort);
    }
    if let Some(limit) = args.limit {
        query.limit = limit as usize;
    }

    let entries = service.history(&query)?;
    print!("{}", render_history(&entries));
    Ok(())
}

fn run_history_export(args: HistoryExportArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let service = build_service(&config)?;

    let mut query = service.default_query();
    query.limit = MAX_HISTORY_LIMIT;
    let records = service.history_records(&query)?;

    match args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(&path)?);
            export_history(args.format, &records, Utc::now(), writer)?;
            eprintln!(
                "Exported {} analyses to {} ({})",
                records.len(),
                path.display(),
                args.format.extension()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            export_history(args.format, &records, Utc::now(), &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}
