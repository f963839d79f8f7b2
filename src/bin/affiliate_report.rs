use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use affiliate_insights::{
    AppConfig, Banner, Campaign, CampaignId, Error, Transaction, WithdrawalRecord,
    logging::init_logging,
    media::resolve_media_urls,
    report::{
        ReportOptions, banner_images, build_transaction_report, build_withdrawal_report,
        parse_anchor_date, read_records, rebase_urls,
    },
    transaction::{TypeFilter, WindowPreset},
};

/// Turns JSON exported from the affiliate backend into dashboard reports.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL that relative media paths are served from. Required by `media`.
    #[arg(long, env = "MEDIA_HOST", global = true)]
    media_host: Option<String>,

    /// Currency label appended to amounts.
    #[arg(long, env = "CURRENCY", default_value = "DT", global = true)]
    currency: String,

    /// Canonical timezone used to decide what "this month" is, e.g. Africa/Tunis.
    #[arg(long, env = "TIMEZONE", global = true)]
    timezone: Option<String>,

    /// Also write DEBUG logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the image URLs in banner content.
    Media(MediaArgs),
    /// Summarise the commission history.
    Report(ReportArgs),
    /// Summarise the withdrawal history.
    Withdrawals(WithdrawalArgs),
}

#[derive(Args, Debug)]
struct MediaArgs {
    /// Banner content to resolve.
    #[arg(long, required_unless_present = "banners", conflicts_with = "banners")]
    content: Option<String>,

    /// JSON file of banners.
    #[arg(long)]
    banners: Option<PathBuf>,

    /// The backend's own origin, whose URLs are moved onto the media host.
    #[arg(long)]
    upstream_origin: Option<String>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// JSON file of transactions.
    #[arg(long)]
    transactions: PathBuf,

    /// JSON file of campaigns, used to name campaigns.
    #[arg(long)]
    campaigns: Option<PathBuf>,

    /// Only list commissions earned through this campaign. Numeric IDs match
    /// however the backend wrote them, e.g. `5.0` matches `5`.
    #[arg(long)]
    campaign_id: Option<String>,

    /// Only list commissions whose campaign name contains this text.
    #[arg(long, default_value = "")]
    query: String,

    /// Which kinds of transaction to list.
    #[arg(long = "type", value_enum, default_value_t = TypeFilter::All)]
    kind: TypeFilter,

    /// Only list transactions created in this window.
    #[arg(long, value_enum)]
    window: Option<WindowPreset>,

    /// Use this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    anchor: Option<String>,
}

#[derive(Args, Debug)]
struct WithdrawalArgs {
    /// JSON file of withdrawal requests.
    #[arg(long)]
    history: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging(cli.log_file.as_deref()) {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = AppConfig::new(
        cli.media_host.as_deref(),
        &cli.currency,
        cli.timezone.as_deref(),
    )?;
    tracing::debug!("Using {config:?}");

    match cli.command {
        Command::Media(args) => run_media(&config, args),
        Command::Report(args) => run_report(&config, args),
        Command::Withdrawals(args) => run_withdrawals(&config, &args.history),
    }
}

fn run_media(config: &AppConfig, args: MediaArgs) -> Result<(), Error> {
    let host = config.media_host()?;
    let upstream_origin = args.upstream_origin.as_deref();

    if let Some(path) = args.banners {
        let banners: Vec<Banner> = read_records(&path)?;
        return print_json(&banner_images(&banners, host, upstream_origin));
    }

    let urls = resolve_media_urls(args.content.as_deref(), host);

    match upstream_origin {
        Some(origin) => print_json(&rebase_urls(urls, origin, host)),
        None => print_json(&urls),
    }
}

fn run_report(config: &AppConfig, args: ReportArgs) -> Result<(), Error> {
    let transactions: Vec<Transaction> = read_records(&args.transactions)?;
    let campaigns: Vec<Campaign> = match &args.campaigns {
        Some(path) => read_records(path)?,
        None => Vec::new(),
    };

    let today = match args.anchor.as_deref() {
        Some(anchor) => parse_anchor_date(anchor)?,
        None => config.today()?,
    };

    let options = ReportOptions {
        campaign_id: args.campaign_id.as_deref().map(CampaignId::parse),
        query: args.query,
        kind: args.kind,
        window: args.window,
        today,
    };

    tracing::info!(
        "Building report from {} transactions and {} campaigns",
        transactions.len(),
        campaigns.len()
    );

    let report = build_transaction_report(&transactions, &campaigns, &options, config.currency());

    print_json(&report)
}

fn run_withdrawals(config: &AppConfig, history: &Path) -> Result<(), Error> {
    let records: Vec<WithdrawalRecord> = read_records(history)?;

    print_json(&build_withdrawal_report(&records, config.currency()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    println!("{json}");

    Ok(())
}
