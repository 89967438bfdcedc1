use std::{fs::File, path::PathBuf, sync::Mutex};

use catalog_search::{JsonFileSource, Normalization, SearchConfig, SearchSession};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, Level};

mod repl;

use repl::{execute_repl, render_feedback, render_page, ReplArgs};

/// Live prefix search over a catalog of named items.
#[derive(Parser, Debug)]
#[command(version, about = "Character-by-character prefix search over an item catalog.")]
struct Cli {
    /// Where to write logs.
    #[arg(long, global = true, default_value = "catalog-search.log")]
    log_file: PathBuf,
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs one query and prints the feedback.
    Query(QueryArgs),
    /// Reads queries and catalog commands line by line from stdin.
    Repl(ReplArgs),
    /// Prints one page of the catalog.
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// JSON file with a list of `{"name": ..}` items.
    #[arg(short, long)]
    catalog: Option<PathBuf>,
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the maximum number of suggestions.
    #[arg(short, long)]
    limit: Option<usize>,
    /// Overrides how names and queries are normalized.
    #[arg(long, value_enum)]
    normalization: Option<Normalization>,
}

#[derive(Args, Debug)]
struct QueryArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Print the feedback as JSON.
    #[arg(long)]
    json: bool,
    #[arg(name = "QUERY", required = true)]
    query: Vec<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(short, long, default_value_t = 1)]
    page: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = File::create(&cli.log_file)?;
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();

    debug!("Parsed arguments: {:?}", cli);

    match cli.command {
        Command::Query(args) => execute_query(args).await,
        Command::Repl(args) => execute_repl(args).await,
        Command::List(args) => execute_list(args).await,
    }
}

pub async fn load_config(args: &CommonArgs) -> anyhow::Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_file(path).await?,
        None => SearchConfig::default(),
    };
    if let Some(limit) = args.limit {
        config.suggestion_limit = limit;
    }
    if let Some(normalization) = args.normalization {
        config.normalization = normalization;
    }
    if config.page_size == 0 {
        anyhow::bail!("page_size must be at least 1");
    }
    Ok(config)
}

pub async fn load_session(args: &CommonArgs) -> anyhow::Result<SearchSession> {
    let config = load_config(args).await?;
    let session = match &args.catalog {
        Some(path) => SearchSession::from_source(&JsonFileSource::new(path), config).await?,
        None => SearchSession::new(config),
    };
    info!("Session ready with {} items", session.catalog().len());
    Ok(session)
}

async fn execute_query(args: QueryArgs) -> anyhow::Result<()> {
    let session = load_session(&args.common).await?;
    let query = args.query.join(" ");
    let feedback = session.feedback(&query);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&feedback)?);
    } else {
        print!("{}", render_feedback(&feedback));
    }
    Ok(())
}

async fn execute_list(args: ListArgs) -> anyhow::Result<()> {
    let session = load_session(&args.common).await?;
    if args.page == 0 {
        anyhow::bail!("pages start at 1");
    }
    print!("{}", render_page(&session, args.page));
    Ok(())
}
