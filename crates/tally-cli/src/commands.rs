use anyhow::{bail, Context};
use colored::Colorize;

use tally_rank::top_n;
use tally_server::{ServerConfig, TallyServer};
use tally_store::{FileRecordStore, RecordStore};
use tally_types::{ScoreRecord, Submission};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::Scores(args) => cmd_scores(&config, args, &cli.format),
        Command::Submit(args) => cmd_submit(&config, args),
        Command::Check => cmd_check(&config),
        Command::Reset(args) => cmd_reset(&config, args),
    }
}

/// Config file (or defaults), then the global `--db` override.
fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    Ok(config)
}

fn open_store(config: &ServerConfig) -> anyhow::Result<FileRecordStore> {
    FileRecordStore::open(&config.db_path)
        .with_context(|| format!("cannot open score file {}", config.db_path.display()))
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(top) = args.top {
        config.top_n = top;
    }
    let server = TallyServer::open(config)?;
    println!(
        "Tally server on {} (scores: {})",
        server.config().bind_addr.to_string().bold(),
        server.config().db_path.display()
    );
    tokio::runtime::Runtime::new()?.block_on(server.serve())?;
    Ok(())
}

fn cmd_scores(config: &ServerConfig, args: ScoresArgs, format: &OutputFormat) -> anyhow::Result<()> {
    // Reading needs no initialization pass; a live server may share the file.
    let store = FileRecordStore::new(&config.db_path);
    let top = top_n(&store.read_all(), args.limit.unwrap_or(config.top_n));
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&top)?),
        OutputFormat::Text => print_leaderboard(&top),
    }
    Ok(())
}

fn print_leaderboard(top: &[ScoreRecord]) {
    if top.is_empty() {
        println!("No scores yet.");
        return;
    }
    for (rank, record) in top.iter().enumerate() {
        let place = format!("{:>2}.", rank + 1);
        let place = match rank {
            0 => place.yellow().bold(),
            1 | 2 => place.bold(),
            _ => place.normal(),
        };
        println!("{place} {} {}", record.name.bold(), record.score.to_string().cyan());
    }
}

fn cmd_submit(config: &ServerConfig, args: SubmitArgs) -> anyhow::Result<()> {
    let record = Submission::new(args.name, args.score).validate()?;
    let store = open_store(config)?;
    store.append(record.clone())?;
    println!("{} Saved {}", "✓".green().bold(), record.to_string().bold());
    Ok(())
}

fn cmd_check(config: &ServerConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    println!(
        "{} {} holds {} record(s)",
        "✓".green().bold(),
        store.path().display(),
        store.len().to_string().bold()
    );
    Ok(())
}

fn cmd_reset(config: &ServerConfig, args: ResetArgs) -> anyhow::Result<()> {
    if !args.yes {
        bail!("refusing to delete every score without --yes");
    }
    let store = open_store(config)?;
    let removed = store.len();
    store.reset()?;
    println!("{} Removed {} record(s)", "✓".green().bold(), removed);
    Ok(())
}
