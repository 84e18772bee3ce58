use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use serde_json::json;

use grounded_dispatch::config::{self, AppConfig, CONFIG_FILE};
use grounded_dispatch::executor::normalizer;
use grounded_dispatch::journal::{DispatchJournal, JournalEntry};
use grounded_dispatch::operation::parser::parse_line;
use grounded_dispatch::operation::types::ScreenSize;
use grounded_dispatch::{
    DispatchError, DispatchResult, Dispatcher, EnigoBackend, GroundedOperation, MetaOperation,
    SystemRunner,
};

#[derive(Parser, Debug)]
#[command(
    name = "grounded-dispatch",
    version,
    about = "Execute grounded GUI operations (CLICK, TYPE, LAUNCH, ...) on the local desktop"
)]
struct Cli {
    /// Config file; defaults to the standard lookup path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch one operation or a file of operations.
    Run(RunArgs),
    /// Normalize without touching the desktop.
    Preview(PreviewArgs),
    /// List registered operations and their required fields.
    Operations,
    /// Write the default configuration.
    #[command(name = "init-config")]
    InitConfig {
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["op", "text", "file"])))]
struct RunArgs {
    /// Operation as JSON, e.g. '{"operation":"CLICK","box":[10,20,30,40]}'.
    #[arg(long)]
    op: Option<String>,

    /// Operation in model text form, e.g. "CLICK(box=[[10,20,30,40]])".
    #[arg(long)]
    text: Option<String>,

    /// One operation per line (JSON or text); '-' reads stdin.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["op", "text"])))]
struct PreviewArgs {
    /// Screen size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_screen)]
    screen: ScreenSize,

    #[arg(long)]
    op: Option<String>,

    #[arg(long)]
    text: Option<String>,
}

fn parse_screen(raw: &str) -> Result<ScreenSize, String> {
    let (w, h) = raw
        .split_once(|c| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("bad height {h:?}: {e}"))?;
    Ok(ScreenSize::new(width, height))
}

fn main() {
    let _ = dotenvy::dotenv();
    grounded_dispatch::init_tracing("info");

    if let Err(err) = run() {
        tracing::error!(error = %err, "dispatch failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> DispatchResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = config::load_config(cli.config.as_deref())?;
            command_run(args, &config)
        }
        Commands::Preview(args) => command_preview(args),
        Commands::Operations => print_operations(),
        Commands::InitConfig { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
            config::save_config(&AppConfig::default(), &path)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn read_operations(args: &RunArgs) -> DispatchResult<Vec<GroundedOperation>> {
    if let Some(op) = &args.op {
        return Ok(vec![serde_json::from_str(op)?]);
    }
    if let Some(text) = &args.text {
        return Ok(vec![parse_line(text)?]);
    }

    let reader: Box<dyn BufRead> = match args.file.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            Box::new(BufReader::new(std::fs::File::open(path)?))
        }
        _ => Box::new(BufReader::new(std::io::stdin())),
    };
    let mut ops = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let op = parse_line(trimmed)
            .map_err(|e| DispatchError::Parse(format!("line {}: {e}", n + 1)))?;
        ops.push(op);
    }
    Ok(ops)
}

fn command_run(args: RunArgs, config: &AppConfig) -> DispatchResult<()> {
    let ops = read_operations(&args)?;
    tracing::info!(count = ops.len(), "operations queued");

    let backend = EnigoBackend::new(config.executor.action_pause())?;
    let mut dispatcher = Dispatcher::new(
        backend,
        SystemRunner,
        config.executor.clone(),
        config.launch.clone(),
    );
    let journal = config
        .journal
        .enabled
        .then(|| DispatchJournal::new(config.journal.dir.as_deref()));
    if let Some(j) = &journal {
        tracing::info!(session = %j.session_id, path = %j.path().display(), "journal enabled");
    }

    for op in &ops {
        let (normalized, result) = match dispatcher.normalize(op) {
            Ok(n) => {
                let result = dispatcher.dispatch_normalized(&n);
                (Some(n), result)
            }
            Err(e) => (None, Err(e)),
        };

        if let Some(j) = &journal {
            let outcome = result.as_ref().map(|_| ()).map_err(ToString::to_string);
            let entry = JournalEntry::new(op.operation.clone(), normalized, outcome);
            if let Err(e) = j.record(&entry) {
                tracing::warn!(error = %e, "journal write failed");
            }
        }

        let meta = result?;
        println!("{meta}");
        if meta == MetaOperation::End {
            break;
        }
    }
    Ok(())
}

fn read_single(op: &Option<String>, text: &Option<String>) -> DispatchResult<GroundedOperation> {
    match (op, text) {
        (Some(op), _) => Ok(serde_json::from_str(op)?),
        (None, Some(text)) => parse_line(text),
        (None, None) => Err(DispatchError::Parse("no operation given".into())),
    }
}

fn command_preview(args: PreviewArgs) -> DispatchResult<()> {
    let op = read_single(&args.op, &args.text)?;
    let screen = args.screen;
    let normalized = normalizer::normalize(&op, || Ok(screen))?;
    let out = json!({
        "screen": screen,
        "normalized": normalized,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn print_operations() -> DispatchResult<()> {
    let rows: Vec<_> = MetaOperation::ALL
        .iter()
        .map(|op| {
            json!({
                "operation": op.name(),
                "required": op.required_fields(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
