use acavox_common::intent::matcher::IntentMatcher;
use acavox_common::protocol::Intent;
use acavox_engine::cli::{self, FileOptions, OutputHandlers, ReplOptions};
use acavox_engine::config::{ConfigLoader, ConsoleConfig};
use acavox_engine::console::Console;
use acavox_engine::http::HttpBackend;
use acavox_engine::speech::NullEngine;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "acavox", version, about = "Voice console for an academic records backend")]
struct Args {
    #[command(subcommand)]
    command: Option<Cmd>,

    /// Backend base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token for the backend (overrides config)
    #[arg(long)]
    token: Option<String>,

    /// Config file (default: ./acavox.yaml, then ~/.acavox/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script of commands to execute (non-interactive mode)
    #[arg(long)]
    file: Option<String>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Parse a command offline and print the intent + slots as JSON
    Parse {
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr so stdout stays clean for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if let Some(Cmd::Parse { text }) = args.command {
        return run_parse(&text.join(" "));
    }

    let mut config: ConsoleConfig = match &args.config {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(token) = args.token {
        config.token = Some(token);
    }

    let mut backend = HttpBackend::new(
        &config.api_url,
        config.token.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    let mut console = Console::new(Box::new(NullEngine));

    let output = OutputHandlers {
        out: |msg| println!("{}", msg),
        err: |msg| println!("{}", msg),
    };
    let repl_options = ReplOptions {
        banner_lines: &[
            "Connected console. Enter commands (e.g., 'list students', 'list courses').",
            "Type 'help' for built-ins, 'history' for past commands.",
            "Type 'exit' or 'quit' to close.",
        ],
        prompt: "> ",
        exit_commands: &["exit", "quit"],
    };

    if let Some(file_path) = args.file {
        if let Err(e) = cli::run_file(
            &mut console,
            &mut backend,
            output,
            &file_path,
            FileOptions {
                stop_on_error: false,
            },
        )
        .await
        {
            eprintln!("Error executing file {}: {}", file_path, e);
            return Err(e);
        }
    } else if let Err(e) = cli::run_repl(&mut console, &mut backend, output, repl_options).await {
        eprintln!("Error during session: {}", e);
        return Err(e);
    }

    Ok(())
}

fn run_parse(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let matcher = IntentMatcher::new();
    let parsed = matcher.parse(text);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    if parsed.intent == Intent::Unknown
        && let Some(hint) = matcher.suggest(text)
    {
        println!("Did you mean: {hint}");
    }
    Ok(())
}
