use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use hllrcon_api::{ClientOptions, ConsoleClient};
use hllrcon_engine::{
    ConnectParams, ConnectionGate, Dispatcher, Presentation, ProvidedValues, RequestTransport, SessionManager, build_request,
    collect_values,
};
use hllrcon_registry::CommandRegistry;
use hllrcon_tui::TuiOptions;
use hllrcon_util::config::default_config_path;
use hllrcon_util::{ConsoleConfig, config_root, expand_tilde};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_PATH_ENV: &str = "HLLRCON_LOG_PATH";

#[derive(Debug, Parser)]
#[command(name = "hllrcon", version, about = "Console for the HLL RCON administration API")]
struct Cli {
    /// Base URL of the administration API (overrides config and environment).
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    /// Existing session id to send as the `hll_session` cookie.
    #[arg(long, global = true, value_name = "ID")]
    session: Option<String>,

    /// Starts the interactive console when omitted.
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// List the command catalog.
    Commands {
        /// Dump the catalog as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Execute one command headlessly.
    Run(RunArgs),
    /// Open a session against a game server.
    Connect(ConnectArgs),
    /// Close the current session.
    Disconnect,
    /// Show the session's connection status.
    Status,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Command name, e.g. `KickPlayer`.
    name: String,
    /// Field value as `name=value`; repeat for each field.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    values: Vec<(String, String)>,
    /// Print the request that would be sent and stop.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct ConnectArgs {
    #[arg(long)]
    host: String,
    #[arg(long)]
    port: String,
    #[arg(long)]
    password: String,
    /// Store the new session id in the config file.
    #[arg(long)]
    save: bool,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();
    if let Err(error) = init_tracing(interactive) {
        eprintln!("failed to initialise logging: {error:#}");
    }

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Headless commands log to stderr; the TUI logs to a file so the screen
/// stays intact.
fn init_tracing(interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(());
    }

    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn log_path() -> PathBuf {
    match std::env::var(LOG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => expand_tilde(&path),
        _ => config_root().join("hllrcon.log"),
    }
}

fn load_config(cli: &Cli) -> Result<ConsoleConfig> {
    let mut config = ConsoleConfig::load().context("load config")?;
    if let Some(api_base) = cli.api_base.as_deref() {
        config.api_base = api_base.to_string();
    }
    if let Some(session) = cli.session.as_deref() {
        config.session_id = Some(session.to_string());
    }
    Ok(config)
}

fn build_client(config: &ConsoleConfig) -> Result<ConsoleClient> {
    let options = ClientOptions {
        base_url: config.api_base.clone(),
        session_id: config.session_id.clone(),
        timeout: config.request_timeout(),
        allow_insecure: config.allow_insecure,
    };
    ConsoleClient::new(&options).with_context(|| format!("configure client for {}", config.api_base))
}

/// Gate, dispatcher and session manager over one client.
fn wire(client: ConsoleClient) -> (Dispatcher, SessionManager) {
    let gate = ConnectionGate::new();
    let transport: Arc<dyn RequestTransport> = Arc::new(client);
    let dispatcher = Dispatcher::new(Arc::clone(&transport), gate.reader());
    (dispatcher, SessionManager::new(transport, gate))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let registry = Arc::new(CommandRegistry::builtin());
    let config = load_config(&cli)?;

    let Some(command) = cli.command else {
        let client = build_client(&config)?;
        hllrcon_tui::run(TuiOptions {
            client,
            registry,
            default_host: config.default_host.clone(),
            default_port: config.default_port,
        })
        .await?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        CliCommand::Commands { json } => {
            print_commands(&registry, json)?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Run(args) => run_command(&registry, &config, args).await,
        CliCommand::Connect(args) => connect(&config, args).await,
        CliCommand::Disconnect => {
            let (_, sessions) = wire(build_client(&config)?);
            sessions.disconnect().await.context("disconnect")?;
            println!("Disconnected successfully");
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Status => {
            let (_, sessions) = wire(build_client(&config)?);
            let status = sessions.refresh_status().await;
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(if status.connected { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn print_commands(registry: &CommandRegistry, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(registry)?);
        return Ok(());
    }

    let width = 100;
    let indent = " ".repeat(36);
    let options = textwrap::Options::new(width).initial_indent(&indent).subsequent_indent(&indent);
    for section in &registry.sections {
        println!("{}", section.title);
        for command in &section.commands {
            let head = format!("  {:<6} {}", command.method.as_str(), command.name);
            let description = textwrap::fill(&command.description, &options);
            if head.len() < indent.len() {
                println!("{head}{}", description.get(head.len()..).unwrap_or_default());
            } else {
                println!("{head}\n{description}");
            }
        }
        println!();
    }
    Ok(())
}

async fn run_command(registry: &CommandRegistry, config: &ConsoleConfig, args: RunArgs) -> Result<ExitCode> {
    let Some((_, command)) = registry.find_by_name(&args.name) else {
        bail!("unknown command '{}'; see `hllrcon commands`", args.name);
    };
    let values: ProvidedValues = args.values.into_iter().collect();
    let unknown = values.unknown_fields(command);
    if !unknown.is_empty() {
        bail!("{} has no field(s): {}", command.name, unknown.join(", "));
    }

    if args.dry_run {
        let collected = collect_values(command, &values)?;
        let request = build_request(command, collected)?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(ExitCode::SUCCESS);
    }

    let (dispatcher, sessions) = wire(build_client(config)?);
    let status = sessions.refresh_status().await;
    debug!(connected = status.connected, "session status before dispatch");

    let presentation = match dispatcher.dispatch(command, &values).await {
        Ok(outcome) => Presentation::from_outcome(&outcome),
        Err(error) => Presentation::from_error(&error),
    };
    Ok(print_presentation(&presentation))
}

fn print_presentation(presentation: &Presentation) -> ExitCode {
    if presentation.is_error() {
        eprintln!("{}", presentation.text());
        ExitCode::FAILURE
    } else {
        println!("{}", presentation.text());
        ExitCode::SUCCESS
    }
}

async fn connect(config: &ConsoleConfig, args: ConnectArgs) -> Result<ExitCode> {
    let params = ConnectParams::parse(&args.host, &args.port, &args.password)?;
    let (_, sessions) = wire(build_client(config)?);
    let receipt = sessions.connect(&params).await.context("connect")?;
    info!(host = %params.host, port = params.port, "connected");

    let Some(session_id) = receipt.session_id else {
        println!("Connected; the server did not return a session id");
        return Ok(ExitCode::SUCCESS);
    };
    println!("{session_id}");

    if args.save {
        let path = default_config_path();
        store_session(&path, session_id)?;
        eprintln!("Session saved to {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

/// Write `session_id` into the config file at `path`, keeping every other
/// setting. A file that cannot be parsed is left untouched.
fn store_session(path: &Path, session_id: String) -> Result<()> {
    let mut stored = ConsoleConfig::load_strict(path)
        .with_context(|| format!("refusing to overwrite {}: it could not be read as a config file", path.display()))?;
    stored.session_id = Some(session_id);
    stored.save_to(path).with_context(|| format!("write {}", path.display()))
}
