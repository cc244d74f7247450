use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ofx_ingest::Ofx102Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod decode;
mod render;

use config::{Config, load_config};

#[derive(Parser, Debug)]
#[command(name = "ofx", version, about = "Read OFX 1.0.2 bank statements")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the header block
    Headers {
        /// Path to the .ofx file
        file: PathBuf,
    },

    /// Print sign-on, account, balances and transactions
    Show {
        file: PathBuf,

        /// Max transactions to print (default from config, 50)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print headers, sign-on and account as JSON
    Json {
        file: PathBuf,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.ofx102/config.toml with defaults
    Init,

    /// Print the effective config
    Show,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    headers: Option<&'a ofx_ingest::Headers>,
    sign_on: &'a ofx_core::SignOn,
    account: &'a ofx_core::Account,
}

fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn open(file: &Path) -> Result<Ofx102Parser> {
    let raw = decode::read_document(file)?;
    Ofx102Parser::from_document(&raw).with_context(|| format!("parsing {}", file.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    init_tracing(&cfg);

    match cli.command {
        Command::Headers { file } => {
            let ofx = open(&file)?;
            print!("{}", render::headers(ofx.headers()));
        }

        Command::Show { file, limit } => {
            let ofx = open(&file)?;
            let sign_on = ofx.sign_on().context("reading sign-on")?;
            let account = ofx.account().context("reading account")?;
            let limit = limit.unwrap_or(cfg.output.max_rows);
            print!(
                "{}",
                render::summary(sign_on, account, limit, &cfg.output.date_format)
            );
        }

        Command::Json { file, compact } => {
            let ofx = open(&file)?;
            let report = JsonReport {
                headers: ofx.headers(),
                sign_on: ofx.sign_on().context("reading sign-on")?,
                account: ofx.account().context("reading account")?,
            };
            let json = if compact || !cfg.output.pretty_json {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}
