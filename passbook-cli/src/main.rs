use anyhow::Result;
use clap::{Parser, Subcommand};
use passbook_core::{ExtractResponse, Institution};
use passbook_ingest::{Classifier, Extractor, InvestmentRequest, PlainTextExtractor};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod state;

use config::Config;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PASSBOOK_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "passbook", version = VERSION, about = "Extract transactions and holdings from financial statements")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from a bank or credit card statement
    Extract {
        /// Statement PDF (or text file with --text)
        file: PathBuf,

        #[arg(long, default_value = "")]
        password: String,

        /// hdfc, hdfc_account, axis or auto (default from config)
        #[arg(long)]
        institution: Option<String>,

        /// bank_statement or credit_card (default from config)
        #[arg(long)]
        document_type: Option<String>,

        /// Input is already extracted text
        #[arg(long)]
        text: bool,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },

    /// Extract holdings and portfolio tables from an investment statement
    Investment {
        file: PathBuf,

        #[arg(long, default_value = "")]
        password: String,

        #[arg(long, default_value = "cas")]
        statement_type: String,

        #[arg(long)]
        institution: Option<String>,

        /// Accepted in place of --institution
        #[arg(long)]
        broker: Option<String>,

        #[arg(long)]
        text: bool,

        #[arg(long)]
        compact: bool,
    },

    /// Report which institution layout a statement matches
    Classify {
        file: PathBuf,

        #[arg(long, default_value = "")]
        password: String,

        #[arg(long)]
        text: bool,
    },

    /// Manage ~/.passbook/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Debug, Serialize)]
struct Classification {
    institution: Institution,
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();
}

fn build_extractor(cfg: &Config, text: bool) -> Extractor {
    let extractor = Extractor::new().with_classifier(Classifier::with_rules(cfg.classifier.rules.clone()));
    if text {
        extractor.with_text_extractor(PlainTextExtractor)
    } else {
        extractor
    }
}

/// Print the response and map it to the process exit code
fn emit<T: Serialize>(response: &ExtractResponse<T>, pretty: bool) -> Result<ExitCode> {
    let out = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    println!("{}", out);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else if response.is_client_error() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_tracing(&cfg.log.filter);
    debug!(
        filter = %cfg.log.filter,
        classifier_rules = cfg.classifier.rules.len(),
        "config loaded"
    );

    match cli.command {
        Command::Extract {
            file,
            password,
            institution,
            document_type,
            text,
            compact,
        } => {
            let extractor = build_extractor(&cfg, text);
            let bytes = state::read_document(&file)?;
            let institution = institution.unwrap_or_else(|| cfg.extract.institution.clone());
            let document_type = document_type.unwrap_or_else(|| cfg.extract.document_type.clone());

            let response = extractor.extract(&bytes, &password, &institution, &document_type);
            emit(&response, cfg.extract.pretty && !compact)
        }

        Command::Investment {
            file,
            password,
            statement_type,
            institution,
            broker,
            text,
            compact,
        } => {
            let extractor = build_extractor(&cfg, text);
            let bytes = state::read_document(&file)?;
            let request = InvestmentRequest {
                statement_type,
                institution,
                broker,
            };

            let response = extractor.extract_investment(&bytes, &password, &request);
            emit(&response, cfg.extract.pretty && !compact)
        }

        Command::Classify { file, password, text } => {
            let extractor = build_extractor(&cfg, text);
            let bytes = state::read_document(&file)?;
            let result = extractor
                .document_text(&bytes, &password)
                .map(|text| Classification {
                    institution: extractor.classify(&text),
                });

            emit(&ExtractResponse::from(result), cfg.extract.pretty)
        }

        Command::Config { command } => {
            match command {
                ConfigCommand::Init => config::init_config()?,
                ConfigCommand::Show => {
                    println!("# {}", config::config_path()?.display());
                    print!("{}", toml::to_string_pretty(&cfg)?);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
