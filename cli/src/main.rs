//! Freshcheck CLI
//!
//! Monitoring plugin that reports whether a search index received documents
//! recently enough. Exits with the conventional plugin codes: `0` OK,
//! `1` WARNING, `2` CRITICAL, and `3` when the check itself failed.
//!
//! # Usage
//!
//! ```bash
//! freshcheck --index-name 'impression-*' --critical-interval 3600 --warning-interval 600
//! freshcheck -idn 'impression-*' -sdic 3600 -stiw 600
//! ```

#![deny(unsafe_code)]

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use shared::checker::FreshnessChecker;
use shared::config::StoreConfig;
use shared::models::CheckOutcome;
use shared::storage::ElasticsearchStore;

/// Exit code reported when the check could not be carried out.
const UNKNOWN_EXIT_CODE: u8 = 3;

/// Single-dash multi-letter flags accepted for compatibility, with their long forms.
const LEGACY_FLAGS: [(&str, &str); 3] = [
    ("-sdic", "--critical-interval"),
    ("-stiw", "--warning-interval"),
    ("-idn", "--index-name"),
];

/// Checks that a search index received documents within the critical and warning windows
#[derive(Debug, Parser)]
#[command(name = "freshcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Critical interval in seconds
    #[arg(long, value_name = "SECONDS", allow_hyphen_values = true)]
    critical_interval: Option<String>,

    /// Warning interval in seconds
    #[arg(long, value_name = "SECONDS", allow_hyphen_values = true)]
    warning_interval: Option<String>,

    /// Index name
    #[arg(long, value_name = "INDEX")]
    index_name: String,

    /// Search store URL
    #[arg(long, env = "FRESHCHECK_ES_URL", default_value = "http://localhost:9200")]
    es_url: String,
}

/// Rewrites legacy single-dash flags to their long forms.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;

    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }

            for (short, long) in LEGACY_FLAGS {
                if text == short {
                    return OsString::from(long);
                }
                if let Some(value) = text.strip_prefix(short).and_then(|v| v.strip_prefix('=')) {
                    return OsString::from(format!("{long}={value}"));
                }
            }

            arg
        })
        .collect()
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<CheckOutcome> {
    let config = StoreConfig::new(cli.es_url);
    tracing::debug!(url = %config.url, index = %cli.index_name, "Starting freshness check");

    let store =
        ElasticsearchStore::new_shared(&config).context("Failed to create search store client")?;

    let outcome = FreshnessChecker::new(store).check(
        &cli.index_name,
        cli.critical_interval.as_deref(),
        cli.warning_interval.as_deref(),
    )?;

    Ok(outcome)
}

/// The single line a run writes and the code it exits with.
#[derive(Debug, PartialEq, Eq)]
enum Report {
    /// A check outcome, written to stdout.
    Status {
        /// Status line.
        line: String,
        /// 0, 1 or 2.
        code: u8,
    },
    /// The check could not be carried out. Written to stderr, exits 3.
    Unknown {
        /// Error line.
        line: String,
    },
}

impl Report {
    fn from_result(result: anyhow::Result<CheckOutcome>) -> Self {
        match result {
            Ok(outcome) => Self::Status {
                line: outcome.message(),
                code: outcome.exit_code(),
            },
            Err(e) => Self::unknown(&format!("{e:#}")),
        }
    }

    /// Folds clap's multi-line error into one line, without usage and hints.
    fn from_parse_error(error: &clap::Error) -> Self {
        let rendered = error.render().to_string();
        let summary = rendered
            .lines()
            .map(str::trim)
            .take_while(|line| !line.is_empty() && !line.starts_with("Usage:"))
            .collect::<Vec<_>>()
            .join(" ");
        let summary = summary.strip_prefix("error: ").unwrap_or(&summary);

        Self::unknown(summary)
    }

    fn unknown(message: &str) -> Self {
        Self::Unknown {
            line: format!("Unknown - {}", message.replace('\n', " ")),
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            Self::Status { code, .. } => *code,
            Self::Unknown { .. } => UNKNOWN_EXIT_CODE,
        }
    }

    fn emit(&self) -> ExitCode {
        match self {
            Self::Status { line, .. } => println!("{line}"),
            Self::Unknown { line } => eprintln!("{line}"),
        }
        ExitCode::from(self.exit_code())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => return Report::from_parse_error(&e).emit(),
    };

    Report::from_result(run(cli)).emit()
}
