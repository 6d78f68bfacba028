//! Command-line front end: render, print and name receipts from JSON requests.

pub mod output;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::runtime::Runtime;
use tracing::info;

use crate::{
    config::{ConfigManager, ReceiptConfig, CONFIG_KEYS},
    errors::ReceiptError,
    present::{PresentOutcome, SystemPresenter},
    receipt::{self, ReceiptBuilder, ReceiptFormat, ReceiptRequest},
    utils::{build_info, ensure_dir},
};

/// Overrides the platform PDF viewer used by `print`.
pub const VIEWER_ENV: &str = "PARISH_RECEIPTS_VIEWER";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{failed} of {total} receipts could not be rendered")]
    Partial { failed: usize, total: usize },
}

impl CliError {
    pub fn is_usage(&self) -> bool {
        matches!(self, CliError::Usage(_))
    }
}

pub type CliResult<T = ()> = Result<T, CliError>;

pub const USAGE: &str = "Usage: parish_receipts_cli <command>\n\
     Commands:\n  \
     render <request.json>... [--format <full-page|thermal-80|thermal-58>] [--out <dir>]\n  \
     print <request.json> [--format <format>]\n  \
     filename <request.json>\n  \
     config [show|set <key> <value>]\n  \
     version";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Render {
        requests: Vec<PathBuf>,
        format: Option<ReceiptFormat>,
        out: Option<PathBuf>,
    },
    Print {
        request: PathBuf,
        format: Option<ReceiptFormat>,
    },
    FileName {
        request: PathBuf,
    },
    ConfigShow,
    ConfigSet {
        key: String,
        value: String,
    },
    Version,
}

impl Command {
    pub fn parse<I, S>(args: I) -> CliResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let command = args
            .next()
            .ok_or_else(|| CliError::Usage("missing command".into()))?;
        let rest: Vec<String> = args.collect();

        match command.as_str() {
            "render" => {
                let (paths, format, out) = parse_render_args(&rest)?;
                if paths.is_empty() {
                    return Err(CliError::Usage("render needs at least one request file".into()));
                }
                Ok(Command::Render {
                    requests: paths,
                    format,
                    out,
                })
            }
            "print" => {
                let (mut paths, format, out) = parse_render_args(&rest)?;
                if paths.len() != 1 || out.is_some() {
                    return Err(CliError::Usage("print takes exactly one request file".into()));
                }
                Ok(Command::Print {
                    request: paths.remove(0),
                    format,
                })
            }
            "filename" => match rest.as_slice() {
                [path] => Ok(Command::FileName {
                    request: PathBuf::from(path),
                }),
                _ => Err(CliError::Usage("filename takes exactly one request file".into())),
            },
            "config" => match rest.first().map(String::as_str) {
                None | Some("show") => Ok(Command::ConfigShow),
                Some("set") if rest.len() >= 3 => Ok(Command::ConfigSet {
                    key: rest[1].clone(),
                    value: rest[2..].join(" "),
                }),
                Some("set") => Err(CliError::Usage(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                ))),
                Some(other) => Err(CliError::Usage(format!("unknown config action `{other}`"))),
            },
            "version" | "--version" | "-V" => Ok(Command::Version),
            other => Err(CliError::Usage(format!("unknown command `{other}`"))),
        }
    }
}

fn parse_render_args(
    args: &[String],
) -> CliResult<(Vec<PathBuf>, Option<ReceiptFormat>, Option<PathBuf>)> {
    let mut paths = Vec::new();
    let mut format = None;
    let mut out = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--format" | "-f" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--format needs a value".into()))?;
                format = Some(value.parse::<ReceiptFormat>()?);
            }
            "--out" | "-o" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--out needs a directory".into()))?;
                out = Some(PathBuf::from(value));
            }
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option `{flag}`")));
            }
            path => paths.push(PathBuf::from(path)),
        }
    }
    Ok((paths, format, out))
}

/// Entry point used by the `parish_receipts_cli` binary.
pub fn run_cli() -> CliResult {
    let command = Command::parse(env::args().skip(1))?;
    let manager = ConfigManager::new()?;
    execute(command, &manager)
}

pub fn execute(command: Command, manager: &ConfigManager) -> CliResult {
    match command {
        Command::Render {
            requests,
            format,
            out,
        } => {
            let config = manager.load()?;
            let out_dir = out.unwrap_or_else(|| manager.output_dir(&config));
            render_all(&config, &requests, format, &out_dir)
        }
        Command::Print { request, format } => {
            let config = manager.load()?;
            print_one(&config, &request, format)
        }
        Command::FileName { request } => {
            let request = read_request(&request)?;
            let transaction = request
                .transaction
                .as_ref()
                .ok_or_else(|| ReceiptError::invalid("receipt request has no transaction"))?;
            println!("{}", receipt::file_name(transaction));
            Ok(())
        }
        Command::ConfigShow => {
            let config = manager.load()?;
            output::section("Receipt configuration");
            println!("{}", serde_json::to_string_pretty(&config).map_err(ReceiptError::from)?);
            output::info(format!("stored at {}", manager.path().display()));
            Ok(())
        }
        Command::ConfigSet { key, value } => {
            let mut config = manager.load()?;
            config.set(&key, &value)?;
            manager.save(&config)?;
            output::success(format!("{key} updated"));
            Ok(())
        }
        Command::Version => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
    }
}

fn runtime() -> CliResult<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn read_request(path: &Path) -> CliResult<ReceiptRequest> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data).map_err(ReceiptError::from)?)
}

fn builder(config: &ReceiptConfig) -> ReceiptBuilder {
    ReceiptBuilder::new(config.receipt_settings())
}

/// Renders every request in turn; one bad file does not stop the rest.
fn render_all(
    config: &ReceiptConfig,
    requests: &[PathBuf],
    format: Option<ReceiptFormat>,
    out_dir: &Path,
) -> CliResult {
    ensure_dir(out_dir)?;
    let runtime = runtime()?;
    let builder = builder(config);
    let mut failed = 0;

    for path in requests {
        let result = runtime.block_on(render_one(&builder, config, path, format, out_dir));
        match result {
            Ok(written) => output::success(format!("wrote {}", written.display())),
            Err(err) => {
                failed += 1;
                output::error(format!("{}: {err}", path.display()));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Partial {
            failed,
            total: requests.len(),
        });
    }
    Ok(())
}

async fn render_one(
    builder: &ReceiptBuilder,
    config: &ReceiptConfig,
    path: &Path,
    format: Option<ReceiptFormat>,
    out_dir: &Path,
) -> CliResult<PathBuf> {
    let mut request = read_request(path)?;
    if let Some(format) = format {
        request.format = Some(format.as_tag().to_string());
    }
    let document = builder
        .build_request(&request, Some(config.default_format))
        .await?;
    let target = out_dir.join(&document.file_name);
    fs::write(&target, receipt::to_bytes(&document)?)?;
    info!(path = %target.display(), "receipt written");

    if config.auto_print {
        report_presentation(receipt::present(&document, &presenter())?);
    }
    Ok(target)
}

fn print_one(config: &ReceiptConfig, path: &Path, format: Option<ReceiptFormat>) -> CliResult {
    let mut request = read_request(path)?;
    if let Some(format) = format {
        request.format = Some(format.as_tag().to_string());
    }
    let builder = builder(config);
    let document =
        runtime()?.block_on(builder.build_request(&request, Some(config.default_format)))?;
    report_presentation(receipt::present(&document, &presenter())?);
    Ok(())
}

fn presenter() -> SystemPresenter {
    match env::var(VIEWER_ENV) {
        Ok(viewer) => SystemPresenter::new().with_viewer(viewer),
        Err(_) => SystemPresenter::new(),
    }
}

fn report_presentation(outcome: PresentOutcome) {
    match outcome {
        PresentOutcome::Opened(path) => {
            output::success(format!("sent {} to the viewer for printing", path.display()))
        }
        PresentOutcome::Skipped(reason) => {
            output::warning(format!("print skipped: {reason}"))
        }
    }
}
