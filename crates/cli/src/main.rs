use std::env;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use http_resource_engine::{HttpTransport, ResourceInput, ResourceRunner, render_output};
use http_resource_types::Verb;
use http_resource_util::{SubstitutionDictionary, redact_json};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;

mod artifacts;
mod logging;
mod settings;

use settings::RuntimeSettings;

/// Issue one HTTP request per check, in, or out step of a CI pipeline.
///
/// Installed as `check`, `in`, and `out`, the verb is taken from the
/// executable name and the remaining arguments follow it.
#[derive(Parser, Debug)]
#[command(name = "http-resource", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Discover versions
    Check,
    /// Fetch into a destination directory
    In {
        /// Directory that receives response.json
        destination: PathBuf,
    },
    /// Push to the remote
    Out {
        /// Build sources directory handed over by the orchestrator
        source_dir: Option<PathBuf>,
    },
}

impl Command {
    fn verb(&self) -> Verb {
        match self {
            Command::Check => Verb::Check,
            Command::In { .. } => Verb::In,
            Command::Out { .. } => Verb::Out,
        }
    }
}

/// Insert the verb named by the executable as the subcommand, so
/// `/opt/resource/in /tmp/dest` parses like `http-resource in /tmp/dest`.
fn dispatch_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();
    let invoked_as = args
        .first()
        .and_then(|program| Path::new(program).file_name())
        .and_then(|name| name.to_str())
        .and_then(|name| name.parse::<Verb>().ok());
    if let Some(verb) = invoked_as {
        args.insert(1, verb.as_str().into());
    }
    args
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(dispatch_args(env::args_os()));
    let settings = RuntimeSettings::from_environment();
    let verb = cli.command.verb();

    let mut payload = String::new();
    let input = io::stdin()
        .read_to_string(&mut payload)
        .context("could not read the input payload from stdin")
        .and_then(|_| Ok(ResourceInput::parse(&payload)?));

    let debug_mode = settings.debug || input.as_ref().is_ok_and(ResourceInput::debug_requested);
    match logging::init_tracing(debug_mode, &settings.log_dir) {
        Ok(Some(path)) => debug!(path = %path.display(), "writing debug log"),
        Ok(None) => {}
        Err(error) => {
            logging::init_console(LevelFilter::INFO);
            warn!("debug log disabled: {error:#}");
        }
    }

    let result = match input {
        Ok(input) => invoke(&cli.command, &settings, debug_mode, &payload, input).await,
        Err(error) => Err(error),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(command = %verb, "{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn invoke(command: &Command, settings: &RuntimeSettings, debug_mode: bool, payload: &str, input: ResourceInput) -> Result<()> {
    let verb = command.verb();
    info!(command = %verb, "starting");
    debug!(argv = ?env::args_os().collect::<Vec<_>>(), "arguments");
    debug!(
        input = %redact_json(&serde_json::json!({ "source": input.source, "params": input.params })),
        "parsed input"
    );
    if let Command::Out { source_dir: Some(source_dir) } = command {
        debug!(source_dir = %source_dir.display(), "build sources");
    }

    if debug_mode {
        let path = artifacts::dump_input(verb, payload, &settings.log_dir)?;
        debug!(path = %path.display(), "saved input payload");
    }

    let runner = ResourceRunner::new(HttpTransport, SubstitutionDictionary::from_environment());
    let outcome = runner.run(verb, &input).await?;

    if let Command::In { destination } = command {
        let path = artifacts::write_response(destination, &outcome.response.body)?;
        debug!(path = %path.display(), "wrote response");
    }

    let rendered = render_output(&outcome.envelope, &outcome.response, settings.output_mode)?;
    emit(&rendered)
}

fn emit(output: &Value) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, output).context("could not write output")?;
    writeln!(stdout).context("could not write output")?;
    stdout.flush().context("could not flush output")
}
