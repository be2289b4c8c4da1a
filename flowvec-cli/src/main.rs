//! CLI entry point for generating flowvec walk corpora.
//!
//! Parses arguments with clap, runs the command, writes the corpus to the
//! requested destination, and maps failures to a non-zero exit code. Logging
//! is initialised first so every later step can emit `tracing` diagnostics.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use flowvec_cli::{
    cli::{Cli, CliError, render_corpus, run_cli, write_corpus},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    if let Some(path) = summary.output.as_deref() {
        write_corpus(&summary, path).context("failed to write corpus")?;
        return Ok(());
    }
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_corpus(&summary.sentences, &mut writer).context("failed to render corpus")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, sampling_code) = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Core(core) => Some((Some(core.code()), core.sampling_code())),
                _ => None,
            })
            .unwrap_or((None, None));

        let code_field = code.map(|code| field::display(code.as_str()));
        let sampling_code_field = sampling_code.map(|code| field::display(code.as_str()));

        error!(
            error = %err,
            code = code_field,
            sampling_code = sampling_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
