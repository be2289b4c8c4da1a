//! Diagnostics for the flowvec CLI.
//!
//! The walk corpus is the only thing the binary prints on `stdout`, one
//! sentence per line, so it can be piped straight into a trainer. Every
//! `tracing` event and every bridged `log` record therefore goes to
//! `stderr`, as text or as one JSON object per line.

use std::{env, io, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Variable selecting how diagnostics are rendered.
pub const LOG_FORMAT_ENV: &str = "FLOWVEC_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Rendering of diagnostics on `stderr`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain text lines.
    #[default]
    Human,
    /// One JSON object per event, carrying the enclosing spans.
    Json,
}

impl LogFormat {
    /// Reads [`LOG_FORMAT_ENV`]; an unset variable selects [`LogFormat::Human`].
    ///
    /// # Errors
    /// Returns [`LoggingError`] when the value is not Unicode or names an
    /// unknown format.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(env::var(LOG_FORMAT_ENV))
    }

    fn from_lookup(lookup: Result<String, env::VarError>) -> Result<Self, LoggingError> {
        match lookup {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::Human),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Failures while setting up diagnostics.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The format variable held bytes that are not UTF-8.
    #[error("`{name}` is not valid Unicode: {source}")]
    InvalidUnicode {
        /// Variable that was read.
        name: &'static str,
        /// Error returned by [`env::var`].
        #[source]
        source: env::VarError,
    },
    /// The format variable named neither `human` nor `json`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Normalised value that was rejected.
        provided: String,
    },
    /// The global subscriber slot could not be claimed.
    #[error("could not install the diagnostics subscriber: {source}")]
    InstallFailed {
        /// Error returned by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Routes diagnostics to `stderr` once per process.
///
/// `RUST_LOG` filters events and falls back to `info`. When another
/// subscriber already owns the global slot it is left in place.
///
/// # Errors
/// Returns [`LoggingError`] when [`LOG_FORMAT_ENV`] is unreadable or
/// unsupported.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let format = LogFormat::from_env()?;
    if LogTracer::init().is_err() {
        tracing::debug!("log records are already forwarded");
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(diagnostics_layer(format, io::stderr))
        .try_init();
    if let Err(source) = installed {
        let error = LoggingError::InstallFailed { source };
        tracing::debug!(%error, "keeping existing subscriber");
    }

    INSTALLED.get_or_init(|| ());
    Ok(())
}

/// Builds the formatting layer for `format`, writing through `writer`.
///
/// Span closures are reported so slow walk phases show up with their timings.
fn diagnostics_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(writer);
    match format {
        LogFormat::Human => layer.boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    }
}
