//! Command implementations and argument parsing for the flowvec CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use flowvec_core::{
    ExecutionStrategy, Node2VecBuilder, Node2VecError, SamplingStrategy, SkipGramParams,
    WalkBudget,
};
use flowvec_providers_flow::{EdgeKind, FlowEdgeError, FlowGraphLoader, LoadReport};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "flowvec",
    about = "Generate node2vec walk corpora from program flow graphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate biased random walks over a flow-edge file.
    Walk(WalkCommand),
}

/// Options accepted by the `walk` command.
#[derive(Debug, Args, Clone)]
pub struct WalkCommand {
    /// Tab-separated `source<TAB>target<TAB>kind[<TAB>weight]` records.
    pub edges: PathBuf,

    /// Number of nodes in each walk.
    #[arg(long = "walk-length", default_value_t = 80)]
    pub walk_length: usize,

    /// Number of rounds over the node set.
    #[arg(long = "num-walks", default_value_t = 10)]
    pub num_walks: usize,

    /// Return parameter.
    #[arg(long, default_value_t = 1.0)]
    pub p: f64,

    /// In-out parameter.
    #[arg(long, default_value_t = 1.0)]
    pub q: f64,

    /// Embedding dimensions handed to the skip-gram trainer.
    #[arg(long, default_value_t = 128)]
    pub dimensions: usize,

    /// Edge attribute that carries record weights.
    #[arg(long = "weight-key", default_value = "weight")]
    pub weight_key: String,

    /// Ignore record weights and treat every edge as weight 1.
    #[arg(long)]
    pub unweighted: bool,

    /// JSON file mapping node labels to per-node overrides.
    #[arg(long, value_name = "JSON")]
    pub strategy: Option<PathBuf>,

    /// Seed for reproducible corpora.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Generate walks on the Rayon pool.
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads for a dedicated pool; implies `--parallel`.
    #[arg(long)]
    pub workers: Option<NonZeroUsize>,

    /// Stop after this many walks.
    #[arg(long = "max-walks")]
    pub max_walks: Option<usize>,

    /// Stop starting new walks after this many seconds.
    #[arg(long = "time-limit-secs")]
    pub time_limit_secs: Option<u64>,

    /// Edge kinds to keep. Repeat to keep several.
    #[arg(
        long = "edge-kind",
        value_name = "KIND",
        default_values = ["reaches", "flows-to"],
    )]
    pub edge_kinds: Vec<String>,

    /// Write the corpus here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl WalkCommand {
    /// Returns the command with default options for `edges`.
    #[must_use]
    pub fn new(edges: impl Into<PathBuf>) -> Self {
        Self {
            edges: edges.into(),
            walk_length: 80,
            num_walks: 10,
            p: 1.0,
            q: 1.0,
            dimensions: 128,
            weight_key: flowvec_core::DEFAULT_WEIGHT_KEY.to_owned(),
            unweighted: false,
            strategy: None,
            seed: None,
            parallel: false,
            workers: None,
            max_walks: None,
            time_limit_secs: None,
            edge_kinds: vec!["reaches".to_owned(), "flows-to".to_owned()],
            output: None,
        }
    }

    fn execution_strategy(&self) -> ExecutionStrategy {
        if self.parallel || self.workers.is_some() {
            ExecutionStrategy::Parallel {
                workers: self.workers,
            }
        } else {
            ExecutionStrategy::Sequential
        }
    }

    fn budget(&self) -> WalkBudget {
        let mut budget = WalkBudget::unlimited();
        if let Some(max) = self.max_walks {
            budget = budget.with_max_walks(max);
        }
        if let Some(secs) = self.time_limit_secs {
            budget = budget.with_time_limit(Duration::from_secs(secs));
        }
        budget
    }

    fn kinds(&self) -> Vec<EdgeKind> {
        self.edge_kinds
            .iter()
            .map(|raw| {
                let Ok(kind) = raw.parse::<EdgeKind>();
                kind
            })
            .collect()
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed on an input or output path.
    #[error("I/O failed on `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The edge file could not be turned into a graph.
    #[error(transparent)]
    Flow(#[from] FlowEdgeError),
    /// The strategy file is not valid override JSON.
    #[error("invalid sampling strategy in `{path}`: {source}")]
    Strategy {
        /// Path of the strategy file.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Walk generation failed.
    #[error(transparent)]
    Core(#[from] Node2VecError),
}

/// Outcome of the `walk` command.
#[derive(Debug, Clone)]
pub struct WalkSummary {
    /// Walks as node labels, one sentence per walk.
    pub sentences: Vec<Vec<String>>,
    /// Counts gathered while loading the edge file.
    pub load: LoadReport,
    /// Parameters a skip-gram trainer should use for this corpus.
    pub skip_gram: SkipGramParams,
    /// Destination requested on the command line.
    pub output: Option<PathBuf>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading or walk generation fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use flowvec_cli::cli::{Cli, Command, WalkCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "a\tb\tREACHES\nb\tc\tFLOWS_TO\n")?;
/// let mut walk = WalkCommand::new(file.path());
/// walk.num_walks = 2;
/// walk.walk_length = 4;
/// walk.seed = Some(1);
/// let summary = run_cli(Cli { command: Command::Walk(walk) })?;
/// assert_eq!(summary.sentences.len(), 6);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<WalkSummary, CliError> {
    match cli.command {
        Command::Walk(walk) => {
            Span::current().record("command", field::display("walk"));
            run_walk(walk)
        }
    }
}

#[instrument(
    name = "cli.walk",
    err,
    skip(command),
    fields(edges = field::Empty, seeded = command.seed.is_some()),
)]
pub(super) fn run_walk(command: WalkCommand) -> Result<WalkSummary, CliError> {
    Span::current().record("edges", field::display(command.edges.display()));

    let strategy = match &command.strategy {
        Some(path) => load_strategy(path)?,
        None => SamplingStrategy::new(),
    };
    let weight_key = (!command.unweighted).then(|| command.weight_key.clone());

    let mut builder = Node2VecBuilder::new()
        .with_walk_length(command.walk_length)
        .with_num_walks(command.num_walks)
        .with_p(command.p)
        .with_q(command.q)
        .with_dimensions(command.dimensions)
        .with_weight_key(weight_key)
        .with_sampling_strategy(strategy)
        .with_execution_strategy(command.execution_strategy())
        .with_budget(command.budget());
    if let Some(seed) = command.seed {
        builder = builder.with_seed(seed);
    }
    let node2vec = builder.build()?;

    let loader = FlowGraphLoader::new()
        .with_kinds(command.kinds())
        .with_weight_key(command.weight_key.clone());
    let (graph, load) = loader.load_reader(open_reader(&command.edges)?)?;

    let sentences = node2vec.walks(&graph)?.to_labels(&graph);
    let skip_gram = node2vec.skip_gram_params();
    info!(
        sentences = sentences.len(),
        vector_size = skip_gram.vector_size().get(),
        sg = skip_gram.sg(),
        "corpus ready for skip-gram training"
    );
    Ok(WalkSummary {
        sentences,
        load,
        skip_gram,
        output: command.output,
    })
}

#[instrument(name = "cli.load_strategy", err, fields(path = %path.display()))]
pub(super) fn load_strategy(path: &Path) -> Result<SamplingStrategy, CliError> {
    let strategy: SamplingStrategy =
        serde_json::from_reader(open_reader(path)?).map_err(|source| CliError::Strategy {
            path: path.to_path_buf(),
            source,
        })?;
    info!(overrides = strategy.len(), "sampling strategy loaded");
    Ok(strategy)
}

fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Writes one walk per line, labels separated by single spaces.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use flowvec_cli::cli::render_corpus;
/// let sentences = vec![
///     vec!["a".to_owned(), "b".to_owned()],
///     vec!["c".to_owned()],
/// ];
/// let mut buffer = Vec::new();
/// render_corpus(&sentences, &mut buffer)?;
/// assert_eq!(String::from_utf8_lossy(&buffer), "a b\nc\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_corpus(sentences: &[Vec<String>], mut writer: impl Write) -> io::Result<()> {
    for sentence in sentences {
        writeln!(writer, "{}", sentence.join(" "))?;
    }
    Ok(())
}

/// Writes the corpus of `summary` to `path`, replacing any existing file.
///
/// # Errors
/// Returns [`CliError::Io`] when the file cannot be created or written.
#[instrument(name = "cli.write_corpus", err, skip(summary), fields(path = %path.display()))]
pub fn write_corpus(summary: &WalkSummary, path: &Path) -> Result<(), CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    render_corpus(&summary.sentences, &mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)
}
