use std::{fs, io::Write, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::EnvFilter;

use agent_search_domain::{Candidate, RankedResult, WeightOverrides, Weights, rank_explained_at};

/// Ranks a JSON array of `{agent, relevanceScore}` candidates and prints them best-first.
#[derive(Debug, Parser)]
#[command(
	version = agent_search_cli::VERSION,
	rename_all = "kebab",
	styles = agent_search_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'i', value_name = "FILE")]
	pub input: PathBuf,
	/// Takes base weights from `[ranking.weights]` instead of the built-in defaults.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
	#[arg(long, value_name = "WEIGHT", allow_negative_numbers = true)]
	pub relevance: Option<f64>,
	#[arg(long, value_name = "WEIGHT", allow_negative_numbers = true)]
	pub reputation: Option<f64>,
	#[arg(long, value_name = "WEIGHT", allow_negative_numbers = true)]
	pub recency: Option<f64>,
	#[arg(long, value_name = "WEIGHT", allow_negative_numbers = true)]
	pub service_count: Option<f64>,
	/// Reference instant for recency, RFC 3339. Defaults to the current time.
	#[arg(long, value_name = "RFC3339")]
	pub now: Option<String>,
	/// Include each candidate's normalized factors.
	#[arg(long)]
	pub explain: bool,
	#[arg(long, default_value = "warn", value_name = "FILTER")]
	pub log_level: String,
}
impl Args {
	pub fn overrides(&self) -> WeightOverrides {
		WeightOverrides {
			relevance: self.relevance,
			reputation: self.reputation,
			recency: self.recency,
			service_count: self.service_count,
		}
	}
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let output = execute(&args)?;
	let mut stdout = std::io::stdout().lock();

	writeln!(stdout, "{output}")?;

	Ok(())
}

/// Produces the pretty-printed JSON that [`run`] writes to stdout.
pub fn execute(args: &Args) -> color_eyre::Result<String> {
	let raw = fs::read_to_string(&args.input)
		.wrap_err_with(|| format!("Failed to read candidates from {:?}.", args.input))?;
	let candidates: Vec<Candidate> = serde_json::from_str(&raw)
		.wrap_err_with(|| format!("Failed to parse candidates from {:?}.", args.input))?;
	let now = match args.now.as_deref() {
		Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)
			.map_err(|err| eyre::eyre!("--now must be an RFC 3339 timestamp: {err}"))?,
		None => OffsetDateTime::now_utc(),
	};
	let weights = base_weights(args)?.merged(&args.overrides());
	let results = rank_explained_at(&candidates, &weights, now);

	tracing::info!(candidates = results.len(), "Candidates ranked.");

	let output = if args.explain {
		serde_json::to_string_pretty(&results)?
	} else {
		let results = results.into_iter().map(RankedResult::from).collect::<Vec<_>>();

		serde_json::to_string_pretty(&results)?
	};

	Ok(output)
}

fn base_weights(args: &Args) -> color_eyre::Result<Weights> {
	let Some(path) = args.config.as_deref() else {
		return Ok(Weights::default());
	};
	let config = agent_search_config::load(path)?;
	let configured = config.ranking.weights;

	Ok(Weights::validated(
		configured.relevance,
		configured.reputation,
		configured.recency,
		configured.service_count,
	)?)
}
