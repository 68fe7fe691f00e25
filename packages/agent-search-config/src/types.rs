use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
	/// Optional. JSON array of agent records served by the search endpoint.
	pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub default_limit: u32,
	pub max_limit: u32,
	/// Upper bound on relevance-stage hits handed to the ranker.
	pub max_candidates: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct Ranking {
	#[serde(default)]
	pub reject_invalid_timestamps: bool,
	#[serde(default)]
	pub weights: RankingWeights,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RankingWeights {
	#[serde(default = "default_relevance_weight")]
	pub relevance: f64,
	#[serde(default = "default_reputation_weight")]
	pub reputation: f64,
	#[serde(default = "default_recency_weight")]
	pub recency: f64,
	#[serde(default = "default_service_count_weight")]
	pub service_count: f64,
}
impl Default for RankingWeights {
	fn default() -> Self {
		Self {
			relevance: default_relevance_weight(),
			reputation: default_reputation_weight(),
			recency: default_recency_weight(),
			service_count: default_service_count_weight(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_relevance_weight() -> f64 {
	0.4
}

fn default_reputation_weight() -> f64 {
	0.3
}

fn default_recency_weight() -> f64 {
	0.15
}

fn default_service_count_weight() -> f64 {
	0.15
}
