mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Ranking, RankingWeights, Search, Service};

use std::{fs, path::Path};

/// Reads, normalizes, and validates the TOML file at `path`.
pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
	let mut cfg = toml::from_str::<Config>(&raw)
		.map_err(|source| Error::Parse { path: path.to_path_buf(), source })?;

	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let search = &cfg.search;

	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "an address is required"));
	}
	if search.max_limit == 0 {
		return Err(Error::invalid("search.max_limit", "must be at least 1"));
	}
	if search.default_limit == 0 {
		return Err(Error::invalid("search.default_limit", "must be at least 1"));
	}
	if search.default_limit > search.max_limit {
		return Err(Error::invalid(
			"search.default_limit",
			format!("{} exceeds search.max_limit ({})", search.default_limit, search.max_limit),
		));
	}
	if search.max_candidates == 0 {
		return Err(Error::invalid("search.max_candidates", "must be at least 1"));
	}

	let weights = &cfg.ranking.weights;

	for (key, value) in [
		("ranking.weights.relevance", weights.relevance),
		("ranking.weights.reputation", weights.reputation),
		("ranking.weights.recency", weights.recency),
		("ranking.weights.service_count", weights.service_count),
	] {
		if !value.is_finite() {
			return Err(Error::invalid(key, format!("{value} is not a finite weight")));
		}
		if value < 0.0 {
			return Err(Error::invalid(key, format!("{value} is negative")));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.service
		.catalog_path
		.as_deref()
		.map(|path| path.as_os_str().to_string_lossy().trim().is_empty())
		.unwrap_or(false)
	{
		cfg.service.catalog_path = None;
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
