pub mod catalog;
pub mod relevance;
pub mod search;

mod error;

pub use catalog::AgentCatalog;
pub use error::{Error, Result};
pub use search::{RankItem, RankRequest, RankResponse, SearchItem, SearchRequest, SearchResponse};

use agent_search_config::Config;
use agent_search_domain::{AgentRecord, WeightOverrides, Weights};

/// With `ranking.reject_invalid_timestamps` set, every catalog record must carry a parseable
/// `registeredAt`; construction fails otherwise, so searches never reject on catalog data.
pub struct SearchService {
	pub cfg: Config,
	catalog: AgentCatalog,
	weights: Weights,
}
impl SearchService {
	pub fn new(cfg: Config, catalog: AgentCatalog) -> Result<Self> {
		let configured = &cfg.ranking.weights;
		let weights = Weights::validated(
			configured.relevance,
			configured.reputation,
			configured.recency,
			configured.service_count,
		)?;

		if cfg.ranking.reject_invalid_timestamps {
			for agent in catalog.iter() {
				if let Err(err) = agent.registered_at.parse() {
					return Err(Error::Catalog {
						message: format!("Agent {} has an invalid registeredAt: {err}", agent.id),
					});
				}
			}
		}

		Ok(Self { cfg, catalog, weights })
	}

	pub fn catalog(&self) -> &AgentCatalog {
		&self.catalog
	}

	/// Configured base weights, before any per-request overrides.
	pub fn weights(&self) -> Weights {
		self.weights
	}

	pub fn get_agent(&self, id: &str) -> Result<&AgentRecord> {
		self.catalog
			.get(id)
			.ok_or_else(|| Error::NotFound { message: format!("Agent {id} does not exist.") })
	}

	fn effective_weights(&self, overrides: Option<&WeightOverrides>) -> Weights {
		match overrides {
			Some(overrides) => self.weights.merged(overrides),
			None => self.weights,
		}
	}
}
