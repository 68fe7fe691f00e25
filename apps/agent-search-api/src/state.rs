use std::sync::Arc;

use agent_search_config::Config;
use agent_search_service::{AgentCatalog, SearchService};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub fn new(config: Config) -> color_eyre::Result<Self> {
		let catalog = match config.service.catalog_path.as_deref() {
			Some(path) => AgentCatalog::load(path)?,
			None => {
				tracing::warn!("No catalog_path configured. Search will return no results.");

				AgentCatalog::default()
			},
		};

		Ok(Self::from_service(SearchService::new(config, catalog)?))
	}

	pub fn from_service(service: SearchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
