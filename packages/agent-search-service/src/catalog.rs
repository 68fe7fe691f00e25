use std::{collections::HashMap, fs, path::Path};

use agent_search_domain::AgentRecord;

use crate::{Error, Result};

/// Read-only set of agent records, kept in registry order.
#[derive(Clone, Debug, Default)]
pub struct AgentCatalog {
	agents: Vec<AgentRecord>,
	by_id: HashMap<String, usize>,
}
impl AgentCatalog {
	pub fn new(agents: Vec<AgentRecord>) -> Result<Self> {
		let mut by_id = HashMap::with_capacity(agents.len());

		for (idx, agent) in agents.iter().enumerate() {
			if agent.id.trim().is_empty() {
				return Err(Error::Catalog {
					message: format!("Agent at position {idx} has an empty id."),
				});
			}
			if by_id.insert(agent.id.clone(), idx).is_some() {
				return Err(Error::Catalog { message: format!("Duplicate agent id {}.", agent.id) });
			}
		}

		Ok(Self { agents, by_id })
	}

	/// Loads a JSON array of agent records.
	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path).map_err(|err| Error::Catalog {
			message: format!("Failed to read catalog at {path:?}: {err}"),
		})?;
		let agents: Vec<AgentRecord> = serde_json::from_str(&raw).map_err(|err| Error::Catalog {
			message: format!("Failed to parse catalog at {path:?}: {err}"),
		})?;
		let catalog = Self::new(agents)?;

		tracing::info!(path = %path.display(), agents = catalog.len(), "Agent catalog loaded.");

		Ok(catalog)
	}

	pub fn get(&self, id: &str) -> Option<&AgentRecord> {
		self.by_id.get(id).map(|idx| &self.agents[*idx])
	}

	pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> {
		self.agents.iter()
	}

	pub fn len(&self) -> usize {
		self.agents.len()
	}

	pub fn is_empty(&self) -> bool {
		self.agents.is_empty()
	}
}
