use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read agent-search config {}: {source}", path.display())]
	Read { path: PathBuf, source: std::io::Error },
	#[error("Agent-search config {} is not valid TOML: {source}", path.display())]
	Parse { path: PathBuf, source: toml::de::Error },
	/// A value parsed but breaks a constraint. `key` is the dotted TOML path.
	#[error("Invalid config value for {key}: {reason}")]
	Invalid { key: &'static str, reason: String },
}
impl Error {
	pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
		Self::Invalid { key, reason: reason.into() }
	}
}
