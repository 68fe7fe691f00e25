pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid configuration: {message}")]
	Config { message: String },
	#[error("Catalog error: {message}")]
	Catalog { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
}
impl From<agent_search_domain::Error> for Error {
	fn from(err: agent_search_domain::Error) -> Self {
		match err {
			agent_search_domain::Error::InvalidWeight { .. } =>
				Self::Config { message: err.to_string() },
			_ => Self::InvalidRequest { message: err.to_string() },
		}
	}
}
