pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Weight {factor} must be a finite number zero or greater, got {value}.")]
	InvalidWeight { factor: &'static str, value: f64 },
	#[error("Invalid registeredAt value {value:?}.")]
	InvalidTimestamp { value: String },
	#[error("Invalid services payload: {message}")]
	InvalidServices { message: String },
}
