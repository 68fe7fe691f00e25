pub mod agent;
pub mod ranking;
pub mod services;

mod error;

pub use agent::{AgentRecord, RegisteredAt};
pub use error::{Error, Result};
pub use ranking::{
	Candidate, ExplainedResult, FactorScores, RankedResult, WeightOverrides, Weights, rank,
	rank_at, rank_explained_at,
};
