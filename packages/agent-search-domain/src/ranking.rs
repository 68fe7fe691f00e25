//! Batch-relative, multi-factor re-ranking of search hits.
//!
//! Each factor is scaled into `[0, 1]` against the largest value seen in the same batch, so a
//! score is only comparable with other scores from the same call. Every batch maximum is floored
//! at 1, which keeps all denominators non-zero.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{AgentRecord, Error, Result, services};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
	pub relevance: f64,
	pub reputation: f64,
	pub recency: f64,
	pub service_count: f64,
}
impl Weights {
	/// Builds weights that are all finite and non-negative.
	///
	/// Weights merged from [`WeightOverrides`] skip this check; negative values there invert the
	/// factor they apply to.
	pub fn validated(
		relevance: f64,
		reputation: f64,
		recency: f64,
		service_count: f64,
	) -> Result<Self> {
		for (factor, value) in [
			("relevance", relevance),
			("reputation", reputation),
			("recency", recency),
			("service_count", service_count),
		] {
			if !value.is_finite() || value < 0.0 {
				return Err(Error::InvalidWeight { factor, value });
			}
		}

		Ok(Self { relevance, reputation, recency, service_count })
	}

	pub fn merged(self, overrides: &WeightOverrides) -> Self {
		Self {
			relevance: overrides.relevance.unwrap_or(self.relevance),
			reputation: overrides.reputation.unwrap_or(self.reputation),
			recency: overrides.recency.unwrap_or(self.recency),
			service_count: overrides.service_count.unwrap_or(self.service_count),
		}
	}
}
impl Default for Weights {
	fn default() -> Self {
		Self { relevance: 0.4, reputation: 0.3, recency: 0.15, service_count: 0.15 }
	}
}

/// Per-call weight adjustments. Unset factors keep their base weight; unknown keys are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightOverrides {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relevance: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reputation: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub recency: Option<f64>,
	#[serde(default, alias = "service_count", skip_serializing_if = "Option::is_none")]
	pub service_count: Option<f64>,
}
impl WeightOverrides {
	pub fn is_empty(&self) -> bool {
		self.relevance.is_none()
			&& self.reputation.is_none()
			&& self.recency.is_none()
			&& self.service_count.is_none()
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
	pub agent: AgentRecord,
	pub relevance_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
	pub agent: AgentRecord,
	pub score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScores {
	pub relevance: f64,
	pub reputation: f64,
	pub recency: f64,
	pub service_count: f64,
}
impl FactorScores {
	pub fn weighted(&self, weights: &Weights) -> f64 {
		weights.relevance * self.relevance
			+ weights.reputation * self.reputation
			+ weights.recency * self.recency
			+ weights.service_count * self.service_count
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplainedResult {
	pub agent: AgentRecord,
	pub score: f64,
	pub factors: FactorScores,
}
impl From<ExplainedResult> for RankedResult {
	fn from(result: ExplainedResult) -> Self {
		Self { agent: result.agent, score: result.score }
	}
}

/// Ranks `candidates` best-first using the current wall clock for recency.
pub fn rank(candidates: &[Candidate], overrides: Option<&WeightOverrides>) -> Vec<RankedResult> {
	rank_at(candidates, overrides, OffsetDateTime::now_utc())
}

/// Ranks `candidates` best-first with default weights merged with `overrides`.
///
/// `now` is the single reference instant used for every candidate's age.
pub fn rank_at(
	candidates: &[Candidate],
	overrides: Option<&WeightOverrides>,
	now: OffsetDateTime,
) -> Vec<RankedResult> {
	let weights = match overrides {
		Some(overrides) => Weights::default().merged(overrides),
		None => Weights::default(),
	};

	rank_explained_at(candidates, &weights, now).into_iter().map(RankedResult::from).collect()
}

/// Same ordering as [`rank_at`] with the effective `weights` given directly, keeping each
/// candidate's normalized factors alongside its score.
///
/// Equal scores keep their input order. A candidate whose `registeredAt` cannot be parsed is
/// left out of the batch's maximum age and gets a recency factor of zero. Registrations in the
/// future are treated as age zero.
pub fn rank_explained_at(
	candidates: &[Candidate],
	weights: &Weights,
	now: OffsetDateTime,
) -> Vec<ExplainedResult> {
	if candidates.is_empty() {
		return Vec::new();
	}

	let ages = candidates
		.iter()
		.map(|candidate| match candidate.agent.registered_at.age_millis(now) {
			Ok(age) => Some(age.max(0.0)),
			Err(err) => {
				tracing::warn!(
					agent_id = %candidate.agent.id,
					error = %err,
					"Agent has an unparseable registration time. Recency is scored as zero."
				);

				None
			},
		})
		.collect::<Vec<_>>();
	let service_counts = candidates
		.iter()
		.map(|candidate| services::service_count(&candidate.agent.services) as f64)
		.collect::<Vec<_>>();
	let max_relevance = floored_max(candidates.iter().map(|candidate| candidate.relevance_score));
	let max_reputation =
		floored_max(candidates.iter().map(|candidate| candidate.agent.reputation_score));
	let max_age = floored_max(ages.iter().flatten().copied());
	let max_service_count = floored_max(service_counts.iter().copied());
	let mut out = candidates
		.iter()
		.zip(ages)
		.zip(service_counts)
		.map(|((candidate, age), service_count)| {
			let factors = FactorScores {
				relevance: candidate.relevance_score / max_relevance,
				reputation: candidate.agent.reputation_score / max_reputation,
				recency: age.map(|age| 1.0 - age / max_age).unwrap_or(0.0),
				service_count: service_count / max_service_count,
			};

			ExplainedResult {
				agent: candidate.agent.clone(),
				score: factors.weighted(weights),
				factors,
			}
		})
		.collect::<Vec<_>>();

	out.sort_by(|a, b| cmp_score_desc(a.score, b.score));

	out
}

/// Descending order with NaN sorted last.
pub fn cmp_score_desc(a: f64, b: f64) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn floored_max(values: impl Iterator<Item = f64>) -> f64 {
	values.fold(1.0, f64::max)
}
