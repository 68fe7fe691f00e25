use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use agent_search_domain::{
	AgentRecord, Candidate, FactorScores, WeightOverrides, ranking::cmp_score_desc,
	rank_explained_at,
};

use crate::{Error, Result, SearchService, relevance};

const MAX_QUERY_TERMS: usize = 16;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub limit: Option<u32>,
	/// Agents below this reputation never reach the ranker.
	pub min_reputation: Option<f64>,
	pub weights: Option<WeightOverrides>,
	#[serde(default)]
	pub explain: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchItem {
	pub agent: AgentRecord,
	pub score: f64,
	pub relevance_score: f64,
	pub matched_terms: Vec<String>,
	pub matched_fields: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub factors: Option<FactorScores>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub query: String,
	/// Relevance-stage hits that were ranked, before `limit` is applied.
	pub candidate_count: u32,
	pub items: Vec<SearchItem>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RankRequest {
	pub candidates: Vec<Candidate>,
	pub weights: Option<WeightOverrides>,
	#[serde(default)]
	pub explain: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankItem {
	pub agent: AgentRecord,
	pub score: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub factors: Option<FactorScores>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankResponse {
	pub items: Vec<RankItem>,
}

struct MatchInfo {
	relevance_score: f64,
	matched_terms: Vec<String>,
	matched_fields: Vec<&'static str>,
}

impl SearchService {
	pub fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		self.search_at(req, OffsetDateTime::now_utc())
	}

	pub fn search_at(&self, req: SearchRequest, now: OffsetDateTime) -> Result<SearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let limit = self.resolve_limit(req.limit)?;
		let terms = relevance::tokenize_query(query, MAX_QUERY_TERMS);

		if terms.is_empty() {
			return Err(Error::InvalidRequest {
				message: "query must contain at least one word.".to_string(),
			});
		}
		if let Some(min) = req.min_reputation
			&& !min.is_finite()
		{
			return Err(Error::InvalidRequest {
				message: "min_reputation must be a finite number.".to_string(),
			});
		}

		let mut matches = self
			.catalog
			.iter()
			.filter(|agent| {
				req.min_reputation.map(|min| agent.reputation_score >= min).unwrap_or(true)
			})
			.filter_map(|agent| relevance::score_agent(&terms, agent))
			.collect::<Vec<_>>();

		matches.sort_by(|a, b| {
			cmp_score_desc(a.candidate.relevance_score, b.candidate.relevance_score)
		});
		matches.truncate(self.cfg.search.max_candidates as usize);

		let mut info = HashMap::with_capacity(matches.len());
		let mut candidates = Vec::with_capacity(matches.len());

		for scored in matches {
			info.insert(
				scored.candidate.agent.id.clone(),
				MatchInfo {
					relevance_score: scored.candidate.relevance_score,
					matched_terms: scored.matched_terms,
					matched_fields: scored.matched_fields,
				},
			);
			candidates.push(scored.candidate);
		}

		let weights = self.effective_weights(req.weights.as_ref());
		let candidate_count = candidates.len() as u32;
		let items = rank_explained_at(&candidates, &weights, now)
			.into_iter()
			.take(limit as usize)
			.map(|result| {
				let matched = info.remove(&result.agent.id);

				SearchItem {
					relevance_score: matched.as_ref().map(|m| m.relevance_score).unwrap_or(0.0),
					matched_terms: matched
						.as_ref()
						.map(|m| m.matched_terms.clone())
						.unwrap_or_default(),
					matched_fields: matched
						.map(|m| m.matched_fields.iter().map(|field| field.to_string()).collect())
						.unwrap_or_default(),
					factors: req.explain.then_some(result.factors),
					score: result.score,
					agent: result.agent,
				}
			})
			.collect::<Vec<_>>();

		tracing::debug!(
			query,
			terms = terms.len(),
			candidate_count,
			returned = items.len(),
			"Agent search completed."
		);

		Ok(SearchResponse { query: query.to_string(), candidate_count, items })
	}

	pub fn rank(&self, req: RankRequest) -> Result<RankResponse> {
		self.rank_at(req, OffsetDateTime::now_utc())
	}

	/// Ranks caller-supplied candidates. The response always has one item per candidate.
	pub fn rank_at(&self, req: RankRequest, now: OffsetDateTime) -> Result<RankResponse> {
		self.check_timestamps(&req.candidates)?;

		let weights = self.effective_weights(req.weights.as_ref());
		let items = rank_explained_at(&req.candidates, &weights, now)
			.into_iter()
			.map(|result| RankItem {
				factors: req.explain.then_some(result.factors),
				score: result.score,
				agent: result.agent,
			})
			.collect::<Vec<_>>();

		tracing::debug!(candidates = items.len(), "Candidate batch ranked.");

		Ok(RankResponse { items })
	}

	fn resolve_limit(&self, limit: Option<u32>) -> Result<u32> {
		let limit = limit.unwrap_or(self.cfg.search.default_limit);

		if limit == 0 || limit > self.cfg.search.max_limit {
			return Err(Error::InvalidRequest {
				message: format!("limit must be between 1 and {}.", self.cfg.search.max_limit),
			});
		}

		Ok(limit)
	}

	fn check_timestamps(&self, candidates: &[Candidate]) -> Result<()> {
		if !self.cfg.ranking.reject_invalid_timestamps {
			return Ok(());
		}

		for candidate in candidates {
			if let Err(err) = candidate.agent.registered_at.parse() {
				return Err(Error::InvalidRequest {
					message: format!(
						"Agent {} has an invalid registeredAt: {err}",
						candidate.agent.id
					),
				});
			}
		}

		Ok(())
	}
}
