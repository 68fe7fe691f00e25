//! Lexical relevance stage feeding the ranker.
//!
//! Scores are raw field-weighted term counts. They only mean something relative to other
//! records scored against the same query.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use agent_search_domain::{AgentRecord, Candidate, services};

const NAME_WEIGHT: f64 = 3.0;
const SERVICE_WEIGHT: f64 = 2.0;
const DESCRIPTION_WEIGHT: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct ScoredMatch {
	pub candidate: Candidate,
	pub matched_terms: Vec<String>,
	pub matched_fields: Vec<&'static str>,
}

/// Lowercased, de-duplicated query terms in first-seen order.
pub fn tokenize_query(query: &str, max_terms: usize) -> Vec<String> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for word in query.unicode_words() {
		let token = word.to_lowercase();

		if seen.insert(token.clone()) {
			out.push(token);
		}
		if out.len() >= max_terms {
			break;
		}
	}

	out
}

pub fn tokenize_text(text: &str) -> Vec<String> {
	text.unicode_words().map(str::to_lowercase).collect()
}

/// Scores one record. Returns `None` when no query term appears in any field.
pub fn score_agent(terms: &[String], agent: &AgentRecord) -> Option<ScoredMatch> {
	if terms.is_empty() {
		return None;
	}

	let name = tokenize_text(&agent.name);
	let description = agent.description.as_deref().map(tokenize_text).unwrap_or_default();
	let service_tokens = services::service_names(&agent.services)
		.iter()
		.flat_map(|name| tokenize_text(name))
		.collect::<Vec<_>>();
	let mut score = 0.0;
	let mut matched_terms = Vec::new();
	let mut matched_fields = Vec::new();

	for term in terms {
		let mut matched = false;

		for (field, tokens, weight) in [
			("name", &name, NAME_WEIGHT),
			("services", &service_tokens, SERVICE_WEIGHT),
			("description", &description, DESCRIPTION_WEIGHT),
		] {
			let hits = tokens.iter().filter(|token| *token == term).count();

			if hits == 0 {
				continue;
			}

			score += weight * hits as f64;
			matched = true;

			if !matched_fields.contains(&field) {
				matched_fields.push(field);
			}
		}

		if matched {
			matched_terms.push(term.clone());
		}
	}

	if matched_terms.is_empty() {
		return None;
	}

	Some(ScoredMatch {
		candidate: Candidate { agent: agent.clone(), relevance_score: score },
		matched_terms,
		matched_fields,
	})
}

#[cfg(test)]
mod tests {
	use agent_search_domain::RegisteredAt;

	use super::*;

	#[test]
	fn query_terms_are_lowercased_and_deduplicated() {
		assert_eq!(
			tokenize_query("Swap  swap, QUOTE-bot!", 8),
			vec!["swap".to_string(), "quote".to_string(), "bot".to_string()]
		);
		assert_eq!(tokenize_query("a b c d", 2).len(), 2);
		assert!(tokenize_query(" ,;! ", 8).is_empty());
	}

	#[test]
	fn fields_are_weighted() {
		let mut agent = AgentRecord::new("a", RegisteredAt::EpochMillis(0));

		agent.name = "Swap Router".to_string();
		agent.description = Some("Routes every swap through the best pool.".to_string());
		agent.services = r#"["swap", {"name": "quote"}]"#.to_string();

		let scored = score_agent(&tokenize_query("swap quote", 8), &agent).expect("match");

		assert_eq!(scored.candidate.relevance_score, 3.0 + 2.0 + 1.0 + 2.0);
		assert_eq!(scored.matched_terms, vec!["swap".to_string(), "quote".to_string()]);
		assert_eq!(scored.matched_fields, vec!["name", "services", "description"]);
	}

	#[test]
	fn no_overlap_is_not_a_candidate() {
		let mut agent = AgentRecord::new("a", RegisteredAt::EpochMillis(0));

		agent.name = "Lending desk".to_string();

		assert!(score_agent(&tokenize_query("bridge", 8), &agent).is_none());
		assert!(score_agent(&[], &agent).is_none());
	}
}
