use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
};

use clap::Parser;
use serde_json::Value;

use agent_rank::Args;

const CANDIDATES: &str = r#"[
	{
		"agent": {
			"id": "B",
			"reputationScore": 50,
			"registeredAt": "2025-06-01T11:00:00Z",
			"services": "[1]"
		},
		"relevanceScore": 5
	},
	{
		"agent": {
			"id": "A",
			"reputationScore": 100,
			"registeredAt": "2025-05-31T12:00:00Z",
			"services": "[1,2,3]",
			"owner": "0xabc"
		},
		"relevanceScore": 10
	}
]"#;

fn write_temp(name: &str, payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let mut path = env::temp_dir();

	path.push(format!("agent_rank_test_{}_{ordinal}_{name}", std::process::id()));

	fs::write(&path, payload).expect("Failed to write temp file.");

	path
}

fn run_with(extra: &[&str]) -> Value {
	let input = write_temp("candidates.json", CANDIDATES);
	let input_arg = input.to_string_lossy().to_string();
	let mut argv = vec!["agent-rank", "--input", input_arg.as_str(), "--now", "2025-06-01T12:00:00Z"];

	argv.extend_from_slice(extra);

	let args = Args::try_parse_from(argv).expect("Failed to parse arguments.");
	let output = agent_rank::execute(&args);

	fs::remove_file(&input).expect("Failed to remove temp file.");

	serde_json::from_str(&output.expect("Ranking should succeed.")).expect("Output must be JSON.")
}

#[test]
fn ranks_with_default_weights() {
	let output = run_with(&[]);
	let items = output.as_array().expect("array");

	assert_eq!(items[0]["agent"]["id"], "A");
	assert_eq!(items[0]["agent"]["owner"], "0xabc");
	assert!((items[0]["score"].as_f64().expect("score") - 0.85).abs() < 1e-9);
	assert!((items[1]["score"].as_f64().expect("score") - 0.54375).abs() < 1e-9);
	assert!(items[0].get("factors").is_none());
}

#[test]
fn weight_flags_override_defaults() {
	let output = run_with(&[
		"--relevance",
		"0",
		"--reputation",
		"0",
		"--recency",
		"1",
		"--service-count",
		"0",
		"--explain",
	]);
	let items = output.as_array().expect("array");

	assert_eq!(items[0]["agent"]["id"], "B");
	assert_eq!(items[1]["factors"]["recency"], 0.0);
}

#[test]
fn negative_weight_flags_are_accepted() {
	let output = run_with(&["--reputation", "-1", "--relevance", "0"]);

	assert_eq!(output[0]["agent"]["id"], "B");
}

#[test]
fn config_supplies_base_weights() {
	let config = write_temp(
		"config.toml",
		r#"
[service]
http_bind = "127.0.0.1:0"

[search]
default_limit  = 10
max_limit      = 10
max_candidates = 10

[ranking.weights]
relevance     = 0
reputation    = 0
recency       = 1
service_count = 0
"#,
	);
	let config_arg = config.to_string_lossy().to_string();
	let output = run_with(&["--config", config_arg.as_str()]);

	fs::remove_file(&config).expect("Failed to remove temp file.");

	assert_eq!(output[0]["agent"]["id"], "B");
}

#[test]
fn rejects_bad_now() {
	let input = write_temp("bad_now.json", CANDIDATES);
	let input_arg = input.to_string_lossy().to_string();
	let args = Args::try_parse_from(["agent-rank", "--input", input_arg.as_str(), "--now", "noon"])
		.expect("Failed to parse arguments.");
	let err = agent_rank::execute(&args).expect_err("Expected invalid --now.");

	fs::remove_file(&input).expect("Failed to remove temp file.");

	assert!(err.to_string().contains("--now must be an RFC 3339 timestamp"), "{err}");
}

#[test]
fn empty_input_prints_empty_array() {
	let input = write_temp("empty.json", "[]");
	let input_arg = input.to_string_lossy().to_string();
	let args = Args::try_parse_from(["agent-rank", "--input", input_arg.as_str()])
		.expect("Failed to parse arguments.");
	let output = agent_rank::execute(&args).expect("Empty input should rank.");

	fs::remove_file(&input).expect("Failed to remove temp file.");

	assert_eq!(serde_json::from_str::<Value>(&output).expect("json"), Value::Array(Vec::new()));
}
