use serde::Serialize;
use std::path::Path;

use crate::types::{ContentKind, RunResult};

#[derive(Serialize)]
struct JsonOutput<'a> {
    cases: Vec<JsonCase<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonCase<'a> {
    file: String,
    name: &'a str,
    kind: ContentKind,
    passed: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    message: &'a str,
}

#[derive(Serialize)]
struct JsonSummary {
    passed: usize,
    failed: usize,
}

fn build_output<'a>(result: &'a RunResult, project_root: &Path) -> JsonOutput<'a> {
    let cases = result
        .cases
        .iter()
        .map(|c| JsonCase {
            file: super::relative_path(&c.file, project_root),
            name: &c.name,
            kind: c.kind,
            passed: c.passed,
            message: &c.message,
        })
        .collect();

    JsonOutput {
        cases,
        summary: JsonSummary {
            passed: result.passed_count(),
            failed: result.failed_count(),
        },
    }
}

pub fn render(result: &RunResult, project_root: &Path) {
    let output = build_output(result, project_root);
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("failed to serialize results: {e}"),
    }
}
