use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

use crate::cases::{scanner, Case, CaseFile, Check};
use crate::config::Config;
use crate::editor::Editor;
use crate::error::HarnessError;
use crate::matchers::{IndentationMatcher, SyntaxMatcher};
use crate::suite::Suite;
use crate::types::{CaseResult, RunResult, Verdict};

/// Loads every case file under `project_root`, starts the editor once and
/// runs all cases through it.
pub fn run(project_root: &Path, config: &Config, filter: Option<&Regex>) -> Result<RunResult> {
    let paths = scanner::scan(project_root, config);
    if paths.is_empty() {
        anyhow::bail!("No case files found in {}", project_root.display());
    }
    let files = paths
        .iter()
        .map(|p| CaseFile::load(p))
        .collect::<Result<Vec<_>>>()?;

    let mut suite = Suite::start(&config.editor, project_root).context("editor setup failed")?;
    let result = run_cases(&mut suite, &files, filter);
    suite.finish();
    result
}

pub fn run_cases<E: Editor>(
    suite: &mut Suite<E>,
    files: &[CaseFile],
    filter: Option<&Regex>,
) -> Result<RunResult> {
    let mut result = RunResult::default();
    for file in files {
        for case in &file.cases {
            if filter.is_some_and(|re| !re.is_match(&case.name)) {
                continue;
            }
            let verdict = run_case(suite, case)
                .with_context(|| format!("{}: case `{}`", file.path.display(), case.name))?;
            tracing::debug!(case = %case.name, passed = verdict.passed, "case finished");
            result.cases.push(CaseResult {
                file: file.path.clone(),
                name: case.name.clone(),
                kind: case.kind,
                passed: verdict.passed,
                message: verdict.message,
            });
        }
    }
    Ok(result)
}

fn run_case<E: Editor>(suite: &mut Suite<E>, case: &Case) -> Result<Verdict> {
    let outcome = suite.example(|ex| match &case.check {
        Check::Indentation => IndentationMatcher::new(case.kind).check(ex, &case.code),
        Check::Includes { syntax, pattern } => {
            SyntaxMatcher::new(case.kind).includes(ex, &case.code, syntax, pattern)
        }
        Check::Excludes { syntax, pattern } => {
            SyntaxMatcher::new(case.kind).excludes(ex, &case.code, syntax, pattern)
        }
    })?;

    match outcome {
        Ok(verdict) => Ok(verdict),
        Err(e @ HarnessError::PatternNotFound { .. }) => Ok(Verdict::fail(e.to_string())),
        Err(e) => Err(e.into()),
    }
}
