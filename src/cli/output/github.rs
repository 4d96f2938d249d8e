use std::path::Path;

use crate::types::{CaseResult, RunResult};

/// Workflow commands end at the first newline; multi-line text has to be
/// percent-encoded.
fn escape_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(text: &str) -> String {
    escape_data(text).replace(':', "%3A").replace(',', "%2C")
}

fn annotation(case: &CaseResult, project_root: &Path) -> String {
    let rel = super::relative_path(&case.file, project_root);
    format!(
        "::error file={file},title={title}::{message}",
        file = escape_property(&rel),
        title = escape_property(&format!("{} ({})", case.name, case.kind)),
        message = escape_data(&case.message),
    )
}

pub fn render(result: &RunResult, project_root: &Path) {
    for case in result.cases.iter().filter(|c| !c.passed) {
        println!("{}", annotation(case, project_root));
    }
}
