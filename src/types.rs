use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which file variety a check targets. The scratch file name is derived
/// from it, and the file name is what makes the editor pick a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ContentKind {
    /// Plain templating-language source (`.ex`).
    #[serde(rename = "ex")]
    #[value(name = "ex")]
    Source,
    /// Template embedded in a host markup file (`.eex`).
    #[serde(rename = "eex")]
    #[value(name = "eex")]
    EmbeddedHost,
}

impl ContentKind {
    pub const fn extension(self) -> &'static str {
        match self {
            ContentKind::Source => "ex",
            ContentKind::EmbeddedHost => "eex",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            ContentKind::Source => "test.ex",
            ContentKind::EmbeddedHost => "test.eex",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Syntax group names active under the cursor, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxStack(pub Vec<String>);

impl SyntaxStack {
    /// Parses the newline-joined answer of the introspection expression.
    pub fn from_lines(text: &str) -> Self {
        Self(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn innermost(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SyntaxStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Outcome of one matcher invocation. A mismatch is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub file: PathBuf,
    pub name: String,
    pub kind: ContentKind,
    pub passed: bool,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub cases: Vec<CaseResult>,
}

impl RunResult {
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|c| !c.passed).count()
    }

    pub fn has_failures(&self) -> bool {
        self.cases.iter().any(|c| !c.passed)
    }
}
