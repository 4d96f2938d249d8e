pub(crate) mod scanner;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::ContentKind;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCaseFile {
    kind: Option<ContentKind>,
    #[serde(default)]
    indent: Vec<RawIndentCase>,
    #[serde(default)]
    syntax: Vec<RawSyntaxCase>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIndentCase {
    name: String,
    code: String,
    kind: Option<ContentKind>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSyntaxCase {
    name: String,
    code: String,
    pattern: String,
    kind: Option<ContentKind>,
    includes: Option<String>,
    excludes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Indentation,
    Includes { syntax: String, pattern: String },
    Excludes { syntax: String, pattern: String },
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub kind: ContentKind,
    pub code: String,
    pub check: Check,
}

#[derive(Debug)]
pub struct CaseFile {
    pub path: PathBuf,
    pub cases: Vec<Case>,
}

impl CaseFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let raw: RawCaseFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("{}: case file parse error: {e}", path.display()))?;

        let file_kind = raw.kind;
        let kind_for = |kind: Option<ContentKind>, name: &str| {
            kind.or(file_kind).with_context(|| {
                format!(
                    "{}: case `{name}` has no kind (set `kind` on the case or the file)",
                    path.display()
                )
            })
        };

        let mut cases = Vec::with_capacity(raw.indent.len() + raw.syntax.len());
        for c in raw.indent {
            cases.push(Case {
                kind: kind_for(c.kind, &c.name)?,
                name: c.name,
                code: c.code,
                check: Check::Indentation,
            });
        }
        for c in raw.syntax {
            let check = match (c.includes, c.excludes) {
                (Some(syntax), None) => Check::Includes {
                    syntax,
                    pattern: c.pattern,
                },
                (None, Some(syntax)) => Check::Excludes {
                    syntax,
                    pattern: c.pattern,
                },
                (Some(_), Some(_)) => bail!(
                    "{}: case `{}` sets both `includes` and `excludes`",
                    path.display(),
                    c.name
                ),
                (None, None) => bail!(
                    "{}: case `{}` needs one of `includes` or `excludes`",
                    path.display(),
                    c.name
                ),
            };
            cases.push(Case {
                kind: kind_for(c.kind, &c.name)?,
                name: c.name,
                code: c.code,
                check,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            cases,
        })
    }
}
