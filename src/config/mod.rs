use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;

pub const CONFIG_FILE: &str = ".vimspecrc.toml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Used when `--format` is not given.
    pub format: OutputFormat,
    pub include: Vec<String>,
    pub ignore: Vec<String>,
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub executable: String,
    pub args: Vec<String>,
    /// Directory holding the rules under test, relative to the project root.
    pub runtimepath: PathBuf,
    pub rule_modules: Vec<String>,
    pub startup_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            include: vec!["spec/**/*.toml".into()],
            ignore: vec!["target".into(), ".git".into()],
            editor: EditorConfig::default(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            executable: "gvim".into(),
            args: vec!["-f".into()],
            runtimepath: PathBuf::from("."),
            rule_modules: vec!["ftdetect/elixir.vim".into(), "ftdetect/eelixir.vim".into()],
            startup_timeout_ms: 5000,
        }
    }
}

impl EditorConfig {
    pub fn runtime_dir(&self, project_root: &Path) -> PathBuf {
        if self.runtimepath.is_absolute() {
            self.runtimepath.clone()
        } else {
            project_root.join(&self.runtimepath)
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let path = config_path.map(Path::to_path_buf).or_else(|| {
            let default = project_root.join(CONFIG_FILE);
            default.exists().then_some(default)
        });

        match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str(&content).map_err(|e| anyhow::anyhow!("Config parse error: {e}"))
            }
            None => Ok(Config::default()),
        }
    }

    pub const fn default_toml() -> &'static str {
        r#"# vimspec configuration

# Output format when --format is not given: "text", "json" or "github"
format = "text"

# Which case files to run (glob patterns relative to the project root)
include = ["spec/**/*.toml"]

# Directories to ignore when scanning for case files
ignore = ["target", ".git"]

[editor]
# Needs a Vim built with +clientserver (driven via --servername/--remote-expr)
executable = "gvim"
args = ["-f"]

# Prepended to the editor's runtimepath so the rules under test win
# over any installed copy. Relative to the project root.
runtimepath = "."

# Sourced once with :runtime before the first case
rule_modules = ["ftdetect/elixir.vim", "ftdetect/eelixir.vim"]

startup_timeout_ms = 5000
"#
    }
}
