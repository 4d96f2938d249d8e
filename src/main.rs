use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use vimspec::cli::{Cli, Commands};
use vimspec::config::{Config, CONFIG_FILE};
use vimspec::{runner, ContentKind, Suite};

use clap::Parser;

fn init_logging() {
    let filter = EnvFilter::try_from_env("VIMSPEC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn probe(
    code: &str,
    kind: ContentKind,
    pattern: Option<&str>,
    root: &Path,
    config: &Config,
) -> Result<String> {
    let mut suite = Suite::start(&config.editor, root).context("editor setup failed")?;
    let out = suite.example(|ex| {
        let mut buffer = ex.buffer(kind);
        match pattern {
            Some(pattern) => buffer
                .syntax_stack(code, pattern)
                .map(|stack| stack.0.join("\n")),
            None => buffer.reindent(code),
        }
    })??;
    suite.finish();
    Ok(out)
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            path,
            format,
            config,
            filter,
        } => {
            let project_root = path.canonicalize().unwrap_or(path);
            let cfg = Config::load(config.as_deref(), &project_root)?;
            let filter = filter
                .as_deref()
                .map(regex::Regex::new)
                .transpose()
                .context("invalid --filter regex")?;
            let result = runner::run(&project_root, &cfg, filter.as_ref())?;

            let output_format = format.unwrap_or(cfg.format);
            vimspec::cli::output::render(&result, &project_root, output_format);

            if result.has_failures() {
                std::process::exit(1);
            }
        }
        Commands::Init => {
            let path = std::env::current_dir()?.join(CONFIG_FILE);
            if path.exists() {
                eprintln!("{CONFIG_FILE} already exists");
                std::process::exit(1);
            }
            std::fs::write(&path, Config::default_toml())?;
            println!("Created {CONFIG_FILE}");
        }
        Commands::Probe {
            input,
            kind,
            pattern,
            root,
            config,
        } => {
            let root = root.canonicalize().unwrap_or(root);
            let cfg = Config::load(config.as_deref(), &root)?;
            let code = read_input(&input)?;
            let out = probe(&code, kind, pattern.as_deref(), &root, &cfg)?;
            if out.ends_with('\n') {
                print!("{out}");
            } else {
                println!("{out}");
            }
        }
    }

    Ok(())
}
