//! Drive a running Vim to check indentation and syntax rules.
//!
//! A [`Suite`] owns one editor process for a whole run. Each
//! [`Suite::example`] gets a fresh temporary directory, and the matchers
//! stage candidate text there through a [`ScratchBuffer`].
//!
//! ```no_run
//! use std::path::Path;
//! use vimspec::config::EditorConfig;
//! use vimspec::{IndentationMatcher, Suite};
//!
//! let mut suite = Suite::start(&EditorConfig::default(), Path::new(".")).unwrap();
//! let verdict = suite
//!     .example(|ex| IndentationMatcher::eelixir().check(ex, "<div>\n  <%= foo %>\n</div>\n"))
//!     .unwrap()
//!     .unwrap();
//! assert!(verdict.passed, "{}", verdict.message);
//! ```

pub mod buffer;
pub mod cases;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod matchers;
pub mod runner;
pub mod suite;
pub mod types;

pub use buffer::ScratchBuffer;
pub use editor::{Editor, VimSession};
pub use error::HarnessError;
pub use matchers::{IndentationMatcher, SyntaxMatcher};
pub use suite::{Example, Suite};
pub use types::{ContentKind, SyntaxStack, Verdict};
