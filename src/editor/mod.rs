pub mod vim;

use std::path::Path;

use crate::error::{HarnessError, Result};

pub use vim::VimSession;

/// Quote `text` as a Vim single-quoted string literal.
pub fn vim_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// The channel to a running editor. Implementors provide the three raw
/// channels; the rest are built on them.
pub trait Editor {
    /// Evaluate an expression and return its textual value.
    fn eval(&mut self, expr: &str) -> Result<String>;

    /// Send keystrokes as if typed in normal mode.
    fn normal(&mut self, keys: &str) -> Result<()>;

    /// Stop the editor. Calling it on a stopped editor is a no-op.
    fn terminate(&mut self);

    /// Run one Ex command and return whatever it printed.
    fn command(&mut self, cmd: &str) -> Result<String> {
        self.eval(&format!("execute({})", vim_string(cmd)))
    }

    fn edit(&mut self, path: &Path) -> Result<()> {
        self.eval(&format!(
            "execute('edit! ' . fnameescape({}))",
            vim_string(&path.to_string_lossy())
        ))
        .map(drop)
    }

    fn write(&mut self) -> Result<()> {
        self.command("write!").map(drop)
    }

    fn cd(&mut self, dir: &Path) -> Result<()> {
        self.eval(&format!(
            "execute('cd ' . fnameescape({}))",
            vim_string(&dir.to_string_lossy())
        ))
        .map(drop)
    }

    fn prepend_runtimepath(&mut self, dir: &Path) -> Result<()> {
        self.eval(&format!(
            "execute('set runtimepath^=' . escape({}, ' ,\\'))",
            vim_string(&dir.to_string_lossy())
        ))
        .map(drop)
    }

    fn load_rule_module(&mut self, name: &str) -> Result<()> {
        self.command(&format!("runtime {name}")).map(drop)
    }

    /// Put the cursor on the first match of `pattern` in the buffer.
    fn search(&mut self, pattern: &str) -> Result<()> {
        self.eval("cursor(1, 1)")?;
        let line = self.eval(&format!("search({}, 'cW')", vim_string(pattern)))?;
        if line.trim() == "0" {
            return Err(HarnessError::PatternNotFound {
                pattern: pattern.to_string(),
            });
        }
        Ok(())
    }
}

impl<E: Editor + ?Sized> Editor for &mut E {
    fn eval(&mut self, expr: &str) -> Result<String> {
        (**self).eval(expr)
    }

    fn normal(&mut self, keys: &str) -> Result<()> {
        (**self).normal(keys)
    }

    fn terminate(&mut self) {
        (**self).terminate()
    }
}
