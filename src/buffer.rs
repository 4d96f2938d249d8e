use std::path::{Path, PathBuf};

use crate::editor::Editor;
use crate::error::{HarnessError, Result};
use crate::types::{ContentKind, SyntaxStack};

/// Strip every line's indentation: select all, shift left far enough.
const OUTDENT_ALL: &str = "ggVG999<<";
/// Re-indent the whole buffer with the loaded indent rules.
const REINDENT_ALL: &str = "gg=G";
const SYNSTACK_NAMES: &str =
    r#"join(map(synstack(line('.'), col('.')), 'synIDattr(v:val, "name")'), "\n")"#;

/// One scratch file of a given kind inside an example directory, staged
/// through the editor. The file is rewritten in full on every call.
pub struct ScratchBuffer<'a, E: Editor> {
    editor: &'a mut E,
    path: PathBuf,
    kind: ContentKind,
}

impl<'a, E: Editor> ScratchBuffer<'a, E> {
    pub fn new(editor: &'a mut E, dir: &Path, kind: ContentKind) -> Self {
        Self {
            editor,
            path: dir.join(kind.file_name()),
            kind,
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Throws away the indentation of `code` and returns what the editor's
    /// indent rules rebuild from it. A missing final newline stays missing.
    pub fn reindent(&mut self, code: &str) -> Result<String> {
        self.load(code)?;
        self.editor.normal(OUTDENT_ALL)?;
        self.editor.normal(REINDENT_ALL)?;
        self.editor.write()?;
        let mut text =
            std::fs::read_to_string(&self.path).map_err(|e| HarnessError::io(&self.path, e))?;
        if !code.ends_with('\n') && text.ends_with('\n') {
            text.pop();
        }
        Ok(text)
    }

    /// Syntax groups under the first match of `pattern` in `code`.
    pub fn syntax_stack(&mut self, code: &str, pattern: &str) -> Result<SyntaxStack> {
        self.load(code)?;
        self.editor.search(pattern)?;
        let answer = self.editor.eval(SYNSTACK_NAMES)?;
        Ok(SyntaxStack::from_lines(&answer))
    }

    fn load(&mut self, code: &str) -> Result<()> {
        std::fs::write(&self.path, code).map_err(|e| HarnessError::io(&self.path, e))?;
        tracing::trace!(path = %self.path.display(), bytes = code.len(), "scratch file staged");
        self.editor.edit(&self.path)
    }
}
