use std::path::Path;

use crate::buffer::ScratchBuffer;
use crate::config::EditorConfig;
use crate::editor::{Editor, VimSession};
use crate::error::{HarnessError, Result};
use crate::types::ContentKind;

/// Owns the editor for a whole run. Created before the first example,
/// terminates the editor when finished or dropped.
pub struct Suite<E: Editor> {
    editor: E,
}

impl Suite<VimSession> {
    /// Starts the configured editor and loads the rules under test.
    pub fn start(config: &EditorConfig, project_root: &Path) -> Result<Self> {
        let editor = VimSession::start(config)?;
        Self::with_editor(editor, &config.runtime_dir(project_root), &config.rule_modules)
    }
}

impl<E: Editor> Suite<E> {
    pub fn with_editor(mut editor: E, runtime_dir: &Path, modules: &[String]) -> Result<Self> {
        if let Err(e) = load_rules(&mut editor, runtime_dir, modules) {
            editor.terminate();
            return Err(e);
        }
        Ok(Self { editor })
    }

    /// Runs `body` inside a fresh temporary directory that the editor has
    /// been moved into. The directory is removed afterwards, also when
    /// `body` panics.
    pub fn example<T>(&mut self, body: impl FnOnce(&mut Example<'_, E>) -> T) -> Result<T> {
        let dir = tempfile::Builder::new()
            .prefix("vimspec-")
            .tempdir()
            .map_err(|e| HarnessError::io(std::env::temp_dir(), e))?;
        tracing::trace!(dir = %dir.path().display(), "example started");
        self.editor.cd(dir.path())?;

        let out = body(&mut Example {
            editor: &mut self.editor,
            dir: dir.path(),
        });

        let path = dir.path().to_path_buf();
        dir.close().map_err(|e| HarnessError::io(path, e))?;
        Ok(out)
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn finish(mut self) {
        self.editor.terminate();
    }
}

impl<E: Editor> Drop for Suite<E> {
    fn drop(&mut self) {
        self.editor.terminate();
    }
}

fn load_rules<E: Editor>(editor: &mut E, runtime_dir: &Path, modules: &[String]) -> Result<()> {
    editor.prepend_runtimepath(runtime_dir)?;
    for module in modules {
        editor.load_rule_module(module)?;
        tracing::debug!(module = %module, "rule module loaded");
    }
    Ok(())
}

/// Per-example view of the suite: the shared editor plus this example's
/// private directory.
pub struct Example<'s, E: Editor> {
    editor: &'s mut E,
    dir: &'s Path,
}

impl<E: Editor> Example<'_, E> {
    pub fn dir(&self) -> &Path {
        self.dir
    }

    pub fn buffer(&mut self, kind: ContentKind) -> ScratchBuffer<'_, E> {
        ScratchBuffer::new(&mut *self.editor, self.dir, kind)
    }
}
