//! Assertions layered on [`ScratchBuffer`](crate::buffer::ScratchBuffer).
//!
//! Each matcher is bound to one [`ContentKind`]. A mismatch comes back as a
//! failed [`Verdict`] carrying a readable message; only a broken editor
//! (or a search pattern that matches nothing) is an `Err`.

use crate::editor::Editor;
use crate::error::Result;
use crate::suite::Example;
use crate::types::{ContentKind, SyntaxStack, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentationMatcher {
    kind: ContentKind,
}

impl IndentationMatcher {
    pub const fn new(kind: ContentKind) -> Self {
        Self { kind }
    }

    pub const fn elixir() -> Self {
        Self::new(ContentKind::Source)
    }

    pub const fn eelixir() -> Self {
        Self::new(ContentKind::EmbeddedHost)
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Passes when `code` is already indented the way the rules indent it.
    pub fn check<E: Editor>(&self, example: &mut Example<'_, E>, code: &str) -> Result<Verdict> {
        let actual = example.buffer(self.kind).reindent(code)?;
        Ok(indentation_verdict(self.kind, code, &actual))
    }
}

pub fn indentation_verdict(kind: ContentKind, expected: &str, actual: &str) -> Verdict {
    if expected == actual {
        return Verdict::pass();
    }

    let mut message = format!("got:\n{actual}\nafter {kind} indentation");
    if let Some((line, want, got)) = first_difference(expected, actual) {
        message.push_str(&format!(
            "\n\nfirst difference at line {line}:\n  expected: {want}\n  actual:   {got}"
        ));
    }
    Verdict::fail(message)
}

fn first_difference(expected: &str, actual: &str) -> Option<(usize, String, String)> {
    let render = |line: Option<&str>| {
        line.map_or_else(|| "<end of text>".to_string(), |l| format!("{l:?}"))
    };
    let mut want = expected.split('\n');
    let mut got = actual.split('\n');
    let mut number = 1;
    loop {
        match (want.next(), got.next()) {
            (None, None) => return None,
            (w, g) if w != g => return Some((number, render(w), render(g))),
            _ => number += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxMatcher {
    kind: ContentKind,
}

impl SyntaxMatcher {
    pub const fn new(kind: ContentKind) -> Self {
        Self { kind }
    }

    pub const fn elixir() -> Self {
        Self::new(ContentKind::Source)
    }

    pub const fn eelixir() -> Self {
        Self::new(ContentKind::EmbeddedHost)
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Passes when `name` is on the syntax stack at the first match of
    /// `pattern` in `code`.
    pub fn includes<E: Editor>(
        &self,
        example: &mut Example<'_, E>,
        code: &str,
        name: &str,
        pattern: &str,
    ) -> Result<Verdict> {
        let stack = example.buffer(self.kind).syntax_stack(code, pattern)?;
        Ok(inclusion_verdict(&stack, name, pattern, code, false))
    }

    /// Exact complement of [`SyntaxMatcher::includes`].
    pub fn excludes<E: Editor>(
        &self,
        example: &mut Example<'_, E>,
        code: &str,
        name: &str,
        pattern: &str,
    ) -> Result<Verdict> {
        let stack = example.buffer(self.kind).syntax_stack(code, pattern)?;
        Ok(inclusion_verdict(&stack, name, pattern, code, true))
    }
}

pub fn inclusion_verdict(
    stack: &SyntaxStack,
    name: &str,
    pattern: &str,
    code: &str,
    negated: bool,
) -> Verdict {
    let included = stack.contains(name);
    if included != negated {
        return Verdict::pass();
    }

    let code = indent_block(code);
    if negated {
        Verdict::fail(format!(
            "expected {stack} not to include syntax {name}\nfor pattern: /{pattern}/\nin:\n{code}"
        ))
    } else {
        Verdict::fail(format!(
            "expected {stack}\nto include syntax {name}\nfor pattern: /{pattern}/\nin:\n{code}"
        ))
    }
}

fn indent_block(text: &str) -> String {
    text.lines()
        .map(|l| format!("  {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
