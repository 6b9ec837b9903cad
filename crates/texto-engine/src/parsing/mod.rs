//! # Parsing
//!
//! Turns Texto text into a [`Tree`](crate::tree::Tree) in one forward pass.
//!
//! ## Pipeline
//!
//! 1. **Segmentation** (`segment`): the next block runs up to the next blank
//!    line, unless a markup span crosses that blank line
//! 2. **Block dispatch** (`blocks`): the first recognizer in priority order
//!    that accepts the block places it in the tree
//! 3. **Inline parsing** (`inline`): block text becomes text and element
//!    nodes, the lowest-offset inline match winning at each step
//!
//! Table cells and markup interiors are parsed as nested mini-documents on a
//! cloned [`ParsingContext`] and grafted back in.
//!
//! ## Modules
//!
//! - **`context`**: offsets, block window, save/restore stack, tree cursor
//! - **`segment`**: block boundary search with the markup-span exception
//! - **`blocks`**: block recognizer registry and its `kinds`
//! - **`inline`**: inline parser chain, its `kinds` and the markup depth matcher
//! - **`custom`**: name-keyed processors for markup block interiors
//! - **`diagnostics`**: recoverable issues with line/column
//! - **`text`**: tab expansion, indentation and normalisation helpers
//!
//! A [`Parser`] holds only read-only tables once built, so one parser can be
//! shared by any number of independent parses.

pub mod blocks;
pub mod context;
pub mod custom;
pub mod diagnostics;
pub mod inline;
pub mod segment;
pub mod text;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use regex::Regex;
use serde::{Deserialize, Serialize};

use blocks::BlockDispatch;
use custom::{CustomProcessor, PreProcessor};
use inline::InlineParser;
use inline::kinds::{EscapedInline, MarkupInline};

pub use context::{Document, ParsingContext, SavedOffsets};
pub use diagnostics::{Diagnostic, Issue, Severity};

/// Compiles a built-in pattern, once per process.
///
/// # Panics
/// Panics on an invalid pattern, which can only be a bug in this crate.
pub(crate) fn compile(pattern: &str) -> Regex {
    static COMPILED: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();
    let mut compiled = COMPILED
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    compiled
        .entry(pattern.to_string())
        .or_insert_with(|| {
            Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
        })
        .clone()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Columns per tab stop when measuring indentation.
    pub tab_width: usize,
    /// Record `_start`/`_end` while parsing and run the offset pass.
    pub track_offsets: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            track_offsets: false,
        }
    }
}

pub struct Parser {
    config: ParserConfig,
    whitespace: Regex,
    separator: Regex,
    escaped: EscapedInline,
    markup: MarkupInline,
    blocks: Vec<Box<dyn BlockDispatch>>,
    inlines: Vec<Box<dyn InlineParser>>,
    processors: HashMap<String, Box<dyn CustomProcessor>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl Parser {
    /// Block boundary: a line break followed by at least one blank line.
    pub const BLOCK_SEPARATOR: &'static str = r"[ \t\r]*\n(?:[ \t\r]*\n)+";

    pub fn new(config: ParserConfig) -> Self {
        let escaped = EscapedInline::new();
        let markup = MarkupInline::new();
        let inlines = inline::chain(&escaped, &markup);
        let mut parser = Parser {
            config,
            whitespace: compile(r"\s+"),
            separator: compile(Self::BLOCK_SEPARATOR),
            escaped,
            markup,
            blocks: blocks::registry(),
            inlines,
            processors: HashMap::new(),
        };
        parser.processors.insert("pre".to_string(), Box::new(PreProcessor));
        parser
    }

    /// Registers a processor for `[start name] … [end name]` interiors,
    /// replacing any previous one for that name.
    #[must_use]
    pub fn with_processor(mut self, name: &str, processor: impl CustomProcessor + 'static) -> Self {
        self.processors.insert(name.to_string(), Box::new(processor));
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn processor(&self, name: &str) -> Option<&dyn CustomProcessor> {
        self.processors.get(name).map(|p| p.as_ref())
    }

    pub(crate) fn escaped(&self) -> &EscapedInline {
        &self.escaped
    }

    pub(crate) fn markup(&self) -> &MarkupInline {
        &self.markup
    }

    pub(crate) fn separator(&self) -> &Regex {
        &self.separator
    }

    pub fn inlines(&self) -> impl Iterator<Item = &dyn InlineParser> {
        self.inlines.iter().map(|p| p.as_ref())
    }

    /// Tab-expands `text` and collapses its whitespace runs.
    pub fn process_text(&self, text: &str) -> String {
        let expanded = text::expand_tabs(text, self.config.tab_width, 0);
        text::normalise(&expanded, &self.whitespace)
    }

    pub fn normalise(&self, text: &str) -> String {
        text::normalise(text, &self.whitespace)
    }

    pub fn indentation(&self, text: &str) -> usize {
        text::indentation(text, self.config.tab_width)
    }

    pub fn parse(&self, text: &str) -> Document {
        let mut cx = ParsingContext::new(self, text);
        self.run(&mut cx);
        cx.finish()
    }

    /// Parses every block of the context's text.
    pub(crate) fn run(&self, cx: &mut ParsingContext<'_>) {
        while !cx.is_document_end_reached() {
            self.parse_next_block(cx);
        }
    }

    fn parse_next_block(&self, cx: &mut ParsingContext<'_>) {
        let start = cx.offset();
        let len = cx.len();
        let (end, next) = segment::next_block(cx);

        if end == start {
            // Blank lines: remember where the last block left the cursor, then
            // fall back to the enclosing content.
            cx.set_last_block(Some(cx.current()));
            cx.ensure_parent(&["content"]);
            cx.set_current_block(next, len);
            return;
        }

        cx.set_current_block(start, end);
        let accepted = self.blocks.iter().find(|b| b.dispatch(cx));
        if let Some(block) = accepted {
            log::trace!("{} block at {start}..{}", block.name(), cx.block_end());
        }
        let resume = cx.block_end();
        cx.set_current_block(resume, len);
    }
}

/// The parser behind [`parse`], built on first use.
pub(crate) fn default_parser() -> &'static Parser {
    static DEFAULT: OnceLock<Parser> = OnceLock::new();
    DEFAULT.get_or_init(Parser::default)
}

/// Parses `text` with the default configuration.
pub fn parse(text: &str) -> Document {
    default_parser().parse(text)
}
