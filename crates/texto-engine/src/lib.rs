//! Parsing engine for the Texto structured plain-text format.
//!
//! [`parse`] turns a text into a [`Document`]: an arena [`Tree`] rooted at
//! `document`, plus the diagnostics collected on the way.

pub mod parsing;
pub mod tree;

pub use parsing::{
    Diagnostic, Document, Issue, Parser, ParserConfig, Severity, custom::CustomProcessor, parse,
};
pub use tree::{Attributes, NodeId, NodeKind, NodeRef, Tree};
