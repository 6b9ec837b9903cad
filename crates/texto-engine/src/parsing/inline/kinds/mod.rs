//! # Inline Kinds
//!
//! One type per inline construct. Each owns its pattern and knows how to turn
//! a match into nodes; the chain order lives in [`super::chain`].
//!
//! ## Types
//!
//! - **`EscapedInline`**: `{| … |}`, verbatim text that suppresses all other parsing
//! - **`CommentInline`**: `//` up to the end of the line
//! - **`MarkupInline`**: `[start name]…[end name]` spans and `[name: k=v]` elements,
//!   plus the depth matcher used to find end tags
//! - **`TargetInline`**, **`LinkInline`**: `[> name]` anchors and `[label](target)`
//! - **`EntityInline`**: `&name;` and numeric character references
//! - **`QuoteInline`**: `<<quote>>` and `>>citation<<` with their metadata
//! - **`SimpleInline`**: single-pattern constructs (code, strong, em, urls, …)
//! - **`ArrowInline`**: `<-`, `->`, `<->`

pub mod arrow;
pub mod comment;
pub mod entity;
pub mod escaped;
pub mod link;
pub mod markup;
pub mod quote;
pub mod simple;

pub use arrow::ArrowInline;
pub use comment::CommentInline;
pub use entity::EntityInline;
pub use escaped::EscapedInline;
pub use link::{LinkInline, TargetInline};
pub use markup::{MarkupInline, MarkupTag, TagKind};
pub use quote::QuoteInline;
pub use simple::SimpleInline;
