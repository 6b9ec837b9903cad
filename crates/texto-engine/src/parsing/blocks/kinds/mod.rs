pub mod comment;
pub mod definition;
pub mod fence;
pub mod list_item;
pub mod markup;
pub mod meta;
pub mod paragraph;
pub mod pre;
pub mod reference;
pub mod section;
pub mod separator;
pub mod table;
pub mod tagged;
pub mod title;

pub use comment::CommentBlock;
pub use definition::DefinitionBlock;
pub use fence::FencedPreBlock;
pub use list_item::ListItemBlock;
pub use markup::MarkupBlock;
pub use meta::MetaBlock;
pub use paragraph::ParagraphBlock;
pub use pre::PreBlock;
pub use reference::ReferenceBlock;
pub use section::SectionBlock;
pub use separator::SeparatorBlock;
pub use table::TableBlock;
pub use tagged::TaggedBlock;
pub use title::TitleBlock;
