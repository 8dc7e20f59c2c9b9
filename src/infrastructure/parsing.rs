//! HTML parsing for the lost-property boards
//!
//! Trait-based parsers over `scraper`; selectors are compiled once per parser.

pub mod category_parser;
pub mod config;
pub mod context;
pub mod error;
pub mod lost_item_list_parser;

// Re-export public types
pub use category_parser::CategoryParser;
pub use config::{CategorySelectors, LostItemSelectors};
pub use context::ParseContext;
pub use error::{ParsingError, ParsingResult};
pub use lost_item_list_parser::LostItemListParser;

use scraper::Html;

/// Parser for a whole document
pub trait HtmlParser {
    type Output;

    fn parse(&self, html: &Html) -> ParsingResult<Self::Output>;
}

/// Parser that needs to know which page it is looking at
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}
