//! List-page parser for the lost-property boards
//!
//! Every field is extracted on its own; a listing missing its `state` cell still
//! keeps its name, category, date and place.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::LostItemSelectors;
use super::{ContextualParser, ParseContext, ParsingError, ParsingResult};
use crate::domain::LostItem;

/// Parser for extracting lost items from one list page
#[derive(Debug, Clone)]
pub struct LostItemListParser {
    container: Selector,
    name: Selector,
    category: Selector,
    state: Selector,
    when_found: Selector,
    where_found: Selector,
}

impl LostItemListParser {
    /// Compile a board's selectors once; invalid selectors are configuration errors
    pub fn new(selectors: &LostItemSelectors) -> ParsingResult<Self> {
        Ok(Self {
            container: compile_selector("container", &selectors.container)?,
            name: compile_selector("name", &selectors.name)?,
            category: compile_selector("category", &selectors.category)?,
            state: compile_selector("state", &selectors.state)?,
            when_found: compile_selector("when_found", &selectors.when_found)?,
            where_found: compile_selector("where_found", &selectors.where_found)?,
        })
    }

    /// Parse raw markup into listings in document order
    pub fn parse_document(&self, html: &str) -> Vec<LostItem> {
        let document = Html::parse_document(html);
        self.extract_items(&document)
    }

    fn extract_items(&self, document: &Html) -> Vec<LostItem> {
        document
            .select(&self.container)
            .map(|element| self.extract_item(&element))
            .collect()
    }

    fn extract_item(&self, element: &ElementRef) -> LostItem {
        LostItem::from_fragments(
            extract_text(element, &self.name),
            extract_text(element, &self.category),
            extract_text(element, &self.state),
            extract_text(element, &self.when_found),
            extract_text(element, &self.where_found),
        )
    }
}

impl ContextualParser for LostItemListParser {
    type Output = Vec<LostItem>;
    type Context = ParseContext;

    /// Zero listings is a valid result: it marks the end of the board
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let items = self.extract_items(html);

        if items.len() > context.expected_items_per_page.get() as usize {
            warn!(
                "{} page {} has {} listings, expected at most {}",
                context.province,
                context.page,
                items.len(),
                context.expected_items_per_page
            );
        }
        debug!(
            "Parsed {} listings from {} page {}",
            items.len(),
            context.province,
            context.page
        );

        Ok(items)
    }
}

pub(super) fn compile_selector(field: &'static str, selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(field, selector, e))
}

/// Trimmed text of the first match, `None` when absent or blank
pub(super) fn extract_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PageIndex, Province, UNKNOWN_FIELD};
    use std::num::NonZeroU32;

    const SEOUL_PAGE: &str = r#"
        <html><body><div id="cBody"><div><div class="container"><div><div class="listType1"><ul>
          <li>
            <p class="sort">가방</p>
            <p class="find"> 검정색 백팩 </p>
            <p class="result">보관중</p>
            <p class="date2">2023.05.01</p>
            <p class="place">자이로드롭</p>
          </li>
          <li>
            <p class="find">에어팟</p>
            <p class="result">방문수령</p>
            <p class="date2">2023.05.02</p>
            <p class="place">  </p>
          </li>
        </ul></div></div></div></div></div></body></html>
    "#;

    const BUSAN_PART: &str = r#"
        <ul>
          <li class="prptLi">
            <div class="ctrg">지갑</div>
            <div class="title">카드지갑</div>
            <div class="state">택배발송</div>
            <div class="date">2023.06.11</div>
            <div class="place"><span>자이언트 스플래쉬</span></div>
          </li>
          <li class="prptLi">
            <div class="ctrg">휴대폰</div>
            <div class="state">보관중</div>
          </li>
        </ul>
    "#;

    #[test]
    fn seoul_listing_fields_are_trimmed() {
        let parser = LostItemListParser::new(&LostItemSelectors::seoul()).unwrap();
        let items = parser.parse_document(SEOUL_PAGE);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "검정색 백팩");
        assert_eq!(items[0].category, "가방");
        assert_eq!(items[0].state, "보관중");
        assert_eq!(items[0].when_found, "2023.05.01");
        assert_eq!(items[0].where_found, "자이로드롭");
    }

    #[test]
    fn missing_fields_fall_back_independently() {
        let parser = LostItemListParser::new(&LostItemSelectors::seoul()).unwrap();
        let items = parser.parse_document(SEOUL_PAGE);

        // category cell is absent, place cell is blank
        assert_eq!(items[1].name, "에어팟");
        assert_eq!(items[1].category, UNKNOWN_FIELD);
        assert_eq!(items[1].state, "방문수령");
        assert_eq!(items[1].when_found, "2023.05.02");
        assert_eq!(items[1].where_found, UNKNOWN_FIELD);
    }

    #[test]
    fn busan_fragment_parses_and_missing_name_is_empty() {
        let parser = LostItemListParser::new(&LostItemSelectors::busan()).unwrap();
        let items = parser.parse_document(BUSAN_PART);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].where_found, "자이언트 스플래쉬");
        assert_eq!(items[1].name, "");
        assert_eq!(items[1].category, "휴대폰");
        assert_eq!(items[1].when_found, UNKNOWN_FIELD);
        assert_eq!(items[1].where_found, UNKNOWN_FIELD);
    }

    #[test]
    fn page_without_listings_is_empty_not_an_error() {
        let parser = LostItemListParser::new(&LostItemSelectors::busan()).unwrap();
        let html = Html::parse_document("<ul></ul>");
        let context = ParseContext::new(
            PageIndex::new(42).unwrap(),
            Province::Busan,
            NonZeroU32::new(8).unwrap(),
        );

        let items = parser.parse_with_context(&html, &context).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn invalid_selector_is_reported_with_field() {
        let selectors = LostItemSelectors {
            state: "p..result".to_string(),
            ..LostItemSelectors::seoul()
        };

        let err = LostItemListParser::new(&selectors).unwrap_err();
        assert!(matches!(err, ParsingError::InvalidSelector { field: "state", .. }));
        assert!(!err.is_recoverable());
    }
}
