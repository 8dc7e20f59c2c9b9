//! Category catalogue parser
//!
//! 검색 폼의 분류 드롭다운에서 분류 코드와 이름을 가져옵니다.
//! 코드가 비어 있는 '전체' 항목은 제외합니다.

use scraper::{Html, Selector};
use tracing::debug;

use super::config::CategorySelectors;
use super::lost_item_list_parser::compile_selector;
use super::{HtmlParser, ParsingError, ParsingResult};
use crate::domain::Category;

#[derive(Debug, Clone)]
pub struct CategoryParser {
    option: Selector,
    option_source: String,
    code_attribute: String,
}

impl CategoryParser {
    pub fn new(selectors: &CategorySelectors) -> ParsingResult<Self> {
        Ok(Self {
            option: compile_selector("category_option", &selectors.option)?,
            option_source: selectors.option.clone(),
            code_attribute: selectors.code_attribute.clone(),
        })
    }
}

impl HtmlParser for CategoryParser {
    type Output = Vec<Category>;

    fn parse(&self, html: &Html) -> ParsingResult<Self::Output> {
        let categories: Vec<Category> = html
            .select(&self.option)
            .filter_map(|element| {
                let id = element.value().attr(&self.code_attribute)?.trim();
                if id.is_empty() {
                    return None;
                }
                Some(Category {
                    id: id.to_string(),
                    name: element.text().collect::<String>().trim().to_string(),
                })
            })
            .collect();

        if categories.is_empty() {
            return Err(ParsingError::NoCategoriesFound {
                selector: self.option_source.clone(),
            });
        }

        debug!("Parsed {} category options", categories.len());
        Ok(categories)
    }
}
