//! CSS selectors for each park's lost-property list
//!
//! 두 게시판의 마크업이 달라서 사이트마다 선택자 묶음을 따로 둡니다.

use serde::{Deserialize, Serialize};

/// Selectors for one board's list page. Field selectors are relative to `container`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostItemSelectors {
    /// One match per listing
    pub container: String,
    pub name: String,
    pub category: String,
    pub state: String,
    pub when_found: String,
    pub where_found: String,
}

impl LostItemSelectors {
    /// 서울 롯데월드 어드벤처 (`list.do`, 전체 페이지 렌더링)
    pub fn seoul() -> Self {
        Self {
            container: "#cBody > div > div.container > div > div.listType1 > ul > li".to_string(),
            name: "p.find".to_string(),
            category: "p.sort".to_string(),
            state: "p.result".to_string(),
            when_found: "p.date2".to_string(),
            where_found: "p.place".to_string(),
        }
    }

    /// 부산 롯데월드 어드벤처 (`listPart.do`, 목록 조각만 렌더링)
    pub fn busan() -> Self {
        Self {
            container: "li.prptLi".to_string(),
            name: "div.title".to_string(),
            category: "div.ctrg".to_string(),
            state: "div.state".to_string(),
            when_found: "div.date".to_string(),
            where_found: "div.place > span".to_string(),
        }
    }
}

/// Selector for the category drop-down on the Seoul search form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelectors {
    pub option: String,
    /// Attribute holding the category code
    pub code_attribute: String,
}

impl Default for CategorySelectors {
    fn default() -> Self {
        Self {
            option: "div.srchSel > div > a".to_string(),
            code_attribute: "data-cd".to_string(),
        }
    }
}
