//! # Crawling Module
//!
//! 전체 게시판 크롤링 (배치 라운드 + 실패 페이지 재시도)
//! - 페이지 소스는 도메인 트레이트(`LostItemPageSource`)로 주입
//! - 라운드 내 요청은 tokio 태스크로 동시 실행

pub mod batch_crawler;

pub use batch_crawler::{BatchCrawler, CrawlPolicy};
