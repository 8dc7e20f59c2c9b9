//! Lost Items - Lotte World lost-property board crawler
//!
//! Fetches the Seoul and Busan lost-property boards page by page, normalizes
//! every listing into a [`domain::LostItem`], and crawls whole boards in
//! concurrent rounds that drain failed pages before moving forward.

// Module declarations
pub mod application;
pub mod crawling;
pub mod domain;
pub mod infrastructure;
