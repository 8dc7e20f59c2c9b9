//! Domain services
//!
//! Contains the crawling contracts that don't naturally fit within entities.

pub mod crawling_services;

pub use crawling_services::LostItemPageSource;
