//! Application layer module
//!
//! Use cases that wire the crawler to a storage sink.

pub mod refresh_lost_items;

pub use refresh_lost_items::{RefreshLostItemsUseCase, RefreshReport};
