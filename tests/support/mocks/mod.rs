// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod catalog;
pub mod store;
pub mod time;

pub use catalog::{StaticCategoryDirectory, StaticSignatureLevels, level};
pub use store::{InMemoryArticleStore, StoreState};
pub use time::{MockClock, fixed_now};
