pub mod config;
pub mod dedup;
pub mod fields;
pub mod listing;
pub mod locators;
pub mod model;
pub mod pacing;
pub mod reviews;
pub mod sink;
pub mod stabilize;
pub mod target;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
