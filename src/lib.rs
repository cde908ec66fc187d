//! Pack calculator: picks the combination of fixed-size packs that ships an
//! order with the least overage, then the fewest packs.

pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod solver;
pub mod store;
pub mod types;
