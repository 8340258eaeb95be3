#![doc = include_str!("../README.md")]

pub mod correlate;
pub mod error;
pub mod schema;
pub mod store;

pub use error::StoreError;
pub use schema::Table;
pub use store::RiskStore;
