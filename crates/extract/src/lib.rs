#![doc = include_str!("../README.md")]

pub mod cve;
pub mod error;
pub mod nmap;

pub use cve::extract_vuln_records;
pub use error::ExtractError;
pub use nmap::extract_scan_records;
