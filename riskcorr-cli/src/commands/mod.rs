//! Command handlers -- one module per subcommand

pub mod config;
pub mod report;
pub mod run;
