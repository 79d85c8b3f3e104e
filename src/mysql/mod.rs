// MySQL module - mysql_async driver adapter
//
// Sub-modules:
// - config: connection options and pool construction
// - manager: deadpool manager that opens and pings links
// - params: conversion from middleware values to driver parameters
// - query: result extraction and result-set building
// - executor: the named, positional and batch execution paths

pub mod config;
pub mod executor;
pub mod manager;
pub mod params;
pub mod query;

pub use config::{MysqlOptions, MysqlOptionsBuilder};
pub use executor::{execute_batch, execute_named, execute_positional};
pub use manager::MysqlManager;
pub use params::{convert_named, convert_positional, to_mysql_value};
pub use query::{build_result_set, from_mysql_value};
