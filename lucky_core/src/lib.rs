#![forbid(unsafe_code)]

//! Core domain model and numerology engine for the lucky calendar.
//!
//! This crate provides:
//! - Digit-sum reductions and layered numbers
//! - Flowing year / month / day computation
//! - Guidance and lucky-attribute reference tables
//! - Day readings and month tables (optionally with lunar columns)
//! - Export (CSV, JSON, XLSX), configuration and logging

pub mod types;
pub mod error;
pub mod reduction;
pub mod flowing;
pub mod tables;
pub mod lunar;
pub mod calendar;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use reduction::{digit_sum_once, format_layered, reduce_to_single_digit};
pub use flowing::{flowing_day, flowing_month, flowing_year, main_day_number};
pub use tables::{build_default_tables, default_tables, ReferenceTables};
pub use lunar::LunarConverter;
pub use calendar::{days_in_month, generate_month_table, parse_date, read_day};
pub use export::{export_file_name, export_table, ExportFormat};
pub use config::Config;
