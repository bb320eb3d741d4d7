//! # Order Lookup
//!
//! Purchase-order ("pedido") lookup across three worksheets of a shared
//! spreadsheet: `ALTA`, `EMERGENCIAL` and the weekly backup worksheet of the
//! last closed work week.
//!
//! ## Core Concepts
//!
//! - **Backup window**: the Monday to Friday span whose worksheet, named
//!   `"DD.MM a DD.MM"`, holds the emergency backup records for today
//!   (see [`BackupWindowResolver`]).
//! - **Normalization**: raw text cells become [`Record`]s with deduplicated
//!   headers, day-first dates and Brazilian amounts (see [`normalize`]).
//! - **Lookup**: trimmed, case-folded exact match on `PEDIDO`, first match
//!   per table wins (see [`find`] and [`OrderLookup`]).
//! - **Isolation**: a worksheet that fails to load is searched as empty and
//!   reported as a [`SourceDiagnostic`]; the other two are unaffected.
//!
//! ## Example
//!
//! ```rust,ignore
//! use order_lookup::*;
//! use chrono::NaiveDate;
//!
//! let source = InMemorySource::new().with_sheet(
//!     "EMERGENCIAL",
//!     vec![
//!         vec!["Controle".to_string()],
//!         vec!["PEDIDO".to_string(), "DATA".to_string(), "VALOR".to_string()],
//!         vec!["99/2025".to_string(), "02/06/2025".to_string(), "R$ 1.234,56".to_string()],
//!     ],
//! );
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
//! let mut lookup = OrderLookup::new(source, FixedClock(today));
//! let outcome = lookup.search(" 99/2025 ").await;
//! println!("{}", render_outcome(&outcome));
//! ```

pub mod backup_window;
pub mod cache;
pub mod clock;
pub mod config;
pub mod currency;
pub mod error;
pub mod lookup;
pub mod normalizer;
pub mod report;
pub mod schema;
pub mod source;
pub mod utils;

#[cfg(feature = "sheets")]
pub mod sheets;

pub use backup_window::{
    backup_sheet_name, resolve_backup_window, BackupWindow, BackupWindowResolver,
};
pub use cache::{TableCache, DEFAULT_CACHE_TTL};
pub use clock::{Clock, FixedClock, FixedOffsetClock};
pub use config::LookupConfig;
pub use currency::{format_brl, format_brl_opt};
pub use error::{LookupError, Result};
pub use lookup::{load_table, load_tables, search_tables, OrderLookup, SheetNames};
pub use normalizer::{
    dedup_headers, find, find_all, normalize, normalize_order_id, normalize_sheet, parse_amount,
    parse_day_first_date,
};
pub use report::{backup_banner, render_hit, render_outcome};
pub use schema::*;
pub use source::{InMemorySource, TableSource};
