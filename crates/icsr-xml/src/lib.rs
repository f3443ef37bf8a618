//! HL7 v3 E2B(R3) XML mapping for ICSR reports.
//!
//! [`export_many`] renders reports into one batch message built from a
//! template; [`import_many`] reads every report back out of such a message.
//! Wire identifiers (`r-id{n}` for reactions, `d-id{k}` for drugs) are
//! positional and only live inside a document.

pub mod common;
pub mod error;
pub mod tree;

mod codes;
mod export;
mod import;

pub use error::{MappingError, Result};
pub use export::{
    BatchExport, ExportOptions, ExportRecord, TEMPLATE, Template, export_many, export_one,
};
pub use import::{BatchImport, ImportRecord, Imported, import_many, import_one};
