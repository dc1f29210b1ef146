//! Daily due tracking: paged listing, collection rules and spreadsheet export.

pub mod aggregator;
pub mod collection;
pub mod export;

pub use aggregator::{DueListAggregator, DueTotals};
pub use collection::{edit_due, ensure_editable, prepare_collection, preview_collection, CollectionPreview};
pub use export::{dues_workbook, save_dues_workbook};
