//! Database operations for the `businesses` table.

mod read;
mod types;
mod write;

pub use read::{category_counts, escape_like, list_businesses};
pub use types::{BusinessRow, CategoryCountRow};
pub use write::{import_businesses, ImportCounts};
