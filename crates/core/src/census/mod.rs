//! Census language API: query construction from clicked features and
//! response filtering into a displayable table.

mod query;
mod table;

pub use query::{pad, LookupQuery};
pub use table::{popup_html, LanguageRow, LanguageTable, LookupOutcome};
