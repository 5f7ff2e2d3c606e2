pub mod errors;
pub mod html;
pub mod refresh;
pub mod table;

pub use errors::DashboardError;
pub use html::escape_html;
pub use refresh::RefreshGate;
pub use table::{stats_table, Table};
