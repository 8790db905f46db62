//! Output rendering (Markdown report, import summary)

pub mod report;
pub mod summary;

pub use report::{render_report, write_report, ReportOptions};
pub use summary::render_import_summary;
