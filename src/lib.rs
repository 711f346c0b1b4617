pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod pdf;
pub mod preview;
pub mod render;
pub mod report;
pub mod table;

pub use config::{Branding, Config};
pub use error::{ReportError, Result};
pub use filter::FilterContext;
pub use render::{assemble, DocumentRenderer, OutputFormat, RenderedDocument};
pub use report::{AgingSummary, PreparedReport, ReportContext};
pub use table::{normalize, RawTable, RecordTable};
