pub mod chart;
pub mod config;
pub mod error;
pub mod group;
pub mod pipeline;
pub mod report;
pub mod table;

pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use pipeline::{convert_file, convert_str};
