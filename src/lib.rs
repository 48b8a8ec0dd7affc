pub mod config;
pub mod trace;
pub mod value;

// Re-export the entry points for convenience
pub use config::ReportConfig;
pub use trace::Context;
pub use value::{JsonValue, TraceValue};
