// Module declarations
mod app;
pub mod dashboard;
// Re-exports for external use
pub use app::{App, UIConfig, run};
