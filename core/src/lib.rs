//! Model-to-risk evaluation pipeline: input loading, parsing into the typed
//! model, the rule evaluation engine with its RAA pre-pass, the risk
//! tracking overlay, plugin execution, and report emission.

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod parse;
pub mod plugin;
pub mod report;
pub mod tracking;

pub use config::Config;
pub use engine::Evaluation;
pub use engine::RuleRegistry;
pub use engine::read_and_analyze_model;
pub use error::Error;
pub use error::Result;
pub use input::ModelInput;
pub use parse::parse_model;
pub use report::write_report;
