//! CLI command implementations.
//!
//! - `check`: Resolve and validate a configuration file
//! - `show`: Print the resolved configuration as JSON or YAML
//! - `samples`: List the resolved samples
//! - `completions`: Generate shell completion scripts

pub mod check;
pub mod completions;
pub mod samples;
pub mod show;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use samples::SamplesCommand;
pub use show::ShowCommand;
