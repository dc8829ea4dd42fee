//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; the route table dispatches to library services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat, RunArgs};
pub use presentation::{format_report_json, format_report_text, format_verify_results, preview};
pub use route::{CommandOutput, RunContext};
