//! CLI command implementations.

mod config;
mod doctor;
mod list;
mod process;
mod query;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use list::run_list;
pub use process::run_process;
pub use query::run_query;
pub use serve::run_serve;
