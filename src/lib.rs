pub mod cli;
pub mod config;
pub mod convert;
pub mod fetch;
pub mod parser;
pub mod profile;
pub mod telemetry;

pub fn get_version() -> String {
    "0.2.1".to_string()
}
