pub mod analysis;
pub mod config;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod publish;
pub mod record;
pub mod report;
