pub mod cli_args;
pub mod config;
pub mod cricapi;
pub mod field;
pub mod flatten;
pub mod http_client;
pub mod ledger;
pub mod listing;
pub mod logging;
pub mod pipeline;
pub mod store;
