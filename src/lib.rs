pub mod analysis;
pub mod apply;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod constants;
pub mod cover;
pub mod error;
pub mod logging;
pub mod plan;
pub mod scanner;
pub mod session;
pub mod tags;
pub mod testing;
pub mod ui;
pub mod utils;
pub mod workset;
