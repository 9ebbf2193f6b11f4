pub mod config;
pub mod inputs;
pub mod logging;
pub mod run;
