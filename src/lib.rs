pub mod backend;
pub mod cli;
pub mod config;
pub mod console;
pub mod driver;
pub mod error;
pub mod matrix;
pub mod poll;
pub mod profile;
pub mod region;
pub mod report;
pub mod util;
