pub mod catalog;
pub mod checkout;
pub mod checks;
pub mod cli;
pub mod data;
pub mod error;
pub mod markers;
pub mod output;
pub mod render;
pub mod results;
pub mod runner;
pub mod selection;
pub mod stats;
