// Frameworks: process wiring, configuration and the command line.

pub mod cli;
pub mod config;
