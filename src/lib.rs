#![deny(clippy::print_stdout)]

pub mod command_line;
pub mod fingerprint;
pub mod molecule;
pub mod paths;
pub mod search;
pub mod similarity;
