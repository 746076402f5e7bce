use std::fmt::Display;
use std::str::FromStr;

pub mod fingerprint;
pub mod similarity_search;
pub mod sort_dictionary;

pub mod prelude {
    pub use clap::{Arg, ArgAction, ArgMatches, Command};

    pub use crate::command_line::{parse_arg, required_arg};
}

/// Parses an optional argument, falling back to `default` when it was not given.
pub fn parse_arg<T>(matches: &clap::ArgMatches, name: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match matches.get_one::<String>(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| eyre::eyre!("Invalid value '{}' for --{}: {}", value, name, e)),
        None => Ok(default),
    }
}

pub fn required_arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> eyre::Result<&'a String> {
    matches
        .get_one::<String>(name)
        .ok_or(eyre::eyre!("Failed to extract {}", name))
}
