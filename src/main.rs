use chemsim::command_line::*;
use clap::Command;
use tracing_subscriber::EnvFilter;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let app = Command::new("chemsim")
        .about("Molecular similarity: atom-atom-path matching and bit fingerprints")
        .subcommand_required(true)
        .subcommand(fingerprint::command())
        .subcommand(sort_dictionary::command())
        .subcommand(similarity_search::command());

    let matches = app.get_matches();

    match matches.subcommand() {
        Some((fingerprint::NAME, m)) => fingerprint::action(m),
        Some((sort_dictionary::NAME, m)) => sort_dictionary::action(m),
        Some((similarity_search::NAME, m)) => similarity_search::action(m),
        Some((other, _)) => Err(eyre::eyre!("Unknown subcommand '{}'", other)),
        None => Err(eyre::eyre!("No subcommand given")),
    }
}
