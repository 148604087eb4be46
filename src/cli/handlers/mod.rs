mod session;
pub use session::Session;

use crate::cli::commands::Cli;
use crate::cli::reporter::ConsoleReporter;
use crate::io::storage::Storage;
use crate::model::config::Config;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run the interactive loop, or the single line given on the command line.
/// Returns whether every line succeeded.
pub fn dispatch(cli: &Cli, config: &Config) -> Result<bool, Box<dyn std::error::Error>> {
    let mut storage_config = config.storage.clone();
    if let Some(path) = &cli.data_file {
        storage_config.path = path.clone();
    }
    let storage = Storage::from_config(&storage_config);
    log::debug!("data file: {}", storage.path().display());

    let mut reporter = ConsoleReporter;
    let mut session = Session::open(storage, cli.json, &mut reporter);
    match cli.one_shot() {
        Some(line) => Ok(session.execute_line(&line, &mut reporter).is_ok()),
        None => {
            session.run(std::io::stdin().lock(), &mut reporter)?;
            Ok(true)
        }
    }
}
