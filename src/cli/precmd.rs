//! stint precmd command implementation
//!
//! Entry point for the shell hook; the decision tree lives in `advisor`.

use crate::advisor::{self, AdvisorOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::lifecycle::TaskLifecycle;
use crate::storage::Storage;

pub fn run(storage: &Storage) -> Result<()> {
    let config = Config::load(&storage.config_file())?;
    let lifecycle = TaskLifecycle::new(storage);
    let cwd = std::env::current_dir()?;

    let stdin = std::io::stdin();
    let outcome = advisor::run(
        storage,
        &config,
        &lifecycle,
        &cwd,
        stdin.lock(),
        std::io::stdout(),
    )?;

    if let AdvisorOutcome::Started(report) = outcome {
        println!("{}", super::started_message(&report));
    }

    Ok(())
}
