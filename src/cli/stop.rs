//! stint stop command implementation
//!
//! Stops the tracked task, books it into the day's log, and then, once the
//! stop has been reported, attempts the best-effort upstream work log.

use crate::config::Config;
use crate::error::Result;
use crate::integrations::{SyncOutcome, UpstreamSync};
use crate::lifecycle::{StopOutcome, TaskLifecycle};
use crate::storage::Storage;
use crate::survey::PromptSurvey;

/// Options for the stop command
pub struct StopOptions {
    pub at: Option<String>,
}

pub fn run(storage: &Storage, options: StopOptions) -> Result<()> {
    let at = options.at.as_deref().map(super::parse_at).transpose()?;
    let config = Config::load(&storage.config_file())?;

    let lifecycle = TaskLifecycle::new(storage);
    let stdin = std::io::stdin();
    let mut survey = PromptSurvey::new(stdin.lock(), std::io::stdout(), config.billable_enable);

    let report = match lifecycle.stop(at, &mut survey)? {
        StopOutcome::Idle => {
            println!("No task started.");
            return Ok(());
        }
        StopOutcome::Stopped(report) => report,
    };

    // The local stop is committed and reported before any network runs; a
    // slow or failing upstream can only add a warning below this line.
    println!(
        "Stopped {} {} elapsed.",
        report.identifier, report.formatted_duration
    );

    if let Some(upstream) = UpstreamSync::from_config(&config) {
        let outcome = upstream.sync(
            &report.identifier,
            report.elapsed_seconds(),
            &report.description,
        );
        if outcome == SyncOutcome::Failed {
            println!("{}", upstream.warning(&report.identifier));
        }
    }

    Ok(())
}
