//! stint cancel command implementation

use crate::error::Result;
use crate::lifecycle::{CancelOutcome, TaskLifecycle};
use crate::storage::Storage;

pub fn run(storage: &Storage) -> Result<()> {
    let lifecycle = TaskLifecycle::new(storage);

    match lifecycle.cancel()? {
        CancelOutcome::Idle => println!("No task started."),
        CancelOutcome::Cancelled { identifier } => println!("Cancelled {identifier}."),
    }

    Ok(())
}
