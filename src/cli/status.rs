//! stint status command implementation

use crate::duration::format_duration;
use crate::error::Result;
use crate::lifecycle::{StatusView, TaskLifecycle};
use crate::storage::Storage;

pub fn run(storage: &Storage) -> Result<()> {
    let lifecycle = TaskLifecycle::new(storage);

    match lifecycle.status()? {
        StatusView::Idle => println!("No task currently started"),
        StatusView::Tracking {
            identifier,
            started_at,
            elapsed,
        } => println!(
            "Task {identifier} started {} ago. {}",
            format_duration(elapsed),
            started_at.format("%a %b %e %H:%M:%S %Y")
        ),
    }

    Ok(())
}
