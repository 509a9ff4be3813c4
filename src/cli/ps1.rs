//! stint ps1 command implementation
//!
//! Prints the one-line prompt complication without a trailing newline so it
//! embeds cleanly in a shell prompt.

use crate::error::Result;
use crate::lifecycle::TaskLifecycle;
use crate::storage::Storage;

pub fn run(storage: &Storage) -> Result<()> {
    let lifecycle = TaskLifecycle::new(storage);
    print!("{}", lifecycle.ps1()?);
    Ok(())
}
