//! stint start command implementation

use crate::error::Result;
use crate::lifecycle::TaskLifecycle;
use crate::storage::Storage;

/// Options for the start command
pub struct StartOptions {
    pub identifier: String,
    pub at: Option<String>,
}

pub fn run(storage: &Storage, options: StartOptions) -> Result<()> {
    let at = options.at.as_deref().map(super::parse_at).transpose()?;

    let lifecycle = TaskLifecycle::new(storage);
    let report = lifecycle.start(&options.identifier, at)?;

    println!("{}", super::started_message(&report));
    Ok(())
}
