//! stint config command implementation
//!
//! Dumps the resolved configuration in the same key=value shape as the
//! config file, so the output doubles as a template.

use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;

pub fn run(storage: &Storage) -> Result<()> {
    let config = Config::load(&storage.config_file())?;

    println!(
        "billable_enable={}",
        if config.billable_enable { "yes" } else { "no" }
    );
    println!(
        "upstream_service={}",
        config
            .upstream_service
            .map(|service| service.to_string())
            .unwrap_or_default()
    );
    println!("url={}", config.url);
    println!("token={}", config.token);
    println!("username={}", config.username);
    println!(
        "default_gitlab_project_id={}",
        config.default_gitlab_project_id
    );

    Ok(())
}
