//! Git-aware autostart advisor
//!
//! Wired into the shell as a precmd hook: when nothing is tracked and the
//! shell has moved into a git work tree it has not asked about yet, offer to
//! start tracking, suggesting the branch's leading segment as the task
//! identifier when it is shaped like a configured upstream's issue key.
//!
//! This is a one-shot decision tree. The only durable side effects are the
//! last-seen-working-directory marker and, on a yes, a regular `start`
//! transition.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::git;
use crate::integrations::UpstreamSync;
use crate::lifecycle::{StartReport, TaskLifecycle};
use crate::storage::Storage;

/// How the advisor run ended.
#[derive(Debug)]
pub enum AdvisorOutcome {
    /// Nothing to ask: already tracking, not a repository, or the directory
    /// was already seen.
    Skipped,
    /// The user said no.
    Declined,
    /// The answer was not recognized; treated as a decline.
    UnknownAnswer,
    /// Tracking started.
    Started(StartReport),
}

pub fn run<R: BufRead, W: Write>(
    storage: &Storage,
    config: &Config,
    lifecycle: &TaskLifecycle,
    cwd: &Path,
    mut reader: R,
    mut writer: W,
) -> Result<AdvisorOutcome> {
    let outcome = advise(storage, config, lifecycle, cwd, &mut reader, &mut writer)?;

    // The marker is rewritten on every hook run so the same directory is
    // only ever asked about once.
    storage.set_working_dir(cwd)?;

    Ok(outcome)
}

fn advise<R: BufRead, W: Write>(
    storage: &Storage,
    config: &Config,
    lifecycle: &TaskLifecycle,
    cwd: &Path,
    reader: &mut R,
    writer: &mut W,
) -> Result<AdvisorOutcome> {
    if lifecycle.tracking() {
        return Ok(AdvisorOutcome::Skipped);
    }

    let Some(repo) = git::open_repo(cwd) else {
        return Ok(AdvisorOutcome::Skipped);
    };

    if storage.last_working_dir()?.as_deref() == Some(cwd) {
        return Ok(AdvisorOutcome::Skipped);
    }

    let candidate = git::branch_leader(&repo);
    let upstream = UpstreamSync::from_config(config);
    let plausible = match (&candidate, &upstream) {
        (Some(candidate), Some(upstream)) => upstream.classify(candidate),
        _ => false,
    };

    if plausible {
        let candidate = candidate.as_deref().unwrap_or_default();
        write!(
            writer,
            "stint: Git repository detected, would you like to start tracking time \
             with {candidate} as the task id?\n (y/n/o): "
        )?;
    } else {
        write!(
            writer,
            "stint: Git repository detected, would you like to start tracking time?\n (y/n): "
        )?;
    }
    writer.flush()?;

    let mut answer = String::new();
    reader.read_line(&mut answer)?;

    let identifier = match answer.trim() {
        "y" if plausible => candidate.unwrap_or_default(),
        "y" => prompt_identifier(reader, writer)?,
        "o" if plausible => prompt_identifier(reader, writer)?,
        "n" => return Ok(AdvisorOutcome::Declined),
        _ => {
            writeln!(writer, "Unknown response, exiting.")?;
            return Ok(AdvisorOutcome::UnknownAnswer);
        }
    };

    let report = lifecycle.start(&identifier, None)?;
    Ok(AdvisorOutcome::Started(report))
}

fn prompt_identifier<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<String> {
    write!(writer, "Enter a task identifier: ")?;
    writer.flush()?;

    let mut identifier = String::new();
    reader.read_line(&mut identifier)?;
    Ok(identifier.trim().to_string())
}
