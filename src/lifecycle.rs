//! Task lifecycle orchestration
//!
//! Two states, Idle and Tracking, driven by the active-task store and the
//! daily ledger. One CLI invocation performs at most one transition.
//!
//! `stop` commits locally before anything else happens: the ledger append
//! must succeed before the active record is cleared, and upstream sync runs
//! only after the caller has reported the stop. A crash between append and
//! clear leaves a stale active record behind (cleared manually with
//! `cancel`); the reverse order could lose booked time.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime};

use crate::active::{ActiveTask, ActiveTaskStore};
use crate::daylog::{DayLog, LogEntry};
use crate::duration::format_duration;
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::survey::{DescriptionSource, TaskDescription};

/// Sentinel the `ps1` complication prints when nothing is tracked.
pub const PS1_IDLE: &str = "<No task>";

/// A successful `start`.
#[derive(Debug, Clone)]
pub struct StartReport {
    pub identifier: String,
    pub started_at: DateTime<FixedOffset>,
}

/// A completed `stop`.
#[derive(Debug, Clone)]
pub struct StopReport {
    pub identifier: String,
    pub started_at: DateTime<FixedOffset>,
    pub ended_at: DateTime<FixedOffset>,
    pub duration: Duration,
    pub formatted_duration: String,
    pub description: TaskDescription,
}

impl StopReport {
    /// Whole elapsed seconds for the upstream work log.
    pub fn elapsed_seconds(&self) -> i64 {
        self.duration.num_milliseconds() / 1000
    }
}

/// Outcome of `stop`: stopping while Idle is a reported no-op, not an error.
#[derive(Debug, Clone)]
pub enum StopOutcome {
    Idle,
    Stopped(StopReport),
}

/// Outcome of `cancel`.
#[derive(Debug, Clone)]
pub enum CancelOutcome {
    Idle,
    Cancelled { identifier: String },
}

/// Read-only view for `status`.
#[derive(Debug, Clone)]
pub enum StatusView {
    Idle,
    Tracking {
        identifier: String,
        started_at: DateTime<FixedOffset>,
        elapsed: Duration,
    },
}

/// Orchestrates start/stop/cancel/status over the stores.
pub struct TaskLifecycle {
    active: ActiveTaskStore,
    daylog: DayLog,
}

impl TaskLifecycle {
    pub fn new(storage: &Storage) -> Self {
        Self {
            active: ActiveTaskStore::new(storage),
            daylog: DayLog::new(storage),
        }
    }

    /// Start tracking `identifier`, optionally backdated to a time of day.
    pub fn start(&self, identifier: &str, at: Option<NaiveTime>) -> Result<StartReport> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(Error::MissingIdentifier);
        }

        let now = Local::now();
        let started_at = resolve_at(now, at)?;
        if started_at > now {
            return Err(Error::FutureStart);
        }

        let task = ActiveTask {
            identifier: identifier.to_string(),
            started_at: started_at.fixed_offset(),
        };
        self.active.write(&task)?;

        Ok(StartReport {
            identifier: task.identifier,
            started_at: task.started_at,
        })
    }

    /// Stop the tracked task, append it to the day's ledger, and clear the
    /// active record.
    pub fn stop(
        &self,
        at: Option<NaiveTime>,
        source: &mut dyn DescriptionSource,
    ) -> Result<StopOutcome> {
        let task = match self.active.read() {
            Ok(task) => task,
            Err(Error::NoActiveTask) => return Ok(StopOutcome::Idle),
            Err(err) => return Err(err),
        };

        let now = Local::now();
        let ended_at = resolve_at(now, at)?.fixed_offset();
        if ended_at < task.started_at {
            return Err(Error::EndBeforeStart);
        }

        let duration = ended_at.signed_duration_since(task.started_at);
        let formatted_duration = format_duration(duration);

        // The ledger is keyed by the start day; a stretch past midnight
        // belongs to the day it began.
        let day = task.started_at.date_naive();
        self.daylog.ensure_day(day)?;

        let description = source.collect(&task.identifier)?;

        let entry = LogEntry {
            identifier: task.identifier.clone(),
            formatted_duration: formatted_duration.clone(),
            started_at: task.started_at,
            ended_at,
            description: description.free_text.clone(),
        };
        self.daylog.append(day, &entry)?;
        self.active.clear()?;

        Ok(StopOutcome::Stopped(StopReport {
            identifier: task.identifier,
            started_at: task.started_at,
            ended_at,
            duration,
            formatted_duration,
            description,
        }))
    }

    /// Discard the tracked task without logging its elapsed time.
    pub fn cancel(&self) -> Result<CancelOutcome> {
        let task = match self.active.read() {
            Ok(task) => task,
            Err(Error::NoActiveTask) => return Ok(CancelOutcome::Idle),
            Err(err) => return Err(err),
        };

        self.active.clear()?;
        Ok(CancelOutcome::Cancelled {
            identifier: task.identifier,
        })
    }

    /// Report the current state without modifying anything.
    pub fn status(&self) -> Result<StatusView> {
        let task = match self.active.read() {
            Ok(task) => task,
            Err(Error::NoActiveTask) => return Ok(StatusView::Idle),
            Err(err) => return Err(err),
        };

        let elapsed = Local::now().signed_duration_since(task.started_at);
        Ok(StatusView::Tracking {
            identifier: task.identifier,
            started_at: task.started_at,
            elapsed,
        })
    }

    /// One-line shell prompt complication.
    pub fn ps1(&self) -> Result<String> {
        match self.status()? {
            StatusView::Idle => Ok(PS1_IDLE.to_string()),
            StatusView::Tracking {
                identifier,
                elapsed,
                ..
            } => Ok(format!("{identifier} {}", format_duration(elapsed))),
        }
    }

    /// Whether a task is currently tracked.
    pub fn tracking(&self) -> bool {
        self.active.exists()
    }
}

/// Resolve an optional wall-clock time of day against today's local date.
fn resolve_at(now: DateTime<Local>, at: Option<NaiveTime>) -> Result<DateTime<Local>> {
    let Some(time) = at else {
        return Ok(now);
    };

    now.date_naive()
        .and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| Error::InvalidTime(time.format("%H:%M").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(TaskDescription);

    impl DescriptionSource for Canned {
        fn collect(&mut self, _identifier: &str) -> Result<TaskDescription> {
            Ok(self.0.clone())
        }
    }

    fn canned(text: &str) -> Canned {
        Canned(TaskDescription {
            job_type: "Research".to_string(),
            billable: None,
            free_text: text.to_string(),
        })
    }

    fn lifecycle() -> (tempfile::TempDir, Storage, TaskLifecycle) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::open(dir.path().to_path_buf()).expect("storage");
        let lifecycle = TaskLifecycle::new(&storage);
        (dir, storage, lifecycle)
    }

    #[test]
    fn start_then_stop_books_the_interval() {
        let (_dir, storage, lifecycle) = lifecycle();

        let started = lifecycle.start("PROJ-1", None).expect("start");
        let outcome = lifecycle.stop(None, &mut canned("quick fix")).expect("stop");

        let StopOutcome::Stopped(report) = outcome else {
            panic!("expected a stop report");
        };
        assert_eq!(report.identifier, "PROJ-1");
        assert!(report.duration >= Duration::zero());
        assert!(report.duration < Duration::seconds(5));

        let daylog = DayLog::new(&storage);
        let day = started.started_at.date_naive();
        let entries = daylog.read_day(day).expect("read").expect("report").entries;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].identifier, "PROJ-1");
        assert_eq!(entries[0].description, "quick fix");

        assert!(!lifecycle.tracking());
        assert!(matches!(lifecycle.status().expect("status"), StatusView::Idle));
    }

    #[test]
    fn start_while_tracking_keeps_the_original() {
        let (_dir, _storage, lifecycle) = lifecycle();
        lifecycle.start("Y", None).expect("start");

        assert!(matches!(
            lifecycle.start("X", None),
            Err(Error::AlreadyActive)
        ));

        match lifecycle.status().expect("status") {
            StatusView::Tracking { identifier, .. } => assert_eq!(identifier, "Y"),
            StatusView::Idle => panic!("expected tracking"),
        }
    }

    #[test]
    fn blank_identifier_is_rejected() {
        let (_dir, _storage, lifecycle) = lifecycle();
        assert!(matches!(
            lifecycle.start("   ", None),
            Err(Error::MissingIdentifier)
        ));
    }

    #[test]
    fn future_start_is_rejected() {
        let (_dir, _storage, lifecycle) = lifecycle();
        let later = (Local::now() + Duration::minutes(10)).time();

        assert!(matches!(
            lifecycle.start("PROJ-1", Some(later)),
            Err(Error::FutureStart)
        ));
        assert!(!lifecycle.tracking());
    }

    #[test]
    fn idle_stop_cancel_status_are_no_ops() {
        let (dir, _storage, lifecycle) = lifecycle();

        assert!(matches!(
            lifecycle.stop(None, &mut canned("")).expect("stop"),
            StopOutcome::Idle
        ));
        assert!(matches!(
            lifecycle.cancel().expect("cancel"),
            CancelOutcome::Idle
        ));
        assert!(matches!(lifecycle.status().expect("status"), StatusView::Idle));
        assert_eq!(lifecycle.ps1().expect("ps1"), PS1_IDLE);

        // No ledger appeared from any of that.
        let logs: Vec<_> = std::fs::read_dir(dir.path().join("logs"))
            .expect("logs dir")
            .collect();
        assert!(logs.is_empty());
    }

    #[test]
    fn cancel_discards_without_logging() {
        let (dir, _storage, lifecycle) = lifecycle();
        lifecycle.start("PROJ-1", None).expect("start");

        match lifecycle.cancel().expect("cancel") {
            CancelOutcome::Cancelled { identifier } => assert_eq!(identifier, "PROJ-1"),
            CancelOutcome::Idle => panic!("expected a cancellation"),
        }

        assert!(!lifecycle.tracking());
        let logs: Vec<_> = std::fs::read_dir(dir.path().join("logs"))
            .expect("logs dir")
            .collect();
        assert!(logs.is_empty());
    }

    #[test]
    fn backdated_stop_rejects_ending_before_start() {
        let (_dir, _storage, lifecycle) = lifecycle();
        lifecycle.start("PROJ-1", None).expect("start");

        let midnight = NaiveTime::from_hms_opt(0, 0, 0).expect("time");
        assert!(matches!(
            lifecycle.stop(Some(midnight), &mut canned("")),
            Err(Error::EndBeforeStart)
        ));
        // Still tracking; the failed stop changed nothing.
        assert!(lifecycle.tracking());
    }

    #[test]
    fn ps1_names_the_task() {
        let (_dir, _storage, lifecycle) = lifecycle();
        lifecycle.start("PROJ-1", None).expect("start");

        let line = lifecycle.ps1().expect("ps1");
        assert!(line.starts_with("PROJ-1 "));
    }
}
