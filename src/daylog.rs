//! Append-only daily ledger of completed intervals
//!
//! One file per calendar day, named `YYYY-MM-DD`, one entry per line:
//!
//! ```text
//! identifier,formatted-duration,RFC3339-start,RFC3339-end,base64(free text)
//! ```
//!
//! The free text is base64-encoded because it may contain commas or newlines
//! that would otherwise break the line format; the other fields never do.
//! Entries are immutable once appended and a day's ledger is keyed by the
//! interval's **start** date, so a stretch over midnight files under the day
//! it began.

use std::fs::OpenOptions;
use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, SecondsFormat};

use crate::error::{Error, Result};
use crate::storage::Storage;

/// One completed interval in a day's ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub identifier: String,
    pub formatted_duration: String,
    pub started_at: DateTime<FixedOffset>,
    pub ended_at: DateTime<FixedOffset>,
    pub description: String,
}

impl LogEntry {
    /// Elapsed time covered by this entry.
    pub fn elapsed(&self) -> Duration {
        self.ended_at - self.started_at
    }

    /// Start time of day for display.
    pub fn start_display(&self) -> String {
        self.started_at.format("%H:%M").to_string()
    }

    /// End time for display; includes the end date when the interval crossed
    /// into another day.
    pub fn end_display(&self) -> String {
        if self.started_at.date_naive() == self.ended_at.date_naive() {
            self.ended_at.format("%H:%M").to_string()
        } else {
            self.ended_at.format("%H:%M %Y-%m-%d").to_string()
        }
    }

    fn serialize(&self) -> String {
        format!(
            "{},{},{},{},{}\n",
            self.identifier,
            self.formatted_duration,
            self.started_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            self.ended_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            BASE64_STANDARD.encode(self.description.as_bytes()),
        )
    }

    fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 5 {
            return None;
        }

        let started_at = DateTime::parse_from_rfc3339(fields[2]).ok()?;
        let ended_at = DateTime::parse_from_rfc3339(fields[3]).ok()?;

        // A description that no longer decodes renders as empty rather than
        // poisoning the whole day.
        let description = BASE64_STANDARD
            .decode(fields[4])
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_default();

        Some(Self {
            identifier: fields[0].to_string(),
            formatted_duration: fields[1].to_string(),
            started_at,
            ended_at,
            description,
        })
    }
}

/// A rendered day: its entries in file order plus the summed total.
#[derive(Debug, Clone)]
pub struct DayReport {
    pub date: NaiveDate,
    pub entries: Vec<LogEntry>,
    pub total: Duration,
}

/// Store for the per-day ledgers.
#[derive(Debug, Clone)]
pub struct DayLog {
    storage: Storage,
}

impl DayLog {
    pub fn new(storage: &Storage) -> Self {
        Self {
            storage: storage.clone(),
        }
    }

    /// Create an empty ledger for the day if none exists. Idempotent.
    pub fn ensure_day(&self, day: NaiveDate) -> Result<()> {
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.storage.day_file(day))?;
        Ok(())
    }

    /// Append one entry to the day's ledger. Existing lines are never
    /// rewritten.
    pub fn append(&self, day: NaiveDate, entry: &LogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.storage.day_file(day))?;
        file.write_all(entry.serialize().as_bytes())?;
        Ok(())
    }

    /// Read one day's ledger.
    ///
    /// Returns `None` when the day has no ledger file. A malformed line
    /// aborts the whole read with `CorruptLine`; the ledger is the record of
    /// paid time and guessing around damage is worse than stopping.
    pub fn read_day(&self, day: NaiveDate) -> Result<Option<DayReport>> {
        let path = self.storage.day_file(day);
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)?;
        let mut entries = Vec::new();
        let mut total = Duration::zero();

        for (index, line) in raw.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let entry = LogEntry::parse(line).ok_or(Error::CorruptLine {
                day,
                line: index + 1,
            })?;
            total = total + entry.elapsed();
            entries.push(entry);
        }

        Ok(Some(DayReport {
            date: day,
            entries,
            total,
        }))
    }

    /// Read every day from `from` to `to` inclusive, one report per day.
    ///
    /// Days without a ledger yield `None` so callers can render a
    /// placeholder.
    pub fn read_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Option<DayReport>)>> {
        if to < from {
            return Err(Error::InvalidRange { from, to });
        }

        from.iter_days()
            .take_while(|day| *day <= to)
            .map(|day| Ok((day, self.read_day(day)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daylog() -> (tempfile::TempDir, DayLog) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::open(dir.path().to_path_buf()).expect("storage");
        let log = DayLog::new(&storage);
        (dir, log)
    }

    fn entry(identifier: &str, start: &str, end: &str, description: &str) -> LogEntry {
        let started_at = DateTime::parse_from_rfc3339(start).expect("start");
        let ended_at = DateTime::parse_from_rfc3339(end).expect("end");
        LogEntry {
            identifier: identifier.to_string(),
            formatted_duration: crate::duration::format_duration(ended_at - started_at),
            started_at,
            ended_at,
            description: description.to_string(),
        }
    }

    fn day(date: &str) -> NaiveDate {
        date.parse().expect("date")
    }

    #[test]
    fn append_then_read_round_trips_awkward_text() {
        let (_dir, log) = daylog();
        let date = day("2024-03-07");
        let text = "fixed login,\nand a comma, and a trailing newline\n";
        let written = entry(
            "PROJ-1",
            "2024-03-07T09:00:00+01:00",
            "2024-03-07T09:30:00+01:00",
            text,
        );

        log.append(date, &written).expect("append");

        let report = log.read_day(date).expect("read").expect("report");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0], written);
        assert_eq!(report.entries[0].description, text);
    }

    #[test]
    fn missing_day_reads_as_none() {
        let (_dir, log) = daylog();
        assert!(log.read_day(day("2024-03-07")).expect("read").is_none());
    }

    #[test]
    fn ensure_day_creates_an_empty_ledger_once() {
        let (_dir, log) = daylog();
        let date = day("2024-03-07");

        log.ensure_day(date).expect("ensure");
        log.ensure_day(date).expect("ensure twice");

        let report = log.read_day(date).expect("read").expect("report");
        assert!(report.entries.is_empty());
        assert_eq!(report.total, Duration::zero());
    }

    #[test]
    fn total_sums_the_day() {
        let (_dir, log) = daylog();
        let date = day("2024-03-07");
        log.append(
            date,
            &entry(
                "A",
                "2024-03-07T09:00:00+01:00",
                "2024-03-07T09:45:00+01:00",
                "",
            ),
        )
        .expect("append");
        log.append(
            date,
            &entry(
                "B",
                "2024-03-07T10:00:00+01:00",
                "2024-03-07T10:30:00+01:00",
                "",
            ),
        )
        .expect("append");

        let report = log.read_day(date).expect("read").expect("report");
        assert_eq!(report.total, Duration::minutes(75));
        assert_eq!(crate::duration::format_duration(report.total), "1h 15m 0s");
    }

    #[test]
    fn corrupt_line_aborts_the_read() {
        let (dir, log) = daylog();
        let date = day("2024-03-07");
        log.append(
            date,
            &entry(
                "A",
                "2024-03-07T09:00:00+01:00",
                "2024-03-07T09:45:00+01:00",
                "ok",
            ),
        )
        .expect("append");
        let path = dir.path().join("logs/2024-03-07");
        let mut raw = std::fs::read_to_string(&path).expect("read");
        raw.push_str("only,three,fields\n");
        std::fs::write(&path, raw).expect("write");

        assert!(matches!(
            log.read_day(date),
            Err(Error::CorruptLine { line: 2, .. })
        ));
    }

    #[test]
    fn midnight_crossing_shows_end_date() {
        let late = entry(
            "NIGHT-1",
            "2024-03-07T23:30:00+01:00",
            "2024-03-08T00:15:00+01:00",
            "",
        );
        assert_eq!(late.end_display(), "00:15 2024-03-08");

        let same_day = entry(
            "DAY-1",
            "2024-03-07T09:00:00+01:00",
            "2024-03-07T09:30:00+01:00",
            "",
        );
        assert_eq!(same_day.end_display(), "09:30");
    }

    #[test]
    fn range_is_inclusive_with_placeholders() {
        let (_dir, log) = daylog();
        log.append(
            day("2024-03-07"),
            &entry(
                "A",
                "2024-03-07T09:00:00+01:00",
                "2024-03-07T09:30:00+01:00",
                "",
            ),
        )
        .expect("append");

        let days = log
            .read_range(day("2024-03-06"), day("2024-03-08"))
            .expect("range");

        assert_eq!(days.len(), 3);
        assert!(days[0].1.is_none());
        assert!(days[1].1.is_some());
        assert!(days[2].1.is_none());
    }

    #[test]
    fn single_day_range_renders_exactly_one_day() {
        let (_dir, log) = daylog();
        let days = log
            .read_range(day("2024-03-07"), day("2024-03-07"))
            .expect("range");
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let (_dir, log) = daylog();
        assert!(matches!(
            log.read_range(day("2024-03-08"), day("2024-03-07")),
            Err(Error::InvalidRange { .. })
        ));
    }
}
