//! Interactive task description collection
//!
//! Stopping a task asks what the time was spent on. The questions are
//! rendered by `PromptSurvey` over any reader/writer pair so tests can feed
//! canned answers; the lifecycle only depends on the `DescriptionSource`
//! trait.

use std::io::{BufRead, Write};

use crate::error::Result;

/// Job types offered at stop time, first entry is the default.
pub const JOB_TYPES: [&str; 13] = [
    "Frontend Development",
    "Code Review",
    "Deployment",
    "Internal Meeting",
    "Backend Development",
    "Design",
    "Client Meeting",
    "Quality Assurance",
    "Project Discovery",
    "Project Management",
    "Strategy",
    "Site Analysis",
    "Research",
];

/// Billable-status answers, first entry is the default.
pub const BILLABLE_OPTIONS: [&str; 2] = ["Billable", "Not Billable"];

/// What a stopped interval was spent on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescription {
    pub job_type: String,
    /// Present only when the billable question was asked.
    pub billable: Option<String>,
    pub free_text: String,
}

impl TaskDescription {
    /// Format the upstream work-log comment. The Status line appears only
    /// when a billable answer was collected.
    pub fn summary(&self) -> String {
        match &self.billable {
            Some(status) => format!(
                "Job Type: {}\nStatus: {}\nDescription: {}",
                self.job_type, status, self.free_text
            ),
            None => format!(
                "Job Type: {}\nDescription: {}",
                self.job_type, self.free_text
            ),
        }
    }
}

/// Source of task descriptions at stop time.
pub trait DescriptionSource {
    fn collect(&mut self, identifier: &str) -> Result<TaskDescription>;
}

/// Line-oriented survey over a reader/writer pair.
pub struct PromptSurvey<R, W> {
    reader: R,
    writer: W,
    ask_billable: bool,
}

impl<R: BufRead, W: Write> PromptSurvey<R, W> {
    pub fn new(reader: R, writer: W, ask_billable: bool) -> Self {
        Self {
            reader,
            writer,
            ask_billable,
        }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Numbered select. Empty input takes the default; a selection that is
    /// not a valid option number gets one more chance, then the default.
    fn select(&mut self, message: &str, options: &[&str]) -> Result<String> {
        writeln!(self.writer, "{message}:")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}) {}", index + 1, option)?;
        }

        for _ in 0..2 {
            write!(self.writer, "Choice [1]: ")?;
            self.writer.flush()?;

            let answer = self.read_line()?;
            if answer.is_empty() {
                return Ok(options[0].to_string());
            }
            match answer.parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => {
                    return Ok(options[choice - 1].to_string());
                }
                _ => writeln!(self.writer, "Please pick 1-{}.", options.len())?,
            }
        }

        Ok(options[0].to_string())
    }

    fn input(&mut self, message: &str) -> Result<String> {
        write!(self.writer, "{message}: ")?;
        self.writer.flush()?;
        self.read_line()
    }
}

impl<R: BufRead, W: Write> DescriptionSource for PromptSurvey<R, W> {
    fn collect(&mut self, identifier: &str) -> Result<TaskDescription> {
        writeln!(self.writer, "Stopping {identifier}...")?;

        let job_type = self.select("JobType", &JOB_TYPES)?;
        let billable = if self.ask_billable {
            Some(self.select("Status", &BILLABLE_OPTIONS)?)
        } else {
            None
        };
        let free_text = self.input("Description")?;

        Ok(TaskDescription {
            job_type,
            billable,
            free_text,
        })
    }
}
