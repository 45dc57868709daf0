//! Append-only CSV log of trial results
//!
//! The file is opened in append mode for each row and closed again, so a
//! crash mid-session keeps every trial recorded so far.

use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::block::Stage;
use super::errors::Result;

pub const CSV_HEADER: &str = "timestamp,block,trial,response_time,target_response,response";

/// Participant judgement (or the correct one)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// "Was in the list" (RIGHT)
    Congruent,
    /// "Was not in the list" (LEFT)
    Incongruent,
}

impl Response {
    pub fn from_membership(is_target: bool) -> Self {
        if is_target {
            Response::Congruent
        } else {
            Response::Incongruent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Response::Congruent => "congruent",
            Response::Incongruent => "incongruent",
        }
    }
}

/// One logged trial
#[derive(Clone, Debug)]
pub struct TrialRecord {
    pub timestamp: DateTime<Local>,
    pub block: Stage,
    /// 1-based within the block
    pub trial: usize,
    /// Seconds from item display to keypress
    pub response_time: f64,
    pub target_response: Response,
    pub response: Response,
}

impl TrialRecord {
    pub fn is_correct(&self) -> bool {
        self.target_response == self.response
    }

    /// CSV line without terminator
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.block.label(),
            self.trial,
            self.response_time,
            self.target_response.label(),
            self.response.label(),
        )
    }
}

/// Writer for the results file
#[derive(Clone, Debug)]
pub struct ResultLog {
    path: PathBuf,
    write_header: bool,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>, write_header: bool) -> Self {
        ResultLog {
            path: path.into(),
            write_header,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, prefixed by the header if the file is new
    pub fn append(&self, record: &TrialRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut chunk = String::new();
        if self.write_header && file.metadata()?.len() == 0 {
            chunk.push_str(CSV_HEADER);
            chunk.push('\n');
        }
        chunk.push_str(&record.to_csv_row());
        chunk.push('\n');

        file.write_all(chunk.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
