//! Response shapes shared by the tools.
//!
//! Failures in the lookup and search tools are reported as data: every
//! response carries a [`Status`] instead of surfacing an error to the caller.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }
}

/// A status plus a human-readable sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReport {
    pub status: Status,
    pub report: String,
}

impl ToolReport {
    pub fn success(report: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            report: report.into(),
        }
    }

    pub fn error(report: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            report: report.into(),
        }
    }
}

pub type TimeResult = ToolReport;
pub type CapitalResult = ToolReport;
