use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Initializing,
    Processing,
    Validating,
    Completed,
    Error,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Initializing => "initializing",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Validating => "validating",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Error => "error",
        }
    }

    /// Transitions allowed by the status record. Staying in a running state is
    /// allowed so progress checkpoints can be written.
    pub fn can_transition_to(&self, next: ProcessingStatus) -> bool {
        use ProcessingStatus::*;
        matches!(
            (self, next),
            (Initializing, Processing)
                | (Initializing, Error)
                | (Processing, Processing)
                | (Processing, Validating)
                | (Processing, Error)
                | (Validating, Validating)
                | (Validating, Completed)
                | (Validating, Error)
                | (Completed, Initializing)
                | (Error, Initializing)
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self,
            ProcessingStatus::Initializing
                | ProcessingStatus::Processing
                | ProcessingStatus::Validating
        )
    }
}

impl FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initializing" => Ok(ProcessingStatus::Initializing),
            "processing" => Ok(ProcessingStatus::Processing),
            "validating" => Ok(ProcessingStatus::Validating),
            "completed" => Ok(ProcessingStatus::Completed),
            "error" => Ok(ProcessingStatus::Error),
            _ => Err(format!("Invalid processing status: {}", s)),
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
