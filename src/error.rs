use std::fmt;
use std::path::PathBuf;

/// Which allocation of `create_process` ran out of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationTarget {
    PageTable,
    DataPage { vpage: usize },
}

impl fmt::Display for AllocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationTarget::PageTable => write!(f, ": page table"),
            AllocationTarget::DataPage { .. } => write!(f, " data page"),
        }
    }
}

/// Recoverable failures of the paging core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("OOM: proc {proc_num}{target}")]
    OutOfMemory {
        proc_num: usize,
        target: AllocationTarget,
    },
}

/// Errors turning command tokens into [`Command`](crate::io::Command)s.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command}: missing argument <{name}>")]
    MissingArgument {
        command: &'static str,
        name: &'static str,
    },
    #[error("{command}: invalid integer for <{name}>: {token}")]
    InvalidInteger {
        command: &'static str,
        name: &'static str,
        token: String,
    },
    #[error("{command}: <{name}> = {value} is out of range (max {max})")]
    OutOfRange {
        command: &'static str,
        name: &'static str,
        value: i64,
        max: usize,
    },
    #[error("failed to read command file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type SimResult<T> = Result<T, SimError>;
