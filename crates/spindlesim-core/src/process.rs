//! User-process model: an ordered request list with a cursor.
//!
//! A process is data plus cursor movement; every state transition is owned
//! by the event engine.

use crate::event::OpKind;

/// Scheduling state of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    Ready,
    Running,
    Blocked,
    Finished,
}

impl std::fmt::Display for ProcState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "READY"),
            Self::Running => write!(f, "RUNNING"),
            Self::Blocked => write!(f, "BLOCKED"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

/// One user process: pid, request sequence, cursor, state, quantum residue.
#[derive(Debug, Clone)]
pub struct Process {
    pid: u32,
    requests: Vec<(OpKind, u64)>,
    cursor: usize,
    pub state: ProcState,
    pub quantum_remaining: f64,
}

impl Process {
    /// New process in READY state with its cursor at the first request.
    pub fn new(pid: u32, requests: Vec<(OpKind, u64)>) -> Self {
        Self {
            pid,
            requests,
            cursor: 0,
            state: ProcState::Ready,
            quantum_remaining: 0.0,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The request under the cursor, if any. Does not advance.
    pub fn peek_next_request(&self) -> Option<(OpKind, u64)> {
        self.requests.get(self.cursor).copied()
    }

    /// Move the cursor past the current request.
    pub fn advance(&mut self) {
        if self.cursor < self.requests.len() {
            self.cursor += 1;
        }
    }

    /// The cursor has passed the last request.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.requests.len()
    }

    /// Completed request count.
    pub fn completed(&self) -> usize {
        self.cursor
    }

    /// Total request count.
    pub fn total_ops(&self) -> usize {
        self.requests.len()
    }

    pub fn requests(&self) -> &[(OpKind, u64)] {
        &self.requests
    }
}
