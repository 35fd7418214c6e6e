//! Pure polling state machine.
//!
//! `PollState::apply` takes one event and returns the effects the driver
//! must run. It never touches the network or the clock, so every transition
//! can be exercised synchronously.

use tracing::debug;

use crate::models::JobStatus;

pub type JobId = i64;

/// Anything the poller can track to completion.
pub trait JobDetail {
    fn status(&self) -> JobStatus;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// No target
    Idle,
    /// Fetching on the interval
    Polling,
    /// Target reached a terminal status, or a fetch failed
    Terminal,
}

/// Identifies one fetch so its response can be matched to the state that
/// asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub target: JobId,
    pub generation: u64,
    pub request: u64,
}

#[derive(Debug, Clone)]
pub enum PollEvent<T> {
    SetTarget(Option<JobId>),
    /// The interval elapsed
    Tick,
    /// On-demand fetch outside the interval
    Refetch,
    FetchSucceeded { ticket: FetchTicket, detail: T },
    FetchFailed { ticket: FetchTicket, error: String },
    CancelRequested,
    CancelSucceeded { generation: u64 },
    CancelFailed { generation: u64, error: String },
}

/// Work the driver performs on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchTicket),
    /// Call the job's cancel endpoint
    Cancel { target: JobId, generation: u64 },
    /// (Re)start the interval; the next tick is one period away
    StartInterval,
    StopInterval,
    /// Drop fetches issued for a previous target
    AbortInFlight,
}

/// Observable state of one poll instance.
#[derive(Debug, Clone)]
pub struct PollState<T> {
    pub target: Option<JobId>,
    pub phase: PollPhase,
    pub detail: Option<T>,
    pub error: Option<String>,
    generation: u64,
    next_request: u64,
    last_applied: u64,
    /// Request id of the interval fetch still running, if any
    interval_in_flight: Option<u64>,
}

impl<T> Default for PollState<T> {
    fn default() -> Self {
        Self {
            target: None,
            phase: PollPhase::Idle,
            detail: None,
            error: None,
            generation: 0,
            next_request: 0,
            last_applied: 0,
            interval_in_flight: None,
        }
    }
}

impl<T: JobDetail> PollState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Status of the last fetched detail.
    pub fn status(&self) -> Option<JobStatus> {
        self.detail.as_ref().map(JobDetail::status)
    }

    fn ticket(&mut self, target: JobId) -> FetchTicket {
        self.next_request += 1;
        FetchTicket {
            target,
            generation: self.generation,
            request: self.next_request,
        }
    }

    /// Whether a response belongs to the current target and is newer than
    /// what has already been applied.
    fn accept(&mut self, ticket: &FetchTicket) -> bool {
        if self.interval_in_flight == Some(ticket.request) {
            self.interval_in_flight = None;
        }

        if ticket.generation != self.generation {
            debug!(target_id = ticket.target, "Dropping response for previous target");
            return false;
        }
        if ticket.request < self.last_applied {
            debug!(request = ticket.request, "Dropping out-of-order response");
            return false;
        }

        self.last_applied = ticket.request;
        true
    }

    pub fn apply(&mut self, event: PollEvent<T>) -> Vec<Effect> {
        match event {
            PollEvent::SetTarget(Some(id)) => {
                self.generation += 1;
                self.target = Some(id);
                self.phase = PollPhase::Polling;
                self.detail = None;
                self.error = None;
                self.interval_in_flight = None;

                let ticket = self.ticket(id);
                self.interval_in_flight = Some(ticket.request);
                vec![Effect::AbortInFlight, Effect::Fetch(ticket), Effect::StartInterval]
            }

            PollEvent::SetTarget(None) => {
                self.generation += 1;
                self.target = None;
                self.phase = PollPhase::Idle;
                self.detail = None;
                self.error = None;
                self.interval_in_flight = None;
                vec![Effect::AbortInFlight, Effect::StopInterval]
            }

            PollEvent::Tick => match self.target {
                Some(id) if self.phase == PollPhase::Polling && self.interval_in_flight.is_none() => {
                    let ticket = self.ticket(id);
                    self.interval_in_flight = Some(ticket.request);
                    vec![Effect::Fetch(ticket)]
                }
                _ => Vec::new(),
            },

            PollEvent::Refetch => match self.target {
                Some(id) => vec![Effect::Fetch(self.ticket(id))],
                None => Vec::new(),
            },

            PollEvent::FetchSucceeded { ticket, detail } => {
                if !self.accept(&ticket) {
                    return Vec::new();
                }

                let terminal = detail.status().is_terminal();
                self.detail = Some(detail);
                self.error = None;

                match (self.phase, terminal) {
                    (PollPhase::Polling, true) => {
                        self.phase = PollPhase::Terminal;
                        vec![Effect::StopInterval]
                    }
                    // A manual refetch after a failed fetch found the job still running
                    (PollPhase::Terminal, false) => {
                        self.phase = PollPhase::Polling;
                        vec![Effect::StartInterval]
                    }
                    _ => Vec::new(),
                }
            }

            PollEvent::FetchFailed { ticket, error } => {
                if !self.accept(&ticket) {
                    return Vec::new();
                }

                self.error = Some(error);
                if self.phase == PollPhase::Polling {
                    self.phase = PollPhase::Terminal;
                    vec![Effect::StopInterval]
                } else {
                    Vec::new()
                }
            }

            PollEvent::CancelRequested => match self.target {
                Some(target) => vec![Effect::Cancel {
                    target,
                    generation: self.generation,
                }],
                None => Vec::new(),
            },

            PollEvent::CancelSucceeded { generation } => match self.target {
                Some(id) if generation == self.generation => vec![Effect::Fetch(self.ticket(id))],
                _ => Vec::new(),
            },

            PollEvent::CancelFailed { generation, error } => {
                if generation == self.generation {
                    self.error = Some(format!("Cancel failed: {}", error));
                }
                Vec::new()
            }
        }
    }
}
