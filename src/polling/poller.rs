//! Tokio driver for the polling state machine.
//!
//! One task owns the [`PollState`], the interval and every in-flight
//! request. Commands arrive over a channel and each new state is published
//! on a `watch` channel. Dropping the [`PollerHandle`] (or calling
//! [`PollerHandle::shutdown`]) stops the loop; that is separate from
//! cancelling the backend job itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::source::JobSource;
use super::state::{Effect, JobId, PollEvent, PollState};

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug)]
enum Command {
    SetTarget(Option<JobId>),
    Refetch,
    Cancel,
}

/// Control side of a running poller.
pub struct PollerHandle<T> {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<PollState<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone> PollerHandle<T> {
    /// Track a new job, or stop tracking with `None`.
    pub fn set_target(&self, id: Option<JobId>) {
        let _ = self.commands.send(Command::SetTarget(id));
    }

    /// Fetch now without touching the interval schedule.
    pub fn refetch(&self) {
        let _ = self.commands.send(Command::Refetch);
    }

    /// Cancel the backend job, then fetch its status straight away.
    pub fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel);
    }

    /// Latest published state.
    pub fn current(&self) -> PollState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState<T>> {
        self.state.clone()
    }

    /// Stop polling and wait for the task to finish.
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.task.await;
    }
}

/// Spawns poll loops for one kind of job.
pub struct Poller<S: JobSource> {
    source: Arc<S>,
    period: Duration,
}

impl<S: JobSource> Poller<S> {
    /// A zero `period` is raised to one millisecond.
    pub fn new(source: S, period: Duration) -> Self {
        Self {
            source: Arc::new(source),
            period: period.max(MIN_PERIOD),
        }
    }

    /// Start the poll loop in the background, idle until a target is set.
    pub fn spawn(&self) -> PollerHandle<S::Detail> {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PollState::new());

        let task = tokio::spawn(run_loop(
            self.source.clone(),
            self.period,
            commands_rx,
            state_tx,
        ));

        PollerHandle {
            commands: commands_tx,
            state: state_rx,
            task,
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn run_loop<S: JobSource>(
    source: Arc<S>,
    period: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<PollState<S::Detail>>,
) {
    let mut state: PollState<S::Detail> = PollState::new();
    let mut ticker: Option<Interval> = None;
    let mut fetches: JoinSet<PollEvent<S::Detail>> = JoinSet::new();
    let mut actions: JoinSet<PollEvent<S::Detail>> = JoinSet::new();

    loop {
        let event = tokio::select! {
            command = commands.recv() => match command {
                Some(Command::SetTarget(id)) => PollEvent::SetTarget(id),
                Some(Command::Refetch) => PollEvent::Refetch,
                Some(Command::Cancel) => PollEvent::CancelRequested,
                None => break,
            },
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => match joined {
                Ok(event) => event,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => {
                    warn!(error = %e, "Poll fetch task failed");
                    continue;
                }
            },
            Some(joined) = actions.join_next(), if !actions.is_empty() => match joined {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Cancel task failed");
                    continue;
                }
            },
            _ = next_tick(&mut ticker) => PollEvent::Tick,
        };

        for effect in state.apply(event) {
            match effect {
                Effect::Fetch(ticket) => {
                    debug!(target_id = ticket.target, request = ticket.request, "Fetching job status");
                    let source = source.clone();
                    fetches.spawn(async move {
                        match source.fetch(ticket.target).await {
                            Ok(detail) => PollEvent::FetchSucceeded { ticket, detail },
                            Err(e) => PollEvent::FetchFailed {
                                ticket,
                                error: format!("{:#}", e),
                            },
                        }
                    });
                }
                Effect::Cancel { target, generation } => {
                    info!(target_id = target, "Cancelling job");
                    let source = source.clone();
                    actions.spawn(async move {
                        match source.cancel(target).await {
                            Ok(()) => PollEvent::CancelSucceeded { generation },
                            Err(e) => PollEvent::CancelFailed {
                                generation,
                                error: format!("{:#}", e),
                            },
                        }
                    });
                }
                Effect::StartInterval => {
                    let mut interval = interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    ticker = Some(interval);
                }
                Effect::StopInterval => {
                    if ticker.take().is_some() {
                        debug!(target_id = ?state.target, status = ?state.status(), "Polling stopped");
                    }
                }
                Effect::AbortInFlight => {
                    fetches.abort_all();
                }
            }
        }

        state_tx.send_replace(state.clone());
    }

    debug!("Poll loop shut down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use crate::models::JobStatus;
    use crate::polling::state::{JobDetail, PollPhase};

    #[derive(Debug, Clone)]
    struct FakeJob {
        id: JobId,
        status: JobStatus,
    }

    impl JobDetail for FakeJob {
        fn status(&self) -> JobStatus {
            self.status
        }
    }

    /// Replays scripted responses; keeps returning `Running` once empty.
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<JobStatus, String>>>,
        fetches: Arc<AtomicUsize>,
        cancels: Arc<AtomicUsize>,
        cancel_fails: bool,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<JobStatus, String>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fetches: Arc::new(AtomicUsize::new(0)),
                cancels: Arc::new(AtomicUsize::new(0)),
                cancel_fails: false,
            }
        }
    }

    #[async_trait]
    impl JobSource for ScriptedSource {
        type Detail = FakeJob;

        async fn fetch(&self, id: JobId) -> Result<FakeJob> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(JobStatus::Running));

            next.map(|status| FakeJob { id, status }).map_err(|e| anyhow!(e))
        }

        async fn cancel(&self, _id: JobId) -> Result<()> {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            if self.cancel_fails {
                return Err(anyhow!("cancel rejected"));
            }
            self.script.lock().unwrap().push_front(Ok(JobStatus::Cancelled));
            Ok(())
        }
    }

    const PERIOD: Duration = Duration::from_millis(2000);

    async fn settle(periods: u32) {
        tokio::time::sleep(PERIOD * periods + Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_on_first_fetch_fetches_once() {
        let source = ScriptedSource::new(vec![Ok(JobStatus::Completed)]);
        let fetches = source.fetches.clone();
        let handle = Poller::new(source, PERIOD).spawn();

        handle.set_target(Some(1));
        settle(5).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        let state = handle.current();
        assert_eq!(state.phase, PollPhase::Terminal);
        assert_eq!(state.status(), Some(JobStatus::Completed));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_interval_until_terminal() {
        let source = ScriptedSource::new(vec![
            Ok(JobStatus::Pending),
            Ok(JobStatus::Running),
            Ok(JobStatus::Completed),
        ]);
        let fetches = source.fetches.clone();
        let handle = Poller::new(source, PERIOD).spawn();

        handle.set_target(Some(9));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        settle(6).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
        assert_eq!(handle.current().phase, PollPhase::Terminal);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_stops_without_retry() {
        let source = ScriptedSource::new(vec![
            Ok(JobStatus::Running),
            Err("502 Bad Gateway".to_string()),
        ]);
        let fetches = source.fetches.clone();
        let handle = Poller::new(source, PERIOD).spawn();

        handle.set_target(Some(2));
        settle(6).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        let state = handle.current();
        assert_eq!(state.phase, PollPhase::Terminal);
        assert!(state.error.as_deref().unwrap().contains("502"));
        assert_eq!(state.status(), Some(JobStatus::Running));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_refetches_immediately() {
        let source = ScriptedSource::new(vec![Ok(JobStatus::Running)]);
        let fetches = source.fetches.clone();
        let cancels = source.cancels.clone();
        let handle = Poller::new(source, Duration::from_secs(60)).spawn();

        handle.set_target(Some(4));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        let state = handle.current();
        assert_eq!(state.status(), Some(JobStatus::Cancelled));
        assert_eq!(state.phase, PollPhase::Terminal);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_failure_keeps_polling() {
        let mut source = ScriptedSource::new(vec![]);
        source.cancel_fails = true;
        let handle = Poller::new(source, PERIOD).spawn();

        handle.set_target(Some(4));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let state = handle.current();
        assert_eq!(state.phase, PollPhase::Polling);
        assert!(state.error.as_deref().unwrap().contains("cancel rejected"));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_retarget_and_clear() {
        let source = ScriptedSource::new(vec![]);
        let fetches = source.fetches.clone();
        let handle = Poller::new(source, PERIOD).spawn();

        handle.set_target(Some(1));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.set_target(Some(2));
        tokio::time::sleep(Duration::from_millis(10)).await;

        let state = handle.current();
        assert_eq!(state.target, Some(2));
        assert_eq!(state.detail.as_ref().map(|d| d.id), Some(2));

        handle.set_target(None);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let before = fetches.load(Ordering::SeqCst);
        settle(5).await;

        assert_eq!(fetches.load(Ordering::SeqCst), before);
        assert_eq!(handle.current().phase, PollPhase::Idle);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_keeps_polling() {
        let source = ScriptedSource::new(vec![]);
        let fetches = source.fetches.clone();
        let handle = Poller::new(source, Duration::ZERO).spawn();

        handle.set_target(Some(3));
        tokio::time::sleep(Duration::from_millis(10)).await;

        let state = handle.current();
        assert_eq!(state.phase, PollPhase::Polling);
        assert_eq!(state.target, Some(3));
        assert!(fetches.load(Ordering::SeqCst) >= 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_refetch_outside_interval() {
        let source = ScriptedSource::new(vec![Ok(JobStatus::Completed), Ok(JobStatus::Completed)]);
        let fetches = source.fetches.clone();
        let handle = Poller::new(source, PERIOD).spawn();

        handle.set_target(Some(5));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.refetch();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(handle.current().phase, PollPhase::Terminal);

        handle.shutdown().await;
    }
}
