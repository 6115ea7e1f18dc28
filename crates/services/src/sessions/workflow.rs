use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use quiz_core::Clock;
use quiz_core::model::Quiz;

use super::plan::QuizPlan;
use super::service::{QuizPhase, QuizSession, QuizSignal};
use super::view::QuizSnapshot;
use crate::error::{RunnerError, SessionError};

/// A state change published by a running quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizUpdate {
    pub snapshot: QuizSnapshot,
    pub signal: Option<QuizSignal>,
}

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

enum Command {
    Select {
        index: usize,
        reply: Reply<Option<QuizSignal>>,
    },
    Submit {
        reply: Reply<QuizSignal>,
    },
    Advance {
        reply: Reply<Option<QuizSignal>>,
    },
    Retry {
        reply: Reply<()>,
    },
    Shutdown,
}

/// Drives a `QuizSession` from a periodic tick and host commands.
///
/// The session is moved into a single tokio task that is the only place it is
/// mutated. Commands and ticks are serialized through one `select!` loop that
/// always drains a ready command before a ready tick, so an answer queued for
/// the same instant as the final tick counts as an answer, not a timeout.
#[derive(Debug, Clone)]
pub struct QuizRunner {
    clock: Clock,
    tick_period: Duration,
    shuffle: bool,
}

impl QuizRunner {
    pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            tick_period: Self::DEFAULT_TICK_PERIOD,
            shuffle: false,
        }
    }

    /// Interval between countdown ticks. Zero is raised to one millisecond.
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period.max(Duration::from_millis(1));
        self
    }

    /// Shuffle the question order of the first attempt.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Create a session for `quiz` and start running it.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the quiz has no questions.
    pub fn start(
        &self,
        quiz: Arc<Quiz>,
    ) -> Result<(QuizHandle, mpsc::UnboundedReceiver<QuizUpdate>), SessionError> {
        let plan = QuizPlan::build(quiz.len(), self.shuffle);
        let session = QuizSession::with_plan(quiz, self.clock, plan)?;
        Ok(self.spawn(session))
    }

    /// Run an existing session.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(&self, session: QuizSession) -> (QuizHandle, mpsc::UnboundedReceiver<QuizUpdate>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let ticker = (session.phase() == QuizPhase::Presenting).then(|| new_ticker(self.tick_period));
        let publisher = Publisher {
            updates: updates_tx,
            snapshot: snapshot_tx,
        };
        let task = tokio::spawn(run_loop(
            session,
            commands_rx,
            publisher,
            ticker,
            self.tick_period,
        ));

        let handle = QuizHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
            task,
        };
        (handle, updates_rx)
    }
}

/// Host-side handle to a running quiz.
///
/// Dropping the handle closes the command queue; the runner then stops and
/// its tick source is cancelled with it.
#[derive(Debug)]
pub struct QuizHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<QuizSnapshot>,
    task: JoinHandle<QuizSession>,
}

impl QuizHandle {
    /// # Errors
    ///
    /// Returns `RunnerError::Session` if the engine rejects the selection and
    /// `RunnerError::Stopped` if the runner is gone.
    pub async fn select(&self, index: usize) -> Result<Option<QuizSignal>, RunnerError> {
        self.request(|reply| Command::Select { index, reply }).await
    }

    /// # Errors
    ///
    /// Returns `RunnerError::Session` if there is nothing to submit and
    /// `RunnerError::Stopped` if the runner is gone.
    pub async fn submit(&self) -> Result<QuizSignal, RunnerError> {
        self.request(|reply| Command::Submit { reply }).await
    }

    /// # Errors
    ///
    /// Returns `RunnerError::Session` outside feedback and
    /// `RunnerError::Stopped` if the runner is gone.
    pub async fn advance(&self) -> Result<Option<QuizSignal>, RunnerError> {
        self.request(|reply| Command::Advance { reply }).await
    }

    /// # Errors
    ///
    /// Returns `RunnerError::Session` unless the attempt is complete and
    /// `RunnerError::Stopped` if the runner is gone.
    pub async fn retry(&self) -> Result<(), RunnerError> {
        self.request(|reply| Command::Retry { reply }).await
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.snapshot.borrow().clone()
    }

    /// A receiver that observes every published snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<QuizSnapshot> {
        self.snapshot.clone()
    }

    /// Stop the runner, cancel its tick source and hand back the session.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Join` if the runner task panicked.
    pub async fn shutdown(self) -> Result<QuizSession, RunnerError> {
        // A closed queue means the loop already exited; the join below still
        // yields the session.
        let _ = self.commands.send(Command::Shutdown);
        Ok(self.task.await?)
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T, RunnerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .map_err(|_| RunnerError::Stopped)?;
        let result = response.await.map_err(|_| RunnerError::Stopped)?;
        Ok(result?)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Select { index, .. } => write!(f, "Select({index})"),
            Command::Submit { .. } => f.write_str("Submit"),
            Command::Advance { .. } => f.write_str("Advance"),
            Command::Retry { .. } => f.write_str("Retry"),
            Command::Shutdown => f.write_str("Shutdown"),
        }
    }
}

struct Publisher {
    updates: mpsc::UnboundedSender<QuizUpdate>,
    snapshot: watch::Sender<QuizSnapshot>,
}

impl Publisher {
    fn publish(&self, session: &QuizSession, signal: Option<QuizSignal>) {
        let snapshot = session.snapshot();
        self.snapshot.send_replace(snapshot.clone());
        // Nobody listening for updates is fine; the watch channel still has the state.
        let _ = self.updates.send(QuizUpdate { snapshot, signal });
    }
}

fn respond<T>(reply: Reply<T>, result: Result<T, SessionError>) {
    if let Err(err) = &result {
        warn!("quiz command rejected: {err}");
    }
    if reply.send(result).is_err() {
        debug!("quiz command requester went away before the reply");
    }
}

fn new_ticker(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn run_loop(
    mut session: QuizSession,
    mut commands: mpsc::UnboundedReceiver<Command>,
    publisher: Publisher,
    mut ticker: Option<Interval>,
    period: Duration,
) -> QuizSession {
    debug!(attempt_id = %session.attempt_id(), ?period, "quiz runner started");

    loop {
        tokio::select! {
            biased;

            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("all quiz handles dropped");
                    break;
                };
                match command {
                    Command::Shutdown => break,
                    Command::Select { index, reply } => {
                        let result = session.select_answer(index);
                        if let Ok(signal) = &result {
                            publisher.publish(&session, signal.clone());
                        }
                        respond(reply, result);
                    }
                    Command::Submit { reply } => {
                        let result = session.submit();
                        if let Ok(signal) = &result {
                            publisher.publish(&session, Some(signal.clone()));
                        }
                        respond(reply, result);
                    }
                    Command::Advance { reply } => {
                        let result = session.advance();
                        if let Ok(signal) = &result {
                            publisher.publish(&session, signal.clone());
                        }
                        respond(reply, result);
                    }
                    Command::Retry { reply } => {
                        let result = session.retry();
                        if result.is_ok() {
                            publisher.publish(&session, None);
                        }
                        respond(reply, result);
                    }
                }
            }

            () = next_tick(&mut ticker) => {
                match session.tick() {
                    Ok(signal) => publisher.publish(&session, signal),
                    Err(err) => warn!("quiz tick failed: {err}"),
                }
            }
        }

        sync_ticker(&mut ticker, &session, period);
    }

    debug!(attempt_id = %session.attempt_id(), "quiz runner stopped");
    session
}

/// The tick source exists only while a question is being presented.
fn sync_ticker(ticker: &mut Option<Interval>, session: &QuizSession, period: Duration) {
    let presenting = session.phase() == QuizPhase::Presenting;
    match (presenting, ticker.is_some()) {
        (true, false) => *ticker = Some(new_ticker(period)),
        (false, true) => {
            *ticker = None;
            debug!(phase = %session.phase(), "tick source cancelled");
        }
        _ => {}
    }
}
