use crate::core::hat::{CandidatePool, NoEligibleCandidate};
use crate::core::registry::Registry;
use crate::domain::model::{Assignment, DrawOutcome, Participant};
use crate::utils::error::{DrawError, Result};
use rand::Rng;

/// Lifecycle of a single drawing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Ready,
    InProgress,
    Completed,
    Aborted,
}

/// How one attempt ended. Aborting is expected and is retried by
/// `run_until_completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Completed(Assignment),
    Aborted(NoEligibleCandidate),
}

/// Draw-and-retry engine: each attempt walks the participants in roster order,
/// drawing each recipient from a fresh hat, and starts over from scratch when
/// someone is left without an eligible name.
pub struct DrawingEngine<R: Rng> {
    participants: Vec<Participant>,
    rng: R,
    max_attempts: Option<u64>,
    attempts: u64,
    failures: u64,
    state: AttemptState,
}

impl<R: Rng> DrawingEngine<R> {
    pub fn new(registry: Registry, rng: R) -> Self {
        Self {
            participants: registry.into_participants(),
            rng,
            max_attempts: None,
            attempts: 0,
            failures: 0,
            state: AttemptState::Ready,
        }
    }

    /// Caps the number of attempts `run_until_completed` makes before giving
    /// up with `DrawError::Infeasible`.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Runs exactly one attempt. Only invariant violations are errors; an
    /// exhausted hat is reported as `AttemptOutcome::Aborted` with every
    /// assignment of the attempt rolled back.
    pub fn run_attempt(&mut self) -> Result<AttemptOutcome> {
        self.reset();
        let mut pool = CandidatePool::new(&self.participants);
        self.attempts += 1;
        self.state = AttemptState::InProgress;

        for index in 0..self.participants.len() {
            let participant = &self.participants[index];
            match pool.select(participant, &mut self.rng) {
                Ok(recipient) => {
                    pool.remove(&recipient)?;
                    self.participants[index].giving_to = Some(recipient);
                }
                Err(no_candidate) => {
                    self.reset();
                    self.state = AttemptState::Aborted;
                    return Ok(AttemptOutcome::Aborted(no_candidate));
                }
            }
        }

        if !pool.is_empty() {
            return Err(DrawError::invariant(format!(
                "{} names left in the hat after everyone drew",
                pool.len()
            )));
        }

        let assignment = Assignment::from_participants(&self.participants)?;
        self.state = AttemptState::Completed;
        Ok(AttemptOutcome::Completed(assignment))
    }

    /// Retries attempts until one completes. Without `with_max_attempts` this
    /// never returns when the exclusions admit no valid drawing.
    pub fn run_until_completed(&mut self) -> Result<DrawOutcome> {
        loop {
            if let Some(max) = self.max_attempts {
                if self.attempts >= max {
                    tracing::warn!("Giving up after {} attempts", self.attempts);
                    return Err(DrawError::Infeasible {
                        attempts: self.attempts,
                        failures: self.failures,
                    });
                }
            }

            match self.run_attempt()? {
                AttemptOutcome::Completed(assignment) => {
                    tracing::info!(
                        "Drawing completed on attempt {} ({} failed)",
                        self.attempts,
                        self.failures
                    );
                    return Ok(DrawOutcome {
                        assignment,
                        failures: self.failures,
                        attempts: self.attempts,
                    });
                }
                AttemptOutcome::Aborted(reason) => {
                    self.failures += 1;
                    tracing::debug!("Attempt {} aborted: {}", self.attempts, reason);
                }
            }
        }
    }

    fn reset(&mut self) {
        for participant in &mut self.participants {
            participant.giving_to = None;
        }
        self.state = AttemptState::Ready;
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}
