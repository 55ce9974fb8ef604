use crate::domain::model::Participant;
use crate::utils::error::{DrawError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use thiserror::Error;

/// Nobody left in the hat that `participant` may give to. The current attempt
/// cannot complete and has to be redrawn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no eligible recipient left for '{participant}'")]
pub struct NoEligibleCandidate {
    pub participant: String,
}

/// Names still available to be drawn in the current attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    contents: BTreeSet<String>,
}

impl CandidatePool {
    pub fn new(participants: &[Participant]) -> Self {
        Self {
            contents: participants.iter().map(|p| p.name.clone()).collect(),
        }
    }

    /// Draws uniformly from the pool minus the participant's exclusions.
    /// Leaves the pool untouched; the caller removes the returned name.
    pub fn select<R: Rng + ?Sized>(
        &self,
        participant: &Participant,
        rng: &mut R,
    ) -> std::result::Result<String, NoEligibleCandidate> {
        let eligible: Vec<&String> = self
            .contents
            .iter()
            .filter(|name| !participant.excludes(name))
            .collect();

        eligible
            .choose(rng)
            .map(|name| (*name).clone())
            .ok_or_else(|| NoEligibleCandidate {
                participant: participant.name.clone(),
            })
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.contents.remove(name) {
            Ok(())
        } else {
            Err(DrawError::invariant(format!(
                "'{}' was removed from the hat but is not in it",
                name
            )))
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contents.contains(name)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
