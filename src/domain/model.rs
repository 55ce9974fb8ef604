use crate::utils::error::{DrawError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// 參與者：名稱、排除名單與本輪抽到的對象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub exclusions: BTreeSet<String>,
    pub giving_to: Option<String>,
}

impl Participant {
    /// The participant's own name is always part of the exclusion set.
    pub fn new(name: impl Into<String>, exclusions: impl IntoIterator<Item = String>) -> Self {
        let name = name.into();
        let mut exclusions: BTreeSet<String> = exclusions.into_iter().collect();
        exclusions.insert(name.clone());
        Self {
            name,
            exclusions,
            giving_to: None,
        }
    }

    pub fn excludes(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }
}

/// One past drawing for a giver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub year: i32,
    pub recipient: String,
}

/// Flat history row as stored in `history.csv` and inline TOML records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub year: i32,
    pub giver: String,
    pub recipient: String,
}

/// Giver name to past records, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    records: BTreeMap<String, Vec<HistoryRecord>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        let mut history = Self::new();
        history.extend(entries);
        history
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.extend(std::iter::once(entry));
    }

    /// Appends all entries, then sorts each giver's records by year once.
    /// Records from the same year keep their insertion order.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = HistoryEntry>) {
        for entry in entries {
            self.records.entry(entry.giver).or_default().push(HistoryRecord {
                year: entry.year,
                recipient: entry.recipient,
            });
        }
        for records in self.records.values_mut() {
            records.sort_by_key(|record| record.year);
        }
    }

    pub fn records_for(&self, giver: &str) -> &[HistoryRecord] {
        self.records.get(giver).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn givers(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A completed drawing in participant order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pairs: Vec<(String, String)>,
}

impl Assignment {
    /// Collects the final assignment from participants, checking that it is a
    /// valid drawing.
    pub fn from_participants(participants: &[Participant]) -> Result<Self> {
        let pairs = participants
            .iter()
            .map(|p| {
                p.giving_to
                    .clone()
                    .map(|recipient| (p.name.clone(), recipient))
                    .ok_or_else(|| {
                        DrawError::invariant(format!("'{}' has no recipient after drawing", p.name))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let assignment = Self { pairs };
        assignment.verify(participants)?;
        Ok(assignment)
    }

    /// Checks bijection, no self-assignment and no excluded recipient.
    pub fn verify(&self, participants: &[Participant]) -> Result<()> {
        if self.pairs.len() != participants.len() {
            return Err(DrawError::invariant(format!(
                "assignment has {} pairs for {} participants",
                self.pairs.len(),
                participants.len()
            )));
        }

        let names: HashSet<&str> = participants.iter().map(|p| p.name.as_str()).collect();
        let mut givers = HashSet::new();
        let mut recipients = HashSet::new();

        for ((giver, recipient), participant) in self.pairs.iter().zip(participants) {
            if giver != &participant.name {
                return Err(DrawError::invariant(format!(
                    "assignment order differs from participant order at '{}'",
                    giver
                )));
            }
            if giver == recipient {
                return Err(DrawError::invariant(format!("'{}' is giving to themselves", giver)));
            }
            if participant.excludes(recipient) {
                return Err(DrawError::invariant(format!(
                    "'{}' is giving to excluded recipient '{}'",
                    giver, recipient
                )));
            }
            if !names.contains(recipient.as_str()) {
                return Err(DrawError::invariant(format!(
                    "'{}' is giving to unknown recipient '{}'",
                    giver, recipient
                )));
            }
            if !givers.insert(giver.as_str()) || !recipients.insert(recipient.as_str()) {
                return Err(DrawError::invariant(format!(
                    "'{}' or '{}' appears more than once",
                    giver, recipient
                )));
            }
        }

        Ok(())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn recipient_of(&self, giver: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(g, _)| g == giver)
            .map(|(_, r)| r.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Result of `run_until_completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub assignment: Assignment,
    pub failures: u64,
    pub attempts: u64,
}
