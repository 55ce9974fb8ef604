use crate::domain::model::{History, HistoryRecord, Participant};
use crate::utils::error::{DrawError, Result};
use std::collections::HashMap;

/// Participants in roster order with their exclusion sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    participants: Vec<Participant>,
}

impl Registry {
    /// Builds one participant per roster entry, each with its own copy of its
    /// static exclusions.
    pub fn build(roster: Vec<String>, static_exclusions: &HashMap<String, Vec<String>>) -> Result<Self> {
        let mut participants: Vec<Participant> = Vec::with_capacity(roster.len());

        for name in roster {
            if participants.iter().any(|p| p.name == name) {
                return Err(DrawError::config(format!(
                    "participant '{}' appears more than once in the roster",
                    name
                )));
            }

            let exclusions = static_exclusions.get(&name).ok_or_else(|| {
                DrawError::config(format!("participant '{}' has no exclusion data", name))
            })?;

            participants.push(Participant::new(name, exclusions.iter().cloned()));
        }

        for excluded in static_exclusions.keys() {
            if !participants.iter().any(|p| &p.name == excluded) {
                tracing::warn!("Exclusions given for '{}', who is not in the roster", excluded);
            }
        }

        tracing::debug!("Registry built with {} participants", participants.len());
        Ok(Self { participants })
    }

    /// Adds each past recipient of `name` to their exclusion set.
    pub fn merge_history(&mut self, name: &str, records: &[HistoryRecord]) -> Result<()> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                DrawError::config(format!("history references unknown participant '{}'", name))
            })?;

        for record in records {
            if participant.exclusions.insert(record.recipient.clone()) {
                tracing::debug!(
                    "{} gave to {} in {}, excluding",
                    participant.name,
                    record.recipient,
                    record.year
                );
            }
        }
        Ok(())
    }

    /// Merges every giver's history. Validates all givers before touching any
    /// exclusion set.
    pub fn merge_all_history(&mut self, history: &History) -> Result<()> {
        if let Some(unknown) = history.givers().find(|giver| self.get(giver).is_none()) {
            return Err(DrawError::config(format!(
                "history references unknown participant '{}'",
                unknown
            )));
        }

        for giver in history.givers() {
            self.merge_history(giver, history.records_for(giver))?;
        }
        Ok(())
    }

    /// Names of participants with no possible recipient in the whole roster.
    /// A drawing can never complete while this is non-empty.
    pub fn unreachable_participants(&self) -> Vec<&str> {
        self.participants
            .iter()
            .filter(|p| self.eligible_count(p) == 0)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// How many roster members `participant` could ever be assigned.
    pub fn eligible_count(&self, participant: &Participant) -> usize {
        self.participants
            .iter()
            .filter(|other| !participant.excludes(&other.name))
            .count()
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn into_participants(self) -> Vec<Participant> {
        self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::HistoryEntry;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn exclusions(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(name, excluded)| {
                (
                    name.to_string(),
                    excluded.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_build_keeps_roster_order_and_self_exclusion() {
        let registry = Registry::build(
            roster(&["Cy", "Ann", "Bob"]),
            &exclusions(&[("Ann", &["Bob"]), ("Bob", &[]), ("Cy", &[])]),
        )
        .unwrap();

        let names: Vec<&str> = registry.participants().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cy", "Ann", "Bob"]);

        let ann = registry.get("Ann").unwrap();
        assert!(ann.excludes("Ann"));
        assert!(ann.excludes("Bob"));
        assert!(!ann.excludes("Cy"));
    }

    #[test]
    fn test_build_copies_exclusions_per_participant() {
        let data = exclusions(&[("Ann", &["Cy"]), ("Bob", &["Cy"]), ("Cy", &[])]);
        let mut registry = Registry::build(roster(&["Ann", "Bob", "Cy"]), &data).unwrap();

        registry
            .merge_history("Ann", &[HistoryRecord { year: 2024, recipient: "Bob".into() }])
            .unwrap();

        assert!(registry.get("Ann").unwrap().excludes("Bob"));
        assert!(!registry.get("Bob").unwrap().excludes("Ann"));
        assert!(!registry.get("Cy").unwrap().excludes("Bob"));
        assert_eq!(data["Ann"], vec!["Cy".to_string()]);
    }

    #[test]
    fn test_build_fails_without_exclusion_data() {
        let result = Registry::build(roster(&["Ann", "Bob"]), &exclusions(&[("Ann", &[])]));
        match result {
            Err(DrawError::ConfigError { message }) => assert!(message.contains("Bob")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_build_fails_on_duplicate_name() {
        let result = Registry::build(roster(&["Ann", "Ann"]), &exclusions(&[("Ann", &[])]));
        assert!(matches!(result, Err(DrawError::ConfigError { .. })));
    }

    #[test]
    fn test_merge_history_is_idempotent() {
        let data = exclusions(&[("Ann", &[]), ("Bob", &[]), ("Cy", &[])]);
        let history = History::from_entries(vec![HistoryEntry {
            year: 2024,
            giver: "Ann".into(),
            recipient: "Bob".into(),
        }]);

        let mut once = Registry::build(roster(&["Ann", "Bob", "Cy"]), &data).unwrap();
        once.merge_all_history(&history).unwrap();

        let mut twice = once.clone();
        twice.merge_all_history(&history).unwrap();

        assert_eq!(once, twice);
        assert!(once.get("Ann").unwrap().excludes("Bob"));
    }

    #[test]
    fn test_merge_history_rejects_unknown_giver_without_partial_merge() {
        let data = exclusions(&[("Ann", &[]), ("Bob", &[])]);
        let history = History::from_entries(vec![
            HistoryEntry { year: 2024, giver: "Ann".into(), recipient: "Bob".into() },
            HistoryEntry { year: 2024, giver: "Zed".into(), recipient: "Ann".into() },
        ]);

        let mut registry = Registry::build(roster(&["Ann", "Bob"]), &data).unwrap();
        let before = registry.clone();
        assert!(matches!(
            registry.merge_all_history(&history),
            Err(DrawError::ConfigError { .. })
        ));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_unreachable_participants() {
        let registry = Registry::build(
            roster(&["Ann", "Bob", "Cy"]),
            &exclusions(&[("Ann", &["Bob", "Cy"]), ("Bob", &[]), ("Cy", &[])]),
        )
        .unwrap();

        assert_eq!(registry.unreachable_participants(), vec!["Ann"]);
        assert_eq!(registry.eligible_count(registry.get("Bob").unwrap()), 2);
    }
}
