//! Persisted goal store

use crate::core::goal::{Contribution, ContributionDraft, Goal, GoalDraft};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Key under which the whole store state is persisted.
pub const STORAGE_KEY: &str = "goal-storage";

/// Durable key-value slot the store persists into.
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Goal not found: {0}")]
    GoalNotFound(String),
    #[error("Storage backend error: {0:#}")]
    Backend(anyhow::Error),
    #[error("Stored goal data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    goals: Vec<Goal>,
}

/// Owns the goal collection. Goals are only created and appended to; every mutation
/// writes the full state back to the backend.
pub struct GoalStore {
    state: StoreState,
    backend: Box<dyn KeyValueBackend>,
    last_persist_error: Option<String>,
}

impl GoalStore {
    /// Rehydrates the store from `backend`, starting empty if nothing was saved yet.
    pub fn open(backend: Box<dyn KeyValueBackend>) -> Result<Self, StoreError> {
        let state = match backend.get(STORAGE_KEY).map_err(StoreError::Backend)? {
            Some(bytes) => {
                let state: StoreState = serde_json::from_slice(&bytes)?;
                debug!("Loaded {} goals from storage", state.goals.len());
                state
            }
            None => {
                debug!("No stored goals found, starting empty");
                StoreState::default()
            }
        };

        Ok(Self {
            state,
            backend,
            last_persist_error: None,
        })
    }

    pub fn list_goals(&self) -> &[Goal] {
        &self.state.goals
    }

    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.state.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn create_goal(&mut self, draft: GoalDraft) -> Goal {
        let id = fresh_id(|candidate| self.state.goals.iter().any(|g| g.id == candidate));
        let goal = Goal {
            id,
            name: draft.name,
            total_amount: draft.total_amount,
            currency: draft.currency,
            contributions: Vec::new(),
        };
        debug!(goal_id = %goal.id, "Created goal");

        self.state.goals.push(goal.clone());
        self.persist();
        goal
    }

    pub fn add_contribution(
        &mut self,
        goal_id: &str,
        draft: ContributionDraft,
    ) -> Result<Contribution, StoreError> {
        let goal = self
            .state
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| StoreError::GoalNotFound(goal_id.to_string()))?;

        let id = fresh_id(|candidate| goal.contributions.iter().any(|c| c.id == candidate));
        let contribution = Contribution {
            id,
            amount: draft.amount,
            date: draft.date,
        };
        debug!(goal_id, contribution_id = %contribution.id, "Added contribution");

        goal.contributions.push(contribution.clone());
        self.persist();
        Ok(contribution)
    }

    /// Message of the most recent failed write, cleared by the next successful one.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    // In-memory state stays authoritative when the write fails.
    fn persist(&mut self) {
        let result = serde_json::to_vec(&self.state)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| self.backend.put(STORAGE_KEY, &bytes));

        match result {
            Ok(()) => {
                debug!("Persisted {} goals", self.state.goals.len());
                self.last_persist_error = None;
            }
            Err(e) => {
                warn!("Failed to persist goals: {e:#}");
                self.last_persist_error = Some(format!("{e:#}"));
            }
        }
    }
}

fn fresh_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::{convert, progress, saved_amount};
    use crate::core::goal::Currency;
    use crate::store::memory::MemoryBackend;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_store(backend: &MemoryBackend) -> GoalStore {
        GoalStore::open(Box::new(backend.clone())).unwrap()
    }

    struct FlakyBackend {
        inner: MemoryBackend,
        failing: Arc<AtomicBool>,
    }

    impl KeyValueBackend for FlakyBackend {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &[u8]) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(anyhow!("quota exceeded"));
            }
            self.inner.put(key, value)
        }
    }

    #[test]
    fn test_open_empty_backend() {
        let store = open_store(&MemoryBackend::new());
        assert!(store.list_goals().is_empty());
        assert!(store.last_persist_error().is_none());
    }

    #[test]
    fn test_create_goal_assigns_fresh_id_and_no_contributions() {
        let mut store = open_store(&MemoryBackend::new());

        let mut ids = HashSet::new();
        for i in 0..20 {
            let goal = store.create_goal(GoalDraft::new(format!("Goal {i}"), 100.0, Currency::Inr));
            assert!(goal.contributions.is_empty());
            assert!(ids.insert(goal.id.clone()), "duplicate id {}", goal.id);
        }

        let names: Vec<_> = store.list_goals().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names.len(), 20);
        assert_eq!(names[0], "Goal 0");
        assert_eq!(names[19], "Goal 19");
    }

    #[test]
    fn test_add_contribution_only_touches_target_goal() {
        let mut store = open_store(&MemoryBackend::new());
        let house = store.create_goal(GoalDraft::new("House", 5_000_000.0, Currency::Inr));
        let car = store.create_goal(GoalDraft::new("Car", 20_000.0, Currency::Usd));

        let first = store
            .add_contribution(&car.id, ContributionDraft::new(500.0, date(2024, 3, 1)))
            .unwrap();
        let second = store
            .add_contribution(&car.id, ContributionDraft::new(250.0, date(2024, 1, 1)))
            .unwrap();
        assert_ne!(first.id, second.id);

        assert_eq!(store.goal(&house.id).unwrap(), &house);
        let car = store.goal(&car.id).unwrap();
        // Insertion order, not date order.
        assert_eq!(car.contributions, vec![first, second]);
    }

    #[test]
    fn test_add_contribution_unknown_goal() {
        let mut store = open_store(&MemoryBackend::new());
        let goal = store.create_goal(GoalDraft::new("Trip", 1000.0, Currency::Usd));
        store
            .add_contribution(&goal.id, ContributionDraft::new(10.0, date(2024, 1, 1)))
            .unwrap();
        let before = store.list_goals().to_vec();

        let err = store
            .add_contribution("missing", ContributionDraft::new(10.0, date(2024, 1, 2)))
            .unwrap_err();
        assert!(matches!(err, StoreError::GoalNotFound(ref id) if id == "missing"));
        assert_eq!(err.to_string(), "Goal not found: missing");
        assert_eq!(store.list_goals(), before.as_slice());
    }

    #[test]
    fn test_reopen_restores_goals() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend);
        let goal = store.create_goal(GoalDraft::new("Emergency fund", 300_000.0, Currency::Inr));
        store
            .add_contribution(&goal.id, ContributionDraft::new(25_000.5, date(2024, 5, 10)))
            .unwrap();
        store.create_goal(GoalDraft::new("Laptop", 2_000.0, Currency::Usd));
        let before = store.list_goals().to_vec();
        drop(store);

        let reopened = open_store(&backend);
        assert_eq!(reopened.list_goals(), before.as_slice());
    }

    #[test]
    fn test_reopen_keeps_amounts_bit_for_bit() {
        let amounts = [
            402244.95852449187,
            904890.0886889999,
            0.1 + 0.2,
            1.0 / 3.0,
            123456789.12345679,
            f64::MIN_POSITIVE,
        ];
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend);
        let goal = store.create_goal(GoalDraft::new("Imported", 1234567.8901234567, Currency::Inr));
        for amount in amounts {
            store
                .add_contribution(&goal.id, ContributionDraft::new(amount, date(2024, 1, 1)))
                .unwrap();
        }
        drop(store);

        let reopened = open_store(&backend);
        let goal = reopened.goal(&goal.id).unwrap();
        assert_eq!(goal.total_amount.to_bits(), 1234567.8901234567f64.to_bits());
        let stored: Vec<u64> = goal.contributions.iter().map(|c| c.amount.to_bits()).collect();
        let expected: Vec<u64> = amounts.iter().map(|a| a.to_bits()).collect();
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_open_rejects_corrupt_blob() {
        let backend = MemoryBackend::new();
        backend.put(STORAGE_KEY, b"{not json").unwrap();

        let result = GoalStore::open(Box::new(backend));
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let failing = Arc::new(AtomicBool::new(true));
        let inner = MemoryBackend::new();
        let mut store = GoalStore::open(Box::new(FlakyBackend {
            inner: inner.clone(),
            failing: Arc::clone(&failing),
        }))
        .unwrap();

        let goal = store.create_goal(GoalDraft::new("Trip", 1000.0, Currency::Usd));
        assert_eq!(store.list_goals().len(), 1);
        assert!(store.last_persist_error().unwrap().contains("quota exceeded"));
        assert!(inner.get(STORAGE_KEY).unwrap().is_none());

        failing.store(false, Ordering::SeqCst);
        store
            .add_contribution(&goal.id, ContributionDraft::new(5.0, date(2024, 1, 1)))
            .unwrap();
        assert!(store.last_persist_error().is_none());

        let reopened = open_store(&inner);
        assert_eq!(reopened.list_goals(), store.list_goals());
    }

    #[test]
    fn test_trip_scenario() {
        let mut store = open_store(&MemoryBackend::new());
        let trip = store.create_goal(GoalDraft::new("Trip", 1000.0, Currency::Usd));
        store
            .add_contribution(&trip.id, ContributionDraft::new(200.0, date(2024, 1, 1)))
            .unwrap();
        store
            .add_contribution(&trip.id, ContributionDraft::new(300.0, date(2024, 2, 1)))
            .unwrap();

        let trip = store.goal(&trip.id).unwrap();
        assert_eq!(saved_amount(trip), 500.0);
        assert_eq!(progress(trip), 50.0);
        assert_eq!(
            convert(trip.total_amount, Currency::Usd, Currency::Inr, 80.0),
            80000.0
        );
    }
}
