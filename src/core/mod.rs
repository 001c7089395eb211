//! Core business logic: goals, currency math and the persisted store

pub mod analytics;
pub mod config;
pub mod currency;
pub mod goal;
pub mod log;
pub mod store;

// Re-export main types for cleaner imports
pub use currency::{ExchangeRate, ExchangeRateProvider, RateStatus};
pub use goal::{Contribution, ContributionDraft, Currency, Goal, GoalDraft};
pub use store::{GoalStore, KeyValueBackend, StoreError};
