//! Credential selection strategies
//!
//! The pool can hold several credentials; which one a request uses is an
//! explicit pluggable strategy rather than hidden module-level state, so
//! tests can rely on the deterministic `First` strategy.

use crate::config::SelectionStrategy;
use crate::resolver::Credential;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Picks one credential from the pool for a single request
pub trait CredentialStrategy: Send + Sync + std::fmt::Debug {
    /// Returns `None` only when the pool is empty
    fn select<'a>(&self, pool: &'a [Credential]) -> Option<&'a Credential>;
}

/// Deterministic strategy: always the first pool entry
#[derive(Debug, Default)]
pub struct FirstAvailable;

impl CredentialStrategy for FirstAvailable {
    fn select<'a>(&self, pool: &'a [Credential]) -> Option<&'a Credential> {
        pool.first()
    }
}

/// Uniformly random pick across the pool
#[derive(Debug, Default)]
pub struct RandomPick;

impl CredentialStrategy for RandomPick {
    fn select<'a>(&self, pool: &'a [Credential]) -> Option<&'a Credential> {
        if pool.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..pool.len());
        pool.get(index)
    }
}

/// Cycles through the pool across requests
///
/// The counter is process-wide; wrapping overflow is fine because only the
/// modulus matters.
#[derive(Debug, Default)]
pub struct RoundRobin {
    next: AtomicUsize,
}

impl CredentialStrategy for RoundRobin {
    fn select<'a>(&self, pool: &'a [Credential]) -> Option<&'a Credential> {
        if pool.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % pool.len();
        pool.get(index)
    }
}

/// Build the strategy named in configuration
pub fn build_strategy(strategy: SelectionStrategy) -> Box<dyn CredentialStrategy> {
    match strategy {
        SelectionStrategy::First => Box::new(FirstAvailable),
        SelectionStrategy::Random => Box::new(RandomPick),
        SelectionStrategy::RoundRobin => Box::new(RoundRobin::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(secrets: &[&str]) -> Vec<Credential> {
        secrets
            .iter()
            .map(|s| Credential::new(*s).expect("non-blank secret"))
            .collect()
    }

    #[test]
    fn test_first_available_is_deterministic() {
        let pool = pool(&["key-a", "key-b"]);
        let strategy = FirstAvailable;
        for _ in 0..5 {
            let picked = strategy.select(&pool).expect("pool is non-empty");
            assert_eq!(picked.expose_secret(), "key-a");
        }
    }

    #[test]
    fn test_all_strategies_return_none_on_empty_pool() {
        let empty: Vec<Credential> = Vec::new();
        assert!(FirstAvailable.select(&empty).is_none());
        assert!(RandomPick.select(&empty).is_none());
        assert!(RoundRobin::default().select(&empty).is_none());
    }

    #[test]
    fn test_random_pick_stays_within_pool() {
        let pool = pool(&["key-a", "key-b", "key-c"]);
        let strategy = RandomPick;
        for _ in 0..50 {
            let picked = strategy.select(&pool).expect("pool is non-empty");
            assert!(pool.contains(picked));
        }
    }

    #[test]
    fn test_round_robin_cycles_through_pool() {
        let pool = pool(&["key-a", "key-b", "key-c"]);
        let strategy = RoundRobin::default();
        let picks: Vec<&str> = (0..6)
            .map(|_| {
                strategy
                    .select(&pool)
                    .expect("pool is non-empty")
                    .expose_secret()
            })
            .collect();
        assert_eq!(picks, ["key-a", "key-b", "key-c", "key-a", "key-b", "key-c"]);
    }

    #[test]
    fn test_build_strategy_matches_config() {
        let pool = pool(&["key-a", "key-b"]);
        let first = build_strategy(crate::config::SelectionStrategy::First);
        assert_eq!(
            first.select(&pool).expect("non-empty").expose_secret(),
            "key-a"
        );

        let round_robin = build_strategy(crate::config::SelectionStrategy::RoundRobin);
        let a = round_robin.select(&pool).expect("non-empty").expose_secret();
        let b = round_robin.select(&pool).expect("non-empty").expose_secret();
        assert_ne!(a, b);
    }
}
