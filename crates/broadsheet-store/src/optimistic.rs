#![forbid(unsafe_code)]

//! Per-entity optimistic mutation bookkeeping.
//!
//! An optimistic mutation applies its desired state to the local store
//! immediately, then waits for the remote authority to confirm or reject it.
//! [`OptimisticCoordinator`] tracks the one meaningful in-flight mutation per
//! entity:
//!
//! - [`begin`](OptimisticCoordinator::begin) snapshots the pre-trigger state
//!   and hands back a [`MutationToken`] correlating the outbound request.
//!   Beginning again on the same entity supersedes the previous pending
//!   mutation (cancel-and-replace); the old token can never match again.
//! - [`confirm`](OptimisticCoordinator::confirm) resolves a success response.
//!   Stale tokens report [`Reconciliation::Stale`] and change nothing.
//! - [`fail`](OptimisticCoordinator::fail) resolves a failure response,
//!   returning the snapshotted prior state for rollback — or `None` when the
//!   response is stale and must be silently discarded.
//!
//! The coordinator never touches the store itself; callers dispatch the
//! rollback so it lands in the action log like any other mutation.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::debug;

/// Opaque generation token correlating one in-flight mutation request.
///
/// Tokens are unique per coordinator for its lifetime; a superseded token is
/// permanently unmatchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationToken(u64);

impl fmt::Display for MutationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Mutation state for a single entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationState<T> {
    /// No mutation in flight.
    Idle,
    /// A mutation is awaiting remote confirmation. `prior` is the state to
    /// restore if it fails.
    Pending {
        /// Token of the current in-flight request.
        token: MutationToken,
        /// Pre-trigger state, the rollback target.
        prior: T,
    },
}

/// Outcome of reconciling a success response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The response matched the current pending mutation; the entity is Idle
    /// again and the optimistic state stands.
    Committed,
    /// The response belonged to a superseded (or unknown) mutation and was
    /// discarded.
    Stale,
}

struct PendingMutation<V> {
    token: MutationToken,
    prior: V,
}

/// Tracks the current pending mutation per entity key.
pub struct OptimisticCoordinator<K, V> {
    pending: HashMap<K, PendingMutation<V>>,
    next_token: u64,
}

impl<K: fmt::Debug, V> fmt::Debug for OptimisticCoordinator<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimisticCoordinator")
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .field("next_token", &self.next_token)
            .finish()
    }
}

impl<K, V> Default for OptimisticCoordinator<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OptimisticCoordinator<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// An empty coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_token: 0,
        }
    }

    /// Begin a mutation on `key`, snapshotting `prior` as the rollback target.
    ///
    /// `prior` must be the entity's state *at trigger time* — if a mutation is
    /// already pending, that state includes its optimistic application, which
    /// is exactly the cancel-and-replace semantics: the superseded mutation's
    /// rollback target is no longer reachable.
    pub fn begin(&mut self, key: K, prior: V) -> MutationToken {
        self.next_token += 1;
        let token = MutationToken(self.next_token);
        if let Some(old) = self.pending.insert(
            key.clone(),
            PendingMutation {
                token,
                prior,
            },
        ) {
            debug!(key = ?key, superseded = %old.token, token = %token, "pending mutation superseded");
        } else {
            debug!(key = ?key, token = %token, "pending mutation started");
        }
        token
    }

    /// Reconcile a success response for `key` carrying `token`.
    pub fn confirm(&mut self, key: &K, token: MutationToken) -> Reconciliation {
        match self.pending.get(key) {
            Some(entry) if entry.token == token => {
                self.pending.remove(key);
                debug!(key = ?key, token = %token, "pending mutation committed");
                Reconciliation::Committed
            }
            _ => {
                debug!(key = ?key, token = %token, "stale success response discarded");
                Reconciliation::Stale
            }
        }
    }

    /// Reconcile a failure response for `key` carrying `token`.
    ///
    /// Returns the snapshotted prior state when the token is current (the
    /// caller applies the rollback), or `None` for stale responses.
    pub fn fail(&mut self, key: &K, token: MutationToken) -> Option<V> {
        match self.pending.get(key) {
            Some(entry) if entry.token == token => {
                let entry = self.pending.remove(key)?;
                debug!(key = ?key, token = %token, "pending mutation failed, rolling back");
                Some(entry.prior)
            }
            _ => {
                debug!(key = ?key, token = %token, "stale failure response discarded");
                None
            }
        }
    }

    /// Current mutation state for `key`, with the prior by reference.
    #[must_use]
    pub fn state(&self, key: &K) -> MutationState<&V> {
        match self.pending.get(key) {
            Some(entry) => MutationState::Pending {
                token: entry.token,
                prior: &entry.prior,
            },
            None => MutationState::Idle,
        }
    }

    /// Whether `key` has a mutation in flight.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Token of the current in-flight mutation for `key`, if any.
    #[must_use]
    pub fn pending_token(&self, key: &K) -> Option<MutationToken> {
        self.pending.get(key).map(|entry| entry.token)
    }

    /// Number of entities with a mutation in flight.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_makes_entity_pending() {
        let mut coord = OptimisticCoordinator::new();
        assert!(!coord.is_pending(&1));
        let token = coord.begin(1, "before");
        assert!(coord.is_pending(&1));
        assert_eq!(coord.pending_token(&1), Some(token));
        assert_eq!(
            coord.state(&1),
            MutationState::Pending {
                token,
                prior: &"before"
            }
        );
    }

    #[test]
    fn confirm_commits_and_returns_to_idle() {
        let mut coord = OptimisticCoordinator::new();
        let token = coord.begin(1, "before");
        assert_eq!(coord.confirm(&1, token), Reconciliation::Committed);
        assert_eq!(coord.state(&1), MutationState::Idle);
        assert_eq!(coord.pending_len(), 0);
    }

    #[test]
    fn fail_returns_prior_for_rollback() {
        let mut coord = OptimisticCoordinator::new();
        let token = coord.begin(1, "before");
        assert_eq!(coord.fail(&1, token), Some("before"));
        assert!(!coord.is_pending(&1));
    }

    #[test]
    fn second_begin_supersedes_first() {
        let mut coord = OptimisticCoordinator::new();
        let first = coord.begin(1, "a");
        let second = coord.begin(1, "b");
        assert_ne!(first, second);

        // Only the second prior is eligible for rollback.
        assert_eq!(coord.fail(&1, first), None);
        assert_eq!(coord.fail(&1, second), Some("b"));
    }

    #[test]
    fn stale_success_after_supersede_does_not_commit() {
        let mut coord = OptimisticCoordinator::new();
        let first = coord.begin(1, "a");
        let second = coord.begin(1, "b");

        assert_eq!(coord.confirm(&1, first), Reconciliation::Stale);
        assert!(coord.is_pending(&1));
        assert_eq!(coord.confirm(&1, second), Reconciliation::Committed);
    }

    #[test]
    fn responses_after_resolution_are_stale() {
        let mut coord = OptimisticCoordinator::new();
        let token = coord.begin(1, "a");
        assert_eq!(coord.confirm(&1, token), Reconciliation::Committed);
        // Duplicate delivery of the same response.
        assert_eq!(coord.confirm(&1, token), Reconciliation::Stale);
        assert_eq!(coord.fail(&1, token), None);
    }

    #[test]
    fn entities_are_independent() {
        let mut coord = OptimisticCoordinator::new();
        let t1 = coord.begin(1, "one");
        let t2 = coord.begin(2, "two");
        assert_eq!(coord.pending_len(), 2);

        assert_eq!(coord.confirm(&1, t1), Reconciliation::Committed);
        assert!(coord.is_pending(&2));
        assert_eq!(coord.fail(&2, t2), Some("two"));
    }

    #[test]
    fn tokens_are_never_reused() {
        let mut coord: OptimisticCoordinator<u32, &str> = OptimisticCoordinator::new();
        let mut seen = std::collections::HashSet::new();
        for i in 0..100 {
            let token = coord.begin(i % 3, "x");
            assert!(seen.insert(token), "token reuse at iteration {i}");
        }
    }
}
