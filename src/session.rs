//! Per-user request serialization.
//!
//! A move is a read-modify-write against one user's stored game, so two
//! requests for the same user must not interleave. Requests for different
//! users never wait on each other.

use crate::store::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, instrument};

type LockMap = HashMap<UserId, Arc<AsyncMutex<()>>>;

/// Registry of per-user locks shared across request handlers.
///
/// Entries exist only while some request holds or waits for them.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<LockMap>>,
}

impl SessionLocks {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating session lock registry");
        Self::default()
    }

    /// Waits for exclusive access to `user`'s session.
    ///
    /// The session stays locked until the returned guard is dropped.
    #[instrument(skip(self, user), fields(user = %user))]
    pub async fn acquire(&self, user: &UserId) -> SessionGuard {
        let lock = {
            let mut locks = lock_map(&self.locks);
            Arc::clone(locks.entry(user.clone()).or_default())
        };
        let guard = lock.lock_owned().await;
        debug!("Session lock acquired");
        SessionGuard {
            guard: Some(guard),
            user: user.clone(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of users with a request in flight.
    pub fn len(&self) -> usize {
        lock_map(&self.locks).len()
    }

    /// Returns true if no request is in flight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one user's session.
///
/// Dropping the guard unlocks the session and forgets the user once nobody
/// else is waiting.
#[derive(Debug)]
pub struct SessionGuard {
    guard: Option<OwnedMutexGuard<()>>,
    user: UserId,
    locks: Arc<Mutex<LockMap>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = lock_map(&self.locks);
        // The map holds one reference; any other belongs to a waiter.
        if locks
            .get(&self.user)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.user);
            debug!(user = %self.user, "Session lock released");
        }
    }
}

fn lock_map(locks: &Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
