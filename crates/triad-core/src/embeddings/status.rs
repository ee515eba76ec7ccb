//! Embedding provider status broadcast (spec.md §5 `status()`, §9 design
//! note: "represent as a tiny publish/subscribe: current value + an
//! append-only list of subscriber callbacks; `subscribe(cb)` immediately
//! delivers current state and returns an unsubscribe handle").

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};

/// Lifecycle of the external embedding service. Transitions only move
/// forward: `Idle -> Loading -> {Ready | Error}`, with `Error` retryable
/// from `Idle` (spec.md §5 "Shared state").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

type Callback = Box<dyn Fn(EmbeddingStatus) + Send + Sync>;

/// Unsubscribe handle returned by `subscribe`. Dropping it does not
/// unsubscribe; call `unsubscribe()` explicitly (mirrors a plain id-based
/// handle rather than RAII, matching the teacher's preference for explicit
/// lifecycle methods over drop-guards in its status/consolidation code).
pub struct Subscription {
    id: usize,
}

impl Subscription {
    pub fn id(&self) -> usize {
        self.id
    }
}

/// Broadcasts `EmbeddingStatus` transitions to subscribers.
pub struct StatusBroadcast {
    current: RwLock<EmbeddingStatus>,
    subscribers: Mutex<Vec<(usize, Callback)>>,
    next_id: AtomicUsize,
}

impl Default for StatusBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBroadcast {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(EmbeddingStatus::Idle),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    pub fn current(&self) -> EmbeddingStatus {
        *self.current.read().expect("status lock poisoned")
    }

    /// Subscribe, immediately delivering the current state, and return an
    /// unsubscribe handle.
    pub fn subscribe(&self, callback: Callback) -> Subscription {
        let current = self.current();
        callback(current);

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.subscribers
            .lock()
            .expect("subscribers lock poisoned")
            .push((id, callback));
        Subscription { id }
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.subscribers
            .lock()
            .expect("subscribers lock poisoned")
            .retain(|(id, _)| *id != subscription.id);
    }

    /// Move to a new status and notify every subscriber. Transitions that
    /// violate the forward-only rule are ignored rather than panicking —
    /// the provider calling this is trusted, but a stray duplicate
    /// transition should not be fatal.
    pub fn transition(&self, next: EmbeddingStatus) {
        {
            let mut current = self.current.write().expect("status lock poisoned");
            if !Self::is_valid_transition(*current, next) {
                return;
            }
            *current = next;
        }
        for (_, callback) in self.subscribers.lock().expect("subscribers lock poisoned").iter() {
            callback(next);
        }
    }

    fn is_valid_transition(from: EmbeddingStatus, to: EmbeddingStatus) -> bool {
        use EmbeddingStatus::*;
        if from == to {
            return true;
        }
        matches!(
            (from, to),
            (Idle, Loading) | (Loading, Ready) | (Loading, Error) | (Error, Idle)
        )
    }
}
