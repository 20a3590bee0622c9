//! # Observable Store State
//!
//! Building blocks shared by the stores.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  StateCell<S>  (tokio watch channel)                                    │
//! │     read(|s| ..)      short shared borrow                               │
//! │     update(|s| ..)    short exclusive borrow, wakes subscribers         │
//! │     subscribe()       watch::Receiver<S> for UIs                        │
//! │                                                                         │
//! │  NOTE: closures are synchronous. No borrow is ever held across an       │
//! │        `.await`, so actions may run concurrently from many tasks.       │
//! │                                                                         │
//! │  FlagGuard    raise on enter, lower on Drop (every exit path,           │
//! │               including a cancelled future)                             │
//! │                                                                         │
//! │  RequestTracker  generation tickets; only the newest response of a      │
//! │                  store may write identity/list state                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

// =============================================================================
// StateCell
// =============================================================================

/// Observable state container.
#[derive(Debug)]
pub struct StateCell<S> {
    tx: watch::Sender<S>,
}

impl<S> StateCell<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        StateCell { tx }
    }

    /// Executes a function with read access to the state.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        f(&self.tx.borrow())
    }

    /// Executes a function with write access to the state and notifies
    /// subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut S),
    {
        self.tx.send_modify(f);
    }

    /// Like [`update`](Self::update), but subscribers are only notified when
    /// `f` returns `true`.
    pub fn update_if<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut S) -> bool,
    {
        self.tx.send_if_modified(f)
    }

    /// Receiver that observes every change.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

impl<S: Clone> StateCell<S> {
    /// Clones the current state.
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }
}

impl<S: Default> Default for StateCell<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

// =============================================================================
// FlagGuard
// =============================================================================

/// Raises a flag for as long as the guard lives.
///
/// ## Usage
/// ```rust,ignore
/// let _loading = FlagGuard::raise(&self.state, |s| s.begin(), |s| s.end());
/// let body = self.transport.send(request).await?; // flag lowered on `?` too
/// ```
#[must_use = "the flag is lowered as soon as the guard is dropped"]
pub struct FlagGuard<'a, S> {
    cell: &'a StateCell<S>,
    exit: fn(&mut S),
}

impl<'a, S> FlagGuard<'a, S> {
    pub fn raise(cell: &'a StateCell<S>, enter: fn(&mut S), exit: fn(&mut S)) -> Self {
        cell.update(enter);
        FlagGuard { cell, exit }
    }
}

impl<S> Drop for FlagGuard<'_, S> {
    fn drop(&mut self) {
        self.cell.update(self.exit);
    }
}

// =============================================================================
// RequestTracker
// =============================================================================

/// Identifies one issued request within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out increasing tickets; only the newest is current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, superseding every earlier ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns true if no ticket has been issued after `ticket`.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        in_flight: u32,
        value: i32,
    }

    #[test]
    fn test_update_and_read() {
        let cell = StateCell::new(Counter::default());
        cell.update(|c| c.value = 5);
        assert_eq!(cell.read(|c| c.value), 5);
        assert_eq!(cell.snapshot().value, 5);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let cell = StateCell::new(Counter::default());
        let mut rx = cell.subscribe();

        assert!(!cell.update_if(|_| false));
        assert!(!rx.has_changed().unwrap());

        cell.update(|c| c.value = 1);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().value, 1);
    }

    #[test]
    fn test_flag_guard_nests() {
        let cell = StateCell::new(Counter::default());
        let enter: fn(&mut Counter) = |c| c.in_flight += 1;
        let exit: fn(&mut Counter) = |c| c.in_flight -= 1;

        let outer = FlagGuard::raise(&cell, enter, exit);
        {
            let _inner = FlagGuard::raise(&cell, enter, exit);
            assert_eq!(cell.read(|c| c.in_flight), 2);
        }
        assert_eq!(cell.read(|c| c.in_flight), 1);
        drop(outer);
        assert_eq!(cell.read(|c| c.in_flight), 0);
    }

    #[tokio::test]
    async fn test_flag_guard_lowered_on_cancel() {
        let cell = StateCell::new(Counter::default());

        let fut = async {
            let _g = FlagGuard::raise(&cell, |c| c.in_flight += 1, |c| c.in_flight -= 1);
            std::future::pending::<()>().await;
        };
        let _ = tokio::time::timeout(std::time::Duration::from_millis(10), fut).await;

        assert_eq!(cell.read(|c| c.in_flight), 0);
    }

    #[test]
    fn test_request_tracker() {
        let tracker = RequestTracker::new();
        let first = tracker.issue();
        assert!(tracker.is_latest(first));

        let second = tracker.issue();
        assert!(!tracker.is_latest(first));
        assert!(tracker.is_latest(second));
    }
}
