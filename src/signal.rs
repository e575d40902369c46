//! Bounded handoff slot between threads.
//!
//! A `Slot<T>` is a fixed-capacity FIFO guarded by a `Mutex` with two
//! `Condvar`s: senders wait on `not_full`, receivers on `not_empty`.
//! Closing the slot wakes everyone. Blocked or later senders get their
//! value back in `SendError::Closed`. Receivers drain what is buffered
//! and then see `None`.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

// =============================================================================
// Token
// =============================================================================

/// Zero-size token carried through a slot when only the handoff matters.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signal;

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{}")
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("slot capacity must be at least 1")]
    ZeroCapacity,
}

/// Returned by `send`; hands the rejected value back to the caller.
#[derive(PartialEq, Eq, thiserror::Error)]
pub enum SendError<T> {
    #[error("sending on a closed slot")]
    Closed(T),
}

impl<T> SendError<T> {
    pub fn into_inner(self) -> T {
        match self {
            SendError::Closed(value) => value,
        }
    }
}

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Closed(..)")
    }
}

#[derive(PartialEq, Eq, thiserror::Error)]
pub enum TrySendError<T> {
    #[error("sending on a full slot")]
    Full(T),
    #[error("sending on a closed slot")]
    Closed(T),
}

impl<T> TrySendError<T> {
    pub fn into_inner(self) -> T {
        match self {
            TrySendError::Full(value) | TrySendError::Closed(value) => value,
        }
    }
}

impl<T> fmt::Debug for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySendError::Full(_) => f.write_str("Full(..)"),
            TrySendError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TryRecvError {
    #[error("receiving on an empty slot")]
    Empty,
    #[error("receiving on an empty and closed slot")]
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CloseError {
    #[error("close of a closed slot")]
    AlreadyClosed,
}

// =============================================================================
// Slot
// =============================================================================

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
    waiting_senders: usize,
}

pub struct Slot<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> Slot<T> {
    pub fn bounded(capacity: usize) -> Result<Self, SlotError> {
        if capacity == 0 {
            return Err(SlotError::ZeroCapacity);
        }
        Ok(Slot {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
                waiting_senders: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        })
    }

    // A panicking holder can't leave `State` half-updated, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks while the slot is full. Fails if the slot is closed before
    /// or while waiting.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        let mut state = self.lock();
        while !state.closed && state.items.len() >= self.capacity {
            state.waiting_senders += 1;
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.waiting_senders -= 1;
        }
        if state.closed {
            debug!("send rejected: slot closed");
            return Err(SendError::Closed(value));
        }
        state.items.push_back(value);
        let buffered = state.items.len();
        drop(state);

        debug!(buffered, "value sent");
        self.not_empty.notify_one();
        Ok(())
    }

    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        let mut state = self.lock();
        if state.closed {
            return Err(TrySendError::Closed(value));
        }
        if state.items.len() >= self.capacity {
            return Err(TrySendError::Full(value));
        }
        state.items.push_back(value);
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Blocks until a value arrives. Returns `None` once the slot is
    /// closed and drained.
    pub fn recv(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(value) = state.items.pop_front() {
                drop(state);
                debug!("value received");
                self.not_full.notify_one();
                return Some(value);
            }
            if state.closed {
                debug!("recv on closed slot: end of data");
                return None;
            }
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        let mut state = self.lock();
        match state.items.pop_front() {
            Some(value) => {
                drop(state);
                self.not_full.notify_one();
                Ok(value)
            }
            None if state.closed => Err(TryRecvError::Disconnected),
            None => Err(TryRecvError::Empty),
        }
    }

    pub fn close(&self) -> Result<(), CloseError> {
        let mut state = self.lock();
        if state.closed {
            return Err(CloseError::AlreadyClosed);
        }
        state.closed = true;
        let buffered = state.items.len();
        let waiting_senders = state.waiting_senders;
        drop(state);

        debug!(buffered, waiting_senders, "slot closed");
        self.not_empty.notify_all();
        self.not_full.notify_all();
        Ok(())
    }

    /// Drains the slot, blocking between values, until it is closed and
    /// empty.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { slot: self }
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Senders currently parked on a full slot.
    pub fn waiting_senders(&self) -> usize {
        self.lock().waiting_senders
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Slot")
            .field("len", &state.items.len())
            .field("capacity", &self.capacity)
            .field("closed", &state.closed)
            .finish()
    }
}

pub struct Iter<'a, T> {
    slot: &'a Slot<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.slot.recv()
    }
}
