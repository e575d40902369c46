//! Growable sequences whose views share one backing store.
//!
//! A `Seq<T>` is a window `{offset, len, cap}` over an `Rc<RefCell<Vec<T>>>`.
//! The store is always fully initialized up to its allocation size, so the
//! reserved capacity past `len` holds real (default) values that a later
//! append or an extended reslice can expose.
//!
//! Appends that fit in `cap` write through the shared store and every view
//! over those slots sees the write. Appends that do not fit move the live
//! elements into a fresh store sized by the `GrowthPolicy`; from then on the
//! new sequence and the old views no longer alias.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, trace};

// =============================================================================
// Growth policy
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// At least double the old capacity, or exactly what is required if
    /// that is more.
    #[default]
    Doubling,
    /// Exactly the required capacity.
    Exact,
}

impl GrowthPolicy {
    /// Capacity of the new store when `required` elements no longer fit in
    /// `old_cap`. Always `>= required`.
    pub fn grow(self, old_cap: usize, required: usize) -> usize {
        match self {
            GrowthPolicy::Doubling => old_cap.saturating_mul(2).max(required).max(1),
            GrowthPolicy::Exact => required,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeqError {
    #[error("length {len} exceeds capacity {cap}")]
    LenExceedsCap { len: usize, cap: usize },

    #[error("slice bounds out of range [{lo}:{hi}] with capacity {cap}")]
    OutOfRange { lo: usize, hi: usize, cap: usize },

    #[error("index out of range [{index}] with length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

// =============================================================================
// Seq
// =============================================================================

/// Cloning a `Seq` clones the handle; the clone aliases the same store.
#[derive(Clone)]
pub struct Seq<T> {
    store: Rc<RefCell<Vec<T>>>,
    offset: usize,
    len: usize,
    cap: usize,
    policy: GrowthPolicy,
}

impl<T: Clone + Default> Seq<T> {
    pub fn new() -> Self {
        Seq::from_vec(Vec::new())
    }

    /// `len` default values followed by `cap - len` reserved slots.
    pub fn with_capacity(len: usize, cap: usize) -> Result<Self, SeqError> {
        Seq::with_policy(len, cap, GrowthPolicy::default())
    }

    pub fn with_policy(len: usize, cap: usize, policy: GrowthPolicy) -> Result<Self, SeqError> {
        if len > cap {
            return Err(SeqError::LenExceedsCap { len, cap });
        }
        Ok(Seq {
            store: Rc::new(RefCell::new(vec![T::default(); cap])),
            offset: 0,
            len,
            cap,
            policy,
        })
    }

    /// Length and capacity both equal `items.len()`.
    pub fn from_vec(items: Vec<T>) -> Self {
        let len = items.len();
        Seq {
            store: Rc::new(RefCell::new(items)),
            offset: 0,
            len,
            cap: len,
            policy: GrowthPolicy::default(),
        }
    }

    pub fn with_growth(mut self, policy: GrowthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn append(&self, value: T) -> Seq<T> {
        self.extend(std::iter::once(value))
    }

    /// Appends all `values` in one step, reallocating at most once.
    pub fn extend<I>(&self, values: I) -> Seq<T>
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        let required = self.len + values.len();

        if required <= self.cap {
            {
                let mut store = self.store.borrow_mut();
                let start = self.offset + self.len;
                for (slot, value) in store[start..start + values.len()].iter_mut().zip(values) {
                    *slot = value;
                }
            }
            trace!(len = required, cap = self.cap, "appended in place");
            return Seq {
                store: Rc::clone(&self.store),
                offset: self.offset,
                len: required,
                cap: self.cap,
                policy: self.policy,
            };
        }

        let new_cap = self.policy.grow(self.cap, required);
        let mut fresh = Vec::with_capacity(new_cap);
        fresh.extend_from_slice(&self.store.borrow()[self.offset..self.offset + self.len]);
        fresh.extend(values);
        fresh.resize(new_cap, T::default());

        debug!(
            old_cap = self.cap,
            new_cap,
            required,
            policy = ?self.policy,
            "reallocated backing store"
        );
        Seq {
            store: Rc::new(RefCell::new(fresh)),
            offset: 0,
            len: required,
            cap: new_cap,
            policy: self.policy,
        }
    }

    /// View over `[lo, hi)`. `hi` may reach past `len` into reserved
    /// capacity, never past `cap`.
    pub fn slice(&self, lo: usize, hi: usize) -> Result<Seq<T>, SeqError> {
        if lo > hi || hi > self.cap {
            return Err(SeqError::OutOfRange { lo, hi, cap: self.cap });
        }
        Ok(Seq {
            store: Rc::clone(&self.store),
            offset: self.offset + lo,
            len: hi - lo,
            cap: self.cap - lo,
            policy: self.policy,
        })
    }

    pub fn slice_from(&self, lo: usize) -> Result<Seq<T>, SeqError> {
        self.slice(lo, self.len)
    }

    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        Some(self.store.borrow()[self.offset + index].clone())
    }

    pub fn set(&self, index: usize, value: T) -> Result<(), SeqError> {
        if index >= self.len {
            return Err(SeqError::IndexOutOfBounds { index, len: self.len });
        }
        self.store.borrow_mut()[self.offset + index] = value;
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.store.borrow()[self.offset..self.offset + self.len].to_vec()
    }
}

impl<T> Seq<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub fn shares_store_with(&self, other: &Seq<T>) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl<T: fmt::Display> Seq<T> {
    /// `"<contents> <len> <cap>"`, one line of lesson output.
    pub fn report(&self) -> String {
        format!("{} {} {}", self, self.len, self.cap)
    }
}

impl<T: Clone + Default> Default for Seq<T> {
    fn default() -> Self {
        Seq::new()
    }
}

impl<T: fmt::Display> fmt::Display for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        f.write_str("[")?;
        for (i, item) in store[self.offset..self.offset + self.len].iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", item)?;
        }
        f.write_str("]")
    }
}

impl<T: fmt::Debug> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        f.debug_struct("Seq")
            .field("items", &&store[self.offset..self.offset + self.len])
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("cap", &self.cap)
            .finish()
    }
}

/// Copies `min(dst.len(), src.len())` elements from `src` into the front of
/// `dst` and returns how many were copied. Overlapping views over the same
/// store behave as if the source were staged first.
pub fn copy<T: Clone>(dst: &Seq<T>, src: &Seq<T>) -> usize {
    let n = dst.len.min(src.len);
    let staged: Vec<T> = src.store.borrow()[src.offset..src.offset + n].to_vec();
    dst.store.borrow_mut()[dst.offset..dst.offset + n].clone_from_slice(&staged);
    trace!(copied = n, "copied between views");
    n
}
