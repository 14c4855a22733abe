//! Scope state machine.
//!
//! [`ScopeStack`] tracks whether rewriting is active at the current nesting
//! depth. The compile unit always pushes one frame; nested scopes push only
//! when their directives say `enabled` or `disabled`, so scopes without a
//! directive inherit silently.
//!
//! Frames are released through [`ScopeGuard`], which pops on drop. A scope's
//! frames therefore come off the stack when its traversal ends, on every
//! exit path.
//!
//! ```
//! use opov_transform::directive::Override;
//! use opov_transform::scope::{ScopeGuard, ScopeStack};
//!
//! let mut stack = ScopeStack::new();
//! stack.enter_unit(Override::Inherit, true);
//! {
//!     let guard = ScopeGuard::enter(&mut stack, Override::Disabled);
//!     assert!(!guard.is_active());
//! }
//! assert!(stack.is_active());
//! ```

use crate::directive::Override;
use std::ops::{Deref, DerefMut};

/// Stack of explicit enablement states.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<bool>,
}

impl ScopeStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Pushes the compile unit's frame, falling back to `default` when the
    /// unit has no explicit directive.
    pub fn enter_unit(&mut self, over: Override, default: bool) {
        self.frames.push(over.as_bool().unwrap_or(default));
    }

    /// Enters a nested scope and returns how many frames were pushed.
    pub fn enter(&mut self, over: Override) -> usize {
        match over.as_bool() {
            Some(active) => {
                self.frames.push(active);
                1
            }
            None => 0,
        }
    }

    /// Pops `count` frames.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if fewer than `count` frames are present.
    pub fn exit(&mut self, count: usize) {
        debug_assert!(count <= self.frames.len(), "scope stack underflow");
        let keep = self.frames.len().saturating_sub(count);
        self.frames.truncate(keep);
    }

    /// Returns `true` if rewriting is on at the current depth.
    ///
    /// An empty stack (outside any unit) is inactive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.frames.last().copied().unwrap_or(false)
    }

    /// Number of frames on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is on the stack.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl AsMut<ScopeStack> for ScopeStack {
    fn as_mut(&mut self) -> &mut ScopeStack {
        self
    }
}

/// Owns the frames pushed on entry to one scope and pops them on drop.
///
/// The guard borrows whatever holds the stack and dereferences to it, so a
/// visitor can keep traversing through the guard.
pub struct ScopeGuard<'a, T: AsMut<ScopeStack>> {
    owner: &'a mut T,
    pushed: usize,
}

impl<'a, T: AsMut<ScopeStack>> ScopeGuard<'a, T> {
    /// Enters a scope with the given override.
    pub fn enter(owner: &'a mut T, over: Override) -> Self {
        let pushed = owner.as_mut().enter(over);
        Self { owner, pushed }
    }

    /// Number of frames this guard will pop.
    #[must_use]
    pub const fn pushed(&self) -> usize {
        self.pushed
    }
}

impl<T: AsMut<ScopeStack>> Deref for ScopeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.owner
    }
}

impl<T: AsMut<ScopeStack>> DerefMut for ScopeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.owner
    }
}

impl<T: AsMut<ScopeStack>> Drop for ScopeGuard<'_, T> {
    fn drop(&mut self) {
        self.owner.as_mut().exit(self.pushed);
    }
}
