//! Positional control identity.
//!
//! A `ControlId` is never handed out as a handle. It is recomputed every frame
//! from where the control is declared: the chain of open scopes, the control's
//! index among its siblings, and a discriminator supplied at the declaration site.
//! Declaring the same tree twice yields the same ids; swapping two siblings with
//! different discriminators changes both ids; appending a trailing sibling leaves
//! every earlier id alone.

use std::hash::{Hash, Hasher};

use crate::error::{UiError, UiResult};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Stable identity of a control across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub u64);

impl ControlId {
    /// Identity of every window's root container.
    pub const ROOT: Self = Self(FNV_OFFSET);

    /// Creates an id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// FNV-1a over a sequence of 64-bit words.
#[inline]
fn mix(mut hash: u64, word: u64) -> u64 {
    for byte in word.to_le_bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// FNV-1a `Hasher`, used to turn arbitrary keys into sibling discriminators.
///
/// Unlike `DefaultHasher` its output is fixed for a given input, which is what
/// keeps ids stable from frame to frame.
#[derive(Debug, Clone, Copy)]
pub struct IdHasher(u64);

impl Default for IdHasher {
    fn default() -> Self {
        Self(FNV_OFFSET)
    }
}

impl Hasher for IdHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 ^= u64::from(byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Hashes a declaration-site key into a sibling discriminator.
#[must_use]
pub fn discriminator<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = IdHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    /// Hash of the whole chain of scopes up to and including this one.
    hash: u64,
    /// Next sibling index handed out inside this scope.
    next_sibling: u32,
    /// Most recent `(sibling index, discriminator)` declared in this scope.
    last: Option<(u32, u64)>,
}

impl Scope {
    const fn new(hash: u64) -> Self {
        Self {
            hash,
            next_sibling: 0,
            last: None,
        }
    }
}

/// Stack of open identity scopes for one frame.
#[derive(Debug, Clone)]
pub struct IdStack {
    scopes: Vec<Scope>,
}

impl IdStack {
    /// Creates a stack holding only the root scope.
    #[must_use]
    pub fn new() -> Self {
        let mut scopes = Vec::with_capacity(32);
        scopes.push(Scope::new(ControlId::ROOT.raw()));
        Self { scopes }
    }

    /// Drops every scope except the root and restarts sibling numbering.
    pub fn reset(&mut self) {
        self.scopes.truncate(1);
        self.scopes[0] = Scope::new(ControlId::ROOT.raw());
    }

    /// Number of open scopes, the root included.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn top(&self) -> &Scope {
        // The root scope is never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Hands out the next sibling index of the current scope.
    pub fn next_sibling_id(&mut self) -> u32 {
        let scope = self.top_mut();
        let index = scope.next_sibling;
        scope.next_sibling += 1;
        index
    }

    /// Declares a sibling with the given discriminator and returns its id.
    pub fn declare(&mut self, discriminator: u64) -> ControlId {
        let index = self.next_sibling_id();
        self.top_mut().last = Some((index, discriminator));
        self.current_id()
    }

    /// Id of the most recently declared sibling in the current scope.
    ///
    /// Before any sibling has been declared this is the scope's own id.
    #[must_use]
    pub fn current_id(&self) -> ControlId {
        let scope = self.top();
        match scope.last {
            Some((index, discriminator)) => {
                ControlId(mix(mix(scope.hash, u64::from(index)), discriminator))
            }
            None => ControlId(scope.hash),
        }
    }

    /// Opens a keyed scope. The scope takes a sibling slot of its own, so two
    /// scopes with the same key under one parent still differ.
    pub fn push_scope(&mut self, discriminator: u64) -> ControlId {
        let id = self.declare(discriminator);
        self.scopes.push(Scope::new(id.raw()));
        id
    }

    /// Opens the scope owned by an already-declared control.
    pub(crate) fn push_scope_for(&mut self, id: ControlId) {
        self.scopes.push(Scope::new(id.raw()));
    }

    /// Closes the innermost scope.
    ///
    /// # Errors
    ///
    /// `ScopeUnderflow` when only the root scope is open; the stack is unchanged.
    pub fn pop_scope(&mut self) -> UiResult<()> {
        if self.scopes.len() <= 1 {
            return Err(UiError::ScopeUnderflow);
        }
        self.scopes.pop();
        Ok(())
    }

    /// Reports scopes still open beyond the root.
    ///
    /// # Errors
    ///
    /// `UnbalancedScopes` carrying the number of extra scopes.
    pub fn check_balanced(&self) -> UiResult<()> {
        match self.scopes.len() - 1 {
            0 => Ok(()),
            depth => Err(UiError::UnbalancedScopes { depth }),
        }
    }

    /// Force-pops every scope above the root, returning how many were popped.
    pub fn unwind(&mut self) -> usize {
        self.truncate_to(1)
    }

    /// Pops scopes until `depth` remain (never below the root), returning how
    /// many were popped.
    pub fn truncate_to(&mut self, depth: usize) -> usize {
        let depth = depth.max(1);
        let extra = self.scopes.len().saturating_sub(depth);
        self.scopes.truncate(depth);
        extra
    }
}

impl Default for IdStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declare_all(stack: &mut IdStack, keys: &[&str]) -> Vec<ControlId> {
        keys.iter().map(|k| stack.declare(discriminator(k))).collect()
    }

    #[test]
    fn test_same_sequence_same_ids() {
        let mut stack = IdStack::new();
        let first = declare_all(&mut stack, &["header", "ok", "cancel"]);

        stack.reset();
        let second = declare_all(&mut stack, &["header", "ok", "cancel"]);

        assert_eq!(first, second);
    }

    #[test]
    fn test_swap_changes_ids() {
        let mut stack = IdStack::new();
        let before = declare_all(&mut stack, &["a", "b"]);

        stack.reset();
        let after = declare_all(&mut stack, &["b", "a"]);

        assert!(before[0] != after[0] || before[1] != after[1]);
        assert_ne!(before[0], after[0]);
    }

    #[test]
    fn test_trailing_insert_keeps_earlier_ids() {
        let mut stack = IdStack::new();
        let before = declare_all(&mut stack, &["a", "b"]);

        stack.reset();
        let after = declare_all(&mut stack, &["a", "b", "c"]);

        assert_eq!(&after[..2], &before[..]);
    }

    #[test]
    fn test_scope_nesting_changes_ids() {
        let mut stack = IdStack::new();
        let outer = stack.declare(discriminator("x"));

        stack.reset();
        stack.push_scope(discriminator("panel"));
        let inner = stack.declare(discriminator("x"));
        stack.pop_scope().unwrap();

        assert_ne!(outer, inner);
    }

    #[test]
    fn test_same_key_scopes_differ() {
        let mut stack = IdStack::new();
        stack.push_scope(discriminator("row"));
        let first = stack.declare(0);
        stack.pop_scope().unwrap();
        stack.push_scope(discriminator("row"));
        let second = stack.declare(0);
        stack.pop_scope().unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_balance_returns_to_depth() {
        let mut stack = IdStack::new();
        let depth = stack.depth();
        for key in 0..5u64 {
            stack.push_scope(key);
            stack.push_scope(key + 100);
            stack.declare(1);
            stack.pop_scope().unwrap();
            stack.pop_scope().unwrap();
        }
        assert_eq!(stack.depth(), depth);
        assert!(stack.check_balanced().is_ok());
    }

    #[test]
    fn test_unbalanced_detected() {
        let mut stack = IdStack::new();
        stack.push_scope(1);
        stack.push_scope(2);
        assert_eq!(
            stack.check_balanced(),
            Err(UiError::UnbalancedScopes { depth: 2 })
        );
        assert_eq!(stack.unwind(), 2);
        assert_eq!(stack.pop_scope(), Err(UiError::ScopeUnderflow));
    }

    #[test]
    fn test_current_id_tracks_latest_sibling() {
        let mut stack = IdStack::new();
        let scope_id = stack.current_id();
        let a = stack.declare(5);
        assert_ne!(scope_id, a);
        assert_eq!(stack.current_id(), a);
    }
}
