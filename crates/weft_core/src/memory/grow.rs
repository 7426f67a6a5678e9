//! # Grow Buffer
//!
//! Append-only growable array with a hard element limit and fallible growth.

use std::ops::{Deref, DerefMut};

use crate::error::{CoreError, CoreResult};

/// A growable array whose every growth operation can fail.
///
/// Appends are O(1) amortized. Index access goes through `Deref<Target = [T]>`.
/// `clear` keeps the allocation, so a buffer rebuilt every frame stops
/// allocating once it has reached its working size.
///
/// # Example
///
/// ```rust,ignore
/// let mut indices: GrowBuffer<u32> = GrowBuffer::with_limit(6);
/// indices.try_extend_from_slice(&[0, 1, 2, 2, 3, 0])?;
/// assert!(indices.try_push(4).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct GrowBuffer<T> {
    /// Backing storage.
    items: Vec<T>,
    /// Maximum number of elements this buffer may hold.
    limit: usize,
}

impl<T> GrowBuffer<T> {
    /// Creates an empty buffer without an element limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            limit: usize::MAX,
        }
    }

    /// Creates an empty buffer that refuses to grow past `limit` elements.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit,
        }
    }

    /// Returns the element limit.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Changes the element limit. Existing elements beyond it are kept.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// Returns the number of elements that fit without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns how many more elements may be appended before the limit.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.items.len())
    }

    /// Reserves room for `additional` more elements.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` if the resulting length would pass the limit,
    /// `AllocationFailed` if the allocator refuses.
    pub fn try_reserve(&mut self, additional: usize) -> CoreResult<()> {
        let requested = self
            .items
            .len()
            .checked_add(additional)
            .ok_or(CoreError::AllocationFailed { requested: additional })?;
        if requested > self.limit {
            return Err(CoreError::CapacityExceeded {
                requested,
                limit: self.limit,
            });
        }
        self.items
            .try_reserve(additional)
            .map_err(|_| CoreError::AllocationFailed { requested: additional })
    }

    /// Appends one element.
    ///
    /// # Errors
    ///
    /// Propagates the failure of [`GrowBuffer::try_reserve`]; the buffer is unchanged.
    pub fn try_push(&mut self, value: T) -> CoreResult<()> {
        self.try_reserve(1)?;
        self.items.push(value);
        Ok(())
    }

    /// Removes every element, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Shortens the buffer to `len` elements.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Returns the contents as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> GrowBuffer<T> {
    /// Appends every element of `values`, or none of them.
    ///
    /// # Errors
    ///
    /// Propagates the failure of [`GrowBuffer::try_reserve`]; the buffer is unchanged.
    pub fn try_extend_from_slice(&mut self, values: &[T]) -> CoreResult<()> {
        self.try_reserve(values.len())?;
        self.items.extend_from_slice(values);
        Ok(())
    }

    /// Resizes in bulk, filling new slots with `value`.
    ///
    /// # Errors
    ///
    /// Growing past the limit or failing to allocate leaves the buffer unchanged.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> CoreResult<()> {
        if new_len > self.items.len() {
            self.try_reserve(new_len - self.items.len())?;
        }
        self.items.resize(new_len, value);
        Ok(())
    }
}

impl<T: bytemuck::Pod> GrowBuffer<T> {
    /// Returns the contents as raw bytes, ready for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.items)
    }
}

impl<T> Default for GrowBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for GrowBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> DerefMut for GrowBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}
