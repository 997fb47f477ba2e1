//! Growable buffer: the splice engine under every text mutation.
//!
//! A `GrowBuf<T>` is an owned, resizable array with an explicit growth
//! policy. Lines are `GrowBuf<u8>` and the document's line list is a
//! `GrowBuf<Line>`, so every edit in the editor (typing, backspace, line
//! break, line merge) ends up as one of the splice primitives here:
//!
//! | Primitive | Effect |
//! |-----------|--------|
//! | [`append`](GrowBuf::append) | push at the end |
//! | [`prepend`](GrowBuf::prepend) | push at the front, shifting right |
//! | [`insert`](GrowBuf::insert) | push at `i`, shifting the tail right |
//! | [`remove`](GrowBuf::remove) | take out `i`, shifting the tail left |
//! | [`split_into`](GrowBuf::split_into) | move `[i..]` onto the end of another buffer |
//! | [`join`](GrowBuf::join) | move all of another buffer onto the end of this one |
//!
//! # Capacity policy
//!
//! Storage is allocated in whole `chunk`-sized steps. After every length
//! change the buffer re-evaluates its allocation:
//!
//! - `len == 0` releases the storage entirely (`capacity == 0`, no heap).
//! - `capacity < len` or `len < capacity - chunk` reallocates to the
//!   smallest multiple of `chunk` strictly greater than `len`.
//! - anything else keeps the current allocation.
//!
//! So `capacity >= len` always holds, and an empty buffer never owns memory.
//! Slots past `len` hold `T::default()` values and are never observable.

use std::fmt;
use std::mem;

/// Growth step used when no explicit chunk is given.
pub const DEFAULT_CHUNK: usize = 16;

/// An owned dynamic array with chunked growth and splice operations.
pub struct GrowBuf<T> {
    /// `None` exactly when `len == 0`.
    slots: Option<Box<[T]>>,
    len: usize,
    capacity: usize,
    chunk: usize,
}

impl<T> GrowBuf<T> {
    /// An empty buffer growing in steps of [`DEFAULT_CHUNK`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_chunk(DEFAULT_CHUNK)
    }

    /// An empty buffer growing in steps of `chunk` elements.
    ///
    /// A `chunk` of zero is treated as one.
    #[must_use]
    pub const fn with_chunk(chunk: usize) -> Self {
        Self {
            slots: None,
            len: 0,
            capacity: 0,
            chunk: if chunk == 0 { 1 } else { chunk },
        }
    }

    /// Number of logical elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when the buffer holds no elements (and therefore no storage).
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Growth step in elements.
    #[inline]
    #[must_use]
    pub const fn chunk(&self) -> usize {
        self.chunk
    }

    /// True when the buffer currently owns heap storage.
    #[inline]
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        self.slots.is_some()
    }

    /// The logical elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self.slots.as_deref() {
            Some(slots) => &slots[..self.len],
            None => &[],
        }
    }

    /// The logical elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self.slots.as_deref_mut() {
            Some(slots) => &mut slots[..self.len],
            None => &mut [],
        }
    }

    /// Element `i`, or `None` if the buffer is empty or `i >= len`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&T> {
        self.as_slice().get(i)
    }

    /// Mutable element `i`, or `None` if the buffer is empty or `i >= len`.
    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(i)
    }

    /// The head element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The tail element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// The tail element, mutably.
    #[inline]
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Iterate over the logical elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Default> GrowBuf<T> {
    /// Grow by one and store `value` in the new last slot.
    pub fn append(&mut self, value: T) -> &mut T {
        self.len += 1;
        self.resize();
        let last = self.len - 1;
        let slot = &mut self.as_mut_slice()[last];
        *slot = value;
        slot
    }

    /// Grow by one, shift every element right, and store `value` at slot 0.
    pub fn prepend(&mut self, value: T) -> &mut T {
        self.len += 1;
        self.resize();
        let slots = self.as_mut_slice();
        slots.rotate_right(1);
        let slot = &mut slots[0];
        *slot = value;
        slot
    }

    /// Store `value` at index `i`, shifting `[i..]` right by one.
    ///
    /// `i == 0` behaves as [`prepend`](Self::prepend), `i >= len` as
    /// [`append`](Self::append).
    pub fn insert(&mut self, i: usize, value: T) -> &mut T {
        if i == 0 {
            return self.prepend(value);
        }
        if i >= self.len {
            return self.append(value);
        }

        self.len += 1;
        self.resize();
        let slots = &mut self.as_mut_slice()[i..];
        slots.rotate_right(1);
        let slot = &mut slots[0];
        *slot = value;
        slot
    }

    /// Take out element `i` and close the gap.
    ///
    /// `i` is clamped to `[0, len)`, so an index past the end removes the
    /// tail. Returns `None` (and does nothing) when the buffer is empty.
    pub fn remove(&mut self, i: usize) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let i = i.min(self.len - 1);
        let slots = &mut self.as_mut_slice()[i..];
        let removed = mem::take(&mut slots[0]);
        slots.rotate_left(1);
        self.len -= 1;
        self.resize();
        Some(removed)
    }

    /// Move `self[i..]` onto the end of `dest`, truncating `self` to `i`.
    ///
    /// `i == 0` moves everything and leaves `self` empty (and unallocated).
    /// `i >= len` moves nothing.
    pub fn split_into(&mut self, dest: &mut Self, i: usize) {
        if i >= self.len {
            return;
        }

        let start = dest.len;
        dest.len += self.len - i;
        dest.resize();

        let moved = &mut self.as_mut_slice()[i..];
        for (to, from) in dest.as_mut_slice()[start..].iter_mut().zip(moved) {
            *to = mem::take(from);
        }

        self.len = i;
        self.resize();
    }

    /// Move every element of `src` onto the end of `self`.
    ///
    /// `src` is consumed; its storage is released when it drops.
    pub fn join(&mut self, mut src: Self) {
        let start = self.len;
        self.len += src.len;
        self.resize();

        for (to, from) in self.as_mut_slice()[start..]
            .iter_mut()
            .zip(src.as_mut_slice())
        {
            *to = mem::take(from);
        }
    }

    /// Apply the capacity policy after a length change.
    fn resize(&mut self) {
        if self.len == 0 {
            self.slots = None;
            self.capacity = 0;
            return;
        }

        if self.capacity >= self.len && self.len >= self.capacity.saturating_sub(self.chunk) {
            return;
        }

        let capacity = self.chunk * (1 + self.len / self.chunk);
        let mut slots = Vec::with_capacity(capacity);
        if let Some(old) = self.slots.take() {
            slots.extend(old.into_vec().into_iter().take(self.len));
        }
        slots.resize_with(capacity, T::default);

        self.slots = Some(slots.into_boxed_slice());
        self.capacity = capacity;
    }
}

impl<T: Default + Clone> GrowBuf<T> {
    /// Append clones of every element in `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) {
        if items.is_empty() {
            return;
        }

        let start = self.len;
        self.len += items.len();
        self.resize();
        self.as_mut_slice()[start..].clone_from_slice(items);
    }
}

impl<T> Default for GrowBuf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Clone> Clone for GrowBuf<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_chunk(self.chunk);
        copy.extend_from_slice(self.as_slice());
        copy
    }
}

impl<T: PartialEq> PartialEq for GrowBuf<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowBuf<T> {}

impl<T: fmt::Debug> fmt::Debug for GrowBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowBuf")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("chunk", &self.chunk)
            .field("items", &self.as_slice())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a GrowBuf<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
