//! Owned-or-borrowed backing storage for sample matrices.
//!
//! # Overview
//!
//! [`ValueBuffer`] is the single place where buffer ownership is decided. A
//! matrix built from caller memory borrows it and never frees it; a matrix
//! built from its own allocation frees it exactly once, when dropped. The two
//! modes are distinct enum variants, so a buffer can never be "allocated but
//! marked external", and `Drop` needs no flag check: dropping a
//! [`ValueBuffer::Borrowed`] drops a reference, dropping a
//! [`ValueBuffer::Owned`] releases the allocation.

// =============================================================================
// ValueBuffer
// =============================================================================

/// A flat value buffer that either owns its allocation or borrows caller memory.
///
/// Cloning is shallow for borrowed buffers (the reference is copied) and deep
/// for owned ones, mirroring [`std::borrow::Cow`].
///
/// # Example
///
/// ```
/// use understory::ValueBuffer;
///
/// let owned = ValueBuffer::from_vec(vec![1.0, 2.0]);
/// assert!(owned.is_owned());
///
/// let backing = [3.0, 4.0];
/// let borrowed = ValueBuffer::from_slice(&backing);
/// assert!(borrowed.is_borrowed());
/// // Dropping a borrowed buffer leaves the caller's memory untouched.
/// drop(borrowed);
/// assert_eq!(backing, [3.0, 4.0]);
/// ```
#[derive(Debug, Clone)]
pub enum ValueBuffer<'a, T> {
    /// Buffer allocated by this crate, released exactly once on drop.
    Owned(Box<[T]>),
    /// Caller-provided memory. The caller retains ownership and must keep it
    /// alive for `'a`; dropping this variant releases nothing.
    Borrowed(&'a [T]),
}

impl<T> ValueBuffer<'static, T> {
    /// Takes ownership of `values`; the buffer is released when dropped.
    #[inline]
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::Owned(values.into_boxed_slice())
    }
}

impl<'a, T> ValueBuffer<'a, T> {
    /// Borrows `values` without copying; the caller keeps ownership.
    #[inline]
    pub fn from_slice(values: &'a [T]) -> Self {
        Self::Borrowed(values)
    }

    /// Read access to the underlying values, whichever mode the buffer is in.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Owned(values) => values,
            Self::Borrowed(values) => values,
        }
    }

    /// Number of values in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// `true` if this buffer owns its allocation.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// `true` if this buffer borrows caller memory.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// Mutable access to the values, copying a borrowed buffer into an owned
    /// one first. The caller's memory is never written through.
    pub fn to_mut(&mut self) -> &mut [T]
    where
        T: Clone,
    {
        if let Self::Borrowed(values) = *self {
            *self = Self::Owned(values.to_vec().into_boxed_slice());
        }
        match self {
            Self::Owned(values) => values,
            Self::Borrowed(_) => unreachable!("borrowed buffer was just promoted"),
        }
    }

    /// Converts into an owned buffer, copying if currently borrowed.
    pub fn into_owned(self) -> ValueBuffer<'static, T>
    where
        T: Clone,
    {
        match self {
            Self::Owned(values) => ValueBuffer::Owned(values),
            Self::Borrowed(values) => ValueBuffer::Owned(values.to_vec().into_boxed_slice()),
        }
    }
}

/// An empty owned buffer. Safe to drop without ever having held values.
impl<T> Default for ValueBuffer<'_, T> {
    fn default() -> Self {
        Self::Owned(Vec::new().into_boxed_slice())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Element type that bumps a shared counter when dropped.
    #[derive(Clone, Debug)]
    struct CountsDrops(Rc<Cell<usize>>);

    impl Drop for CountsDrops {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn counted(n: usize) -> (Vec<CountsDrops>, Rc<Cell<usize>>) {
        let counter = Rc::new(Cell::new(0));
        let values = (0..n).map(|_| CountsDrops(Rc::clone(&counter))).collect();
        (values, counter)
    }

    #[test]
    fn from_vec_is_owned() {
        let buffer = ValueBuffer::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(buffer.is_owned());
        assert!(!buffer.is_borrowed());
        assert_eq!(buffer.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_slice_is_borrowed() {
        let backing = [1.0, 2.0, 3.0];
        let buffer = ValueBuffer::from_slice(&backing);
        assert!(buffer.is_borrowed());
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.as_slice().as_ptr(), backing.as_ptr());
    }

    #[test]
    fn default_is_empty_and_owned() {
        let buffer = ValueBuffer::<f64>::default();
        assert!(buffer.is_owned());
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn dropping_borrowed_buffer_drops_no_elements() {
        let (values, counter) = counted(4);
        let buffer = ValueBuffer::from_slice(&values);
        drop(buffer);
        assert_eq!(counter.get(), 0, "borrowed buffer must not free elements");
        drop(values);
        assert_eq!(counter.get(), 4);
    }

    #[test]
    fn dropping_owned_buffer_drops_each_element_once() {
        let (values, counter) = counted(4);
        let buffer = ValueBuffer::from_vec(values);
        assert_eq!(counter.get(), 0);
        drop(buffer);
        assert_eq!(counter.get(), 4);
    }

    #[test]
    fn to_mut_promotes_borrowed_without_touching_source() {
        let backing = vec![1.0, 2.0, 3.0];
        let mut buffer = ValueBuffer::from_slice(&backing);
        buffer.to_mut()[0] = 9.0;
        assert!(buffer.is_owned());
        assert_eq!(buffer.as_slice(), &[9.0, 2.0, 3.0]);
        assert_eq!(backing, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn to_mut_on_owned_writes_in_place() {
        let mut buffer = ValueBuffer::from_vec(vec![1.0, 2.0]);
        let before = buffer.as_slice().as_ptr();
        buffer.to_mut()[1] = 5.0;
        assert_eq!(buffer.as_slice().as_ptr(), before);
        assert_eq!(buffer.as_slice(), &[1.0, 5.0]);
    }

    #[test]
    fn into_owned_copies_borrowed() {
        let backing = vec![1.0, 2.0];
        let owned = ValueBuffer::from_slice(&backing).into_owned();
        assert!(owned.is_owned());
        assert_eq!(owned.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn clone_of_borrowed_stays_borrowed() {
        let backing = [1.0, 2.0];
        let buffer = ValueBuffer::from_slice(&backing);
        let clone = buffer.clone();
        assert!(clone.is_borrowed());
        assert_eq!(clone.as_slice().as_ptr(), backing.as_ptr());
    }
}
