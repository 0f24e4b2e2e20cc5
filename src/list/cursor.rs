use crate::error::{Error, Result};
use crate::list::{List, NodeId, Ring};
use ghost_cell::GhostToken;
use std::fmt;
use std::mem;

/// A fail-fast list cursor over a `List`.
///
/// A `Cursor` always sits in a gap between two adjacent nodes, `before` and
/// `after`, either of which may be the ghost node. In a list with length *n*
/// there are *n* + 1 gaps, indexed by 0, 1, ..., *n*; the cursor never wraps
/// around the ghost node.
///
/// All insertions, removals and replacements go through a cursor. Each cursor
/// remembers the modification count of the list it last synchronized with,
/// and every operation (including the read-only ones) first checks it against
/// the list. Once any cursor inserts or removes an element, every other cursor
/// on the list fails with [`Error::ConcurrentModification`].
///
/// `remove` and `set` act on the element most recently passed over by `next`
/// or `previous`. `remove` consumes it, `set` does not, so `set` may be
/// repeated while `remove` needs a fresh traversal step every time. `add`
/// also clears it.
///
/// # Examples
///
/// Here is a simple example showing how the cursors work. (The cursor is
/// denoted by `|`).
/// ```
/// use cursor_list::{Error, GhostToken, List};
///
/// GhostToken::new(|mut token| {
///     // [|A B C]
///     let list = List::from_iter(['A', 'B', 'C']);
///     let mut cursor = list.cursor_start(&token);
///
///     // [ A|B C]
///     assert_eq!(cursor.next(&token), Ok(&'A'));
///     // [ A X|B C]
///     cursor.add('X', &mut token).unwrap();
///     assert_eq!(cursor.remove(&mut token), Err(Error::IllegalState));
///     // [ A X|C]
///     assert_eq!(cursor.next(&token), Ok(&'B'));
///     assert_eq!(cursor.remove(&mut token), Ok('B'));
///
///     // Another cursor created before the last removal is now stale.
///     let stale = list.cursor_start(&token);
///     cursor.next(&token).unwrap();
///     cursor.remove(&mut token).unwrap();
///     assert!(matches!(
///         stale.has_next(&token),
///         Err(Error::ConcurrentModification { .. })
///     ));
///
///     assert_eq!(list.iter(&token).collect::<String>(), "AX");
/// });
/// ```
pub struct Cursor<'a, 'id, T> {
    list: &'a List<'id, T>,
    before: NodeId,
    after: NodeId,
    /// the number of elements before the cursor
    position: usize,
    expected_mod_count: u64,
    /// the node to be updated by `remove` or `set`
    last_traversed: Option<NodeId>,
}

impl<'a, 'id, T> Cursor<'a, 'id, T> {
    pub(crate) fn new(
        list: &'a List<'id, T>,
        ring: &Ring<T>,
        before: NodeId,
        position: usize,
    ) -> Self {
        Self {
            list,
            before,
            after: ring.next_of(before),
            position,
            expected_mod_count: ring.mod_count(),
            last_traversed: None,
        }
    }

    /// Fail if the list has been structurally modified since this cursor
    /// was last synchronized with it.
    fn check(&self, ring: &Ring<T>) -> Result<()> {
        let found = ring.mod_count();
        if found != self.expected_mod_count {
            tracing::debug!(
                expected = self.expected_mod_count,
                found,
                position = self.position,
                "rejected stale cursor"
            );
            return Err(Error::ConcurrentModification {
                expected: self.expected_mod_count,
                found,
            });
        }
        Ok(())
    }

    /// Adopt the modification count of the list after a change made
    /// through this cursor.
    fn synchronize(&mut self, ring: &Ring<T>) {
        self.expected_mod_count = ring.mod_count();
    }
}

// read-only operations
impl<'a, 'id, T> Cursor<'a, 'id, T> {
    /// Returns `true` if there is an element after the cursor.
    pub fn has_next(&self, token: &GhostToken<'id>) -> Result<bool> {
        let ring = self.list.ring(token);
        self.check(ring)?;
        Ok(self.position < ring.len())
    }

    /// Returns `true` if there is an element before the cursor.
    pub fn has_previous(&self, token: &GhostToken<'id>) -> Result<bool> {
        let ring = self.list.ring(token);
        self.check(ring)?;
        Ok(self.position > 0)
    }

    /// Returns the index of the element a subsequent `next` would return,
    /// i.e. the number of elements before the cursor.
    pub fn next_index(&self, token: &GhostToken<'id>) -> Result<usize> {
        self.check(self.list.ring(token))?;
        Ok(self.position)
    }

    /// Returns the index of the element a subsequent `previous` would return,
    /// or `None` if the cursor is at the start of the list.
    pub fn previous_index(&self, token: &GhostToken<'id>) -> Result<Option<usize>> {
        self.check(self.list.ring(token))?;
        Ok(self.position.checked_sub(1))
    }

    /// Provides a reference to the element after the cursor without moving,
    /// or `None` at the end of the list.
    pub fn peek_next<'t>(&self, token: &'t GhostToken<'id>) -> Result<Option<&'t T>>
    where
        'a: 't,
    {
        let list = self.list;
        let ring = list.ring(token);
        self.check(ring)?;
        Ok(ring.element(self.after))
    }

    /// Provides a reference to the element before the cursor without moving,
    /// or `None` at the start of the list.
    pub fn peek_previous<'t>(&self, token: &'t GhostToken<'id>) -> Result<Option<&'t T>>
    where
        'a: 't,
    {
        let list = self.list;
        let ring = list.ring(token);
        self.check(ring)?;
        Ok(ring.element(self.before))
    }
}

// traversal
impl<'a, 'id, T> Cursor<'a, 'id, T> {
    /// Moves the cursor past the next element and returns it.
    ///
    /// The returned element becomes the target of `remove` and `set`.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchElement`] at the end of the list; the cursor does not
    /// wrap around.
    pub fn next<'t>(&mut self, token: &'t GhostToken<'id>) -> Result<&'t T>
    where
        'a: 't,
    {
        let list = self.list;
        let ring = list.ring(token);
        self.check(ring)?;
        if self.position >= ring.len() {
            return Err(Error::NoSuchElement);
        }
        let passed = self.after;
        let element = ring.element(passed).ok_or(Error::NoSuchElement)?;
        self.last_traversed = Some(passed);
        self.before = passed;
        self.after = ring.next_of(passed);
        self.position += 1;
        Ok(element)
    }

    /// Moves the cursor back past the previous element and returns it.
    ///
    /// The returned element becomes the target of `remove` and `set`.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchElement`] at the start of the list; the cursor does not
    /// wrap around.
    pub fn previous<'t>(&mut self, token: &'t GhostToken<'id>) -> Result<&'t T>
    where
        'a: 't,
    {
        let list = self.list;
        let ring = list.ring(token);
        self.check(ring)?;
        if self.position == 0 {
            return Err(Error::NoSuchElement);
        }
        let passed = self.before;
        let element = ring.element(passed).ok_or(Error::NoSuchElement)?;
        self.last_traversed = Some(passed);
        self.after = passed;
        self.before = ring.prev_of(passed);
        self.position -= 1;
        Ok(element)
    }
}

// mutations
impl<'a, 'id, T> Cursor<'a, 'id, T> {
    /// Inserts `element` into the gap at the cursor.
    ///
    /// The new element ends up before the cursor: a subsequent `previous`
    /// returns it, a subsequent `next` returns the element that followed the
    /// gap. The pending `remove`/`set` target is cleared, and every other
    /// cursor on the list becomes stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{GhostToken, List};
    ///
    /// GhostToken::new(|mut token| {
    ///     let list = List::new();
    ///     let mut cursor = list.cursor_start(&token);
    ///     cursor.add(1, &mut token).unwrap();
    ///     cursor.add(2, &mut token).unwrap();
    ///     assert_eq!(cursor.next_index(&token), Ok(2));
    ///     assert_eq!(cursor.previous(&token), Ok(&2));
    ///     assert_eq!(list.iter(&token).copied().collect::<Vec<_>>(), [1, 2]);
    /// });
    /// ```
    pub fn add(&mut self, element: T, token: &mut GhostToken<'id>) -> Result<()> {
        let list = self.list;
        let ring = list.ring_mut(token);
        self.check(ring)?;
        let node = ring.attach(self.before, self.after, element);
        self.before = node;
        self.last_traversed = None;
        self.position += 1;
        self.synchronize(ring);
        tracing::trace!(position = self.position, len = ring.len(), "inserted element");
        Ok(())
    }

    /// Removes the element most recently returned by `next` or `previous`,
    /// and returns it.
    ///
    /// If that element was before the cursor, the cursor index shrinks by one.
    /// Every other cursor on the list becomes stale.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalState`] if there was no traversal step since the
    /// cursor was created, or since the last `add` or `remove`.
    pub fn remove(&mut self, token: &mut GhostToken<'id>) -> Result<T> {
        let list = self.list;
        let ring = list.ring_mut(token);
        self.check(ring)?;
        let target = self.last_traversed.ok_or(Error::IllegalState)?;
        let prev = ring.prev_of(target);
        let next = ring.next_of(target);
        let element = ring.detach(target).ok_or(Error::IllegalState)?;
        if self.after == target {
            self.after = next;
        }
        if self.before == target {
            self.before = prev;
            self.position -= 1;
        }
        self.last_traversed = None;
        self.synchronize(ring);
        tracing::trace!(position = self.position, len = ring.len(), "removed element");
        Ok(element)
    }

    /// Replaces the element most recently returned by `next` or `previous`,
    /// and returns the old value.
    ///
    /// This is not a structural change: the modification count stays the
    /// same, other cursors stay valid, and `set` may be called again on the
    /// same element.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalState`] if there was no traversal step since the
    /// cursor was created, or since the last `add` or `remove`.
    pub fn set(&mut self, element: T, token: &mut GhostToken<'id>) -> Result<T> {
        let list = self.list;
        let ring = list.ring_mut(token);
        self.check(ring)?;
        let target = self.last_traversed.ok_or(Error::IllegalState)?;
        let current = ring.element_mut(target).ok_or(Error::IllegalState)?;
        Ok(mem::replace(current, element))
    }
}

impl<'a, 'id, T> Clone for Cursor<'a, 'id, T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            before: self.before,
            after: self.after,
            position: self.position,
            expected_mod_count: self.expected_mod_count,
            last_traversed: self.last_traversed,
        }
    }
}

impl<'a, 'id, T> fmt::Debug for Cursor<'a, 'id, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("expected_mod_count", &self.expected_mod_count)
            .field("pending_update", &self.last_traversed.is_some())
            .finish()
    }
}
