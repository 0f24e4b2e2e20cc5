use ghost_cell::{GhostCell, GhostToken};

use crate::list::cursor::Cursor;
use crate::list::iterator::{IntoIter, Iter};

pub mod cursor;
pub mod iterator;

/// The `List` is a doubly-linked list with owned nodes, implemented as a cyclic list
/// anchored by a ghost node. Elements are inserted and removed in constant time
/// through a [`Cursor`], which fails fast once another cursor has changed the
/// structure of the list.
///
/// The nodes live in a `GhostCell` branded by `'id`. Reading the list needs a
/// shared borrow of the matching [`GhostToken`], changing it needs a mutable
/// borrow. Any number of cursors can therefore be alive at the same time while
/// the borrow checker still guarantees that no element is read while it is
/// being written.
///
/// The `List` contains:
/// - an arena of nodes, where slot 0 is always the ghost node;
/// - a free list of vacant slots, reused by later insertions;
/// - the length of the list;
/// - the modification count, bumped once per insertion or removal.
///
/// # Examples
///
/// ```
/// use cursor_list::{GhostToken, List};
///
/// GhostToken::new(|mut token| {
///     let list = List::new();
///     let mut cursor = list.cursor_start(&token);
///     cursor.add('a', &mut token).unwrap();
///     cursor.add('b', &mut token).unwrap();
///
///     assert_eq!(list.len(&token), 2);
///     assert_eq!(list.iter(&token).collect::<String>(), "ab");
/// });
/// ```
pub struct List<'id, T> {
    ring: GhostCell<'id, Ring<T>>,
}

/// Index of a node in the arena of a [`Ring`].
///
/// Indices of removed nodes are recycled, so a `NodeId` is only meaningful
/// while the modification count it was observed under is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const GHOST: NodeId = NodeId(0);
}

pub(crate) struct Node<T> {
    next: NodeId,
    prev: NodeId,
    /// `None` for the ghost node and for vacant slots.
    element: Option<T>,
}

/// The linked structure behind a [`List`].
///
/// In convention, in a ring with length *n*, the elements are indexed by
/// 0, 1, ..., *n* - 1 when walking `next` from the ghost node, and the ghost
/// node itself is at index *n*.
pub(crate) struct Ring<T> {
    nodes: Vec<Node<T>>,
    vacant: Vec<NodeId>,
    len: usize,
    mod_count: u64,
}

impl<T> Node<T> {
    fn ghost() -> Self {
        Node {
            next: NodeId::GHOST,
            prev: NodeId::GHOST,
            element: None,
        }
    }
}

impl<T> Ring<T> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::ghost()],
            vacant: Vec::new(),
            len: 0,
            mod_count: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn mod_count(&self) -> u64 {
        self.mod_count
    }

    #[inline]
    pub(crate) fn next_of(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].next
    }

    #[inline]
    pub(crate) fn prev_of(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].prev
    }

    /// The first element node, or the ghost node if the ring is empty.
    #[inline]
    pub(crate) fn front(&self) -> NodeId {
        self.next_of(NodeId::GHOST)
    }

    /// The last element node, or the ghost node if the ring is empty.
    #[inline]
    pub(crate) fn back(&self) -> NodeId {
        self.prev_of(NodeId::GHOST)
    }

    /// Returns the element held by `node`, or `None` for the ghost node.
    pub(crate) fn element(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node.0)?.element.as_ref()
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(node.0)?.element.as_mut()
    }

    fn connect(&mut self, prev: NodeId, next: NodeId) {
        self.nodes[prev.0].next = next;
        self.nodes[next.0].prev = prev;
    }

    fn assert_adjacent(&self, prev: NodeId, next: NodeId) {
        debug_assert_eq!(
            self.next_of(prev),
            next,
            "{:?} is not followed by {:?}",
            prev,
            next
        );
        debug_assert_eq!(
            self.prev_of(next),
            prev,
            "{:?} is not preceded by {:?}",
            next,
            prev
        );
    }

    /// Attach a new node holding `element` between the adjacent nodes `prev`
    /// and `next`, and return its index.
    ///
    /// If `prev` and `next` are not adjacent, the ring becomes ill-formed
    /// (checked only in `#[cfg(debug_assertions)]`).
    pub(crate) fn attach(&mut self, prev: NodeId, next: NodeId, element: T) -> NodeId {
        self.assert_adjacent(prev, next);
        let node = Node {
            next,
            prev,
            element: Some(element),
        };
        let id = match self.vacant.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };
        self.connect(prev, id);
        self.connect(id, next);
        self.len += 1;
        self.mod_count = self.mod_count.wrapping_add(1);
        self.assert_adjacent(prev, id);
        self.assert_adjacent(id, next);
        id
    }

    /// Detach `node` from the ring and return its element, or return `None`
    /// (leaving the ring untouched) if `node` is the ghost node or vacant.
    pub(crate) fn detach(&mut self, node: NodeId) -> Option<T> {
        let element = self.nodes.get_mut(node.0)?.element.take()?;
        let prev = self.prev_of(node);
        let next = self.next_of(node);
        self.assert_adjacent(prev, node);
        self.assert_adjacent(node, next);
        self.connect(prev, next);
        let slot = &mut self.nodes[node.0];
        slot.next = node;
        slot.prev = node;
        self.vacant.push(node);
        self.len -= 1;
        self.mod_count = self.mod_count.wrapping_add(1);
        Some(element)
    }

    pub(crate) fn push_back(&mut self, element: T) {
        let back = self.back();
        self.attach(back, NodeId::GHOST, element);
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let front = self.front();
        self.detach(front)
    }

    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let back = self.back();
        self.detach(back)
    }

    /// Walk the whole ring and panic if a link or the length is inconsistent.
    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self) {
        assert_eq!(self.prev_of(self.front()), NodeId::GHOST);
        let mut node = self.front();
        let mut count = 0;
        while node != NodeId::GHOST {
            assert!(self.element(node).is_some(), "{:?} has no element", node);
            assert_eq!(self.prev_of(self.next_of(node)), node);
            count += 1;
            assert!(count <= self.nodes.len(), "ring does not close");
            node = self.next_of(node);
        }
        assert_eq!(count, self.len);
        assert_eq!(self.nodes.len(), self.len + self.vacant.len() + 1);
    }
}

// private methods
impl<'id, T> List<'id, T> {
    fn from_ring(ring: Ring<T>) -> Self {
        Self {
            ring: GhostCell::new(ring),
        }
    }

    pub(crate) fn ring<'a>(&'a self, token: &'a GhostToken<'id>) -> &'a Ring<T> {
        self.ring.borrow(token)
    }

    pub(crate) fn ring_mut<'a>(&'a self, token: &'a mut GhostToken<'id>) -> &'a mut Ring<T> {
        self.ring.borrow_mut(token)
    }
}

impl<'id, T> List<'id, T> {
    /// Create an empty `List`.
    ///
    /// # Examples
    /// ```
    /// use cursor_list::{GhostToken, List};
    ///
    /// GhostToken::new(|token| {
    ///     let list: List<u32> = List::new();
    ///     assert!(list.is_empty(&token));
    /// });
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::from_ring(Ring::new())
    }

    /// Returns the number of elements in the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self, token: &GhostToken<'id>) -> usize {
        self.ring(token).len()
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self, token: &GhostToken<'id>) -> bool {
        self.ring(token).front() == NodeId::GHOST
    }

    /// Returns the modification count of the `List`.
    ///
    /// The count grows by one for every insertion or removal. Replacing an
    /// element in place leaves it unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{GhostToken, List};
    ///
    /// GhostToken::new(|mut token| {
    ///     let list = List::new();
    ///     let before = list.mod_count(&token);
    ///
    ///     let mut cursor = list.cursor_start(&token);
    ///     cursor.add(1, &mut token).unwrap();
    ///     assert_eq!(list.mod_count(&token), before + 1);
    ///
    ///     cursor.previous(&token).unwrap();
    ///     cursor.set(2, &mut token).unwrap();
    ///     assert_eq!(list.mod_count(&token), before + 1);
    /// });
    /// ```
    #[inline]
    pub fn mod_count(&self, token: &GhostToken<'id>) -> u64 {
        self.ring(token).mod_count()
    }

    /// Provides a reference to the front element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn front<'a>(&'a self, token: &'a GhostToken<'id>) -> Option<&'a T> {
        let ring = self.ring(token);
        ring.element(ring.front())
    }

    /// Provides a reference to the back element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn back<'a>(&'a self, token: &'a GhostToken<'id>) -> Option<&'a T> {
        let ring = self.ring(token);
        ring.element(ring.back())
    }

    /// Provides a cursor positioned before the first element, synchronized
    /// to the current modification count of the list.
    ///
    /// The token is only borrowed for the call; the cursor itself holds a
    /// shared reference to the list, so several cursors can coexist.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{GhostToken, List};
    ///
    /// GhostToken::new(|token| {
    ///     let list = List::from_iter([1, 2, 3]);
    ///     let mut cursor = list.cursor_start(&token);
    ///     assert_eq!(cursor.previous_index(&token), Ok(None));
    ///     assert_eq!(cursor.next(&token), Ok(&1));
    /// });
    /// ```
    pub fn cursor_start<'a>(&'a self, token: &GhostToken<'id>) -> Cursor<'a, 'id, T> {
        Cursor::new(self, self.ring(token), NodeId::GHOST, 0)
    }

    /// Provides a cursor positioned after the last element, synchronized to
    /// the current modification count of the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{GhostToken, List};
    ///
    /// GhostToken::new(|token| {
    ///     let list = List::from_iter([1, 2, 3]);
    ///     let mut cursor = list.cursor_end(&token);
    ///     assert_eq!(cursor.next_index(&token), Ok(3));
    ///     assert_eq!(cursor.previous(&token), Ok(&3));
    /// });
    /// ```
    pub fn cursor_end<'a>(&'a self, token: &GhostToken<'id>) -> Cursor<'a, 'id, T> {
        let ring = self.ring(token);
        Cursor::new(self, ring, ring.back(), ring.len())
    }

    /// Provides a forward iterator over the elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{GhostToken, List};
    ///
    /// GhostToken::new(|token| {
    ///     let list = List::from_iter([0, 1, 2]);
    ///     let mut iter = list.iter(&token);
    ///     assert_eq!(iter.next(), Some(&0));
    ///     assert_eq!(iter.next_back(), Some(&2));
    ///     assert_eq!(iter.next(), Some(&1));
    ///     assert_eq!(iter.next(), None);
    /// });
    /// ```
    #[inline]
    pub fn iter<'a>(&'a self, token: &'a GhostToken<'id>) -> Iter<'a, T> {
        Iter::new(self.ring(token))
    }
}

impl<'id, T> Default for List<'id, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'id, T> FromIterator<T> for List<'id, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ring = Ring::new();
        for element in iter {
            ring.push_back(element);
        }
        Self::from_ring(ring)
    }
}

impl<'id, T> IntoIterator for List<'id, T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the list into an iterator yielding elements by value.
    ///
    /// No token is needed: owning the list rules out any live cursor.
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.ring.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use crate::list::{List, NodeId};
    use ghost_cell::GhostToken;
    use std::cell::RefCell;

    #[test]
    fn list_create() {
        GhostToken::new(|token| {
            let list = List::<i32>::new();
            assert!(list.is_empty(&token));
            assert_eq!(list.len(&token), 0);
            assert_eq!(list.mod_count(&token), 0);
            assert_eq!(list.front(&token), None);
            assert_eq!(list.back(&token), None);

            let ring = list.ring(&token);
            assert_eq!(ring.front(), NodeId::GHOST);
            assert_eq!(ring.back(), NodeId::GHOST);
            ring.assert_well_formed();
        });
    }

    #[test]
    fn list_from_iter() {
        GhostToken::new(|token| {
            let list = List::from_iter([1, 2, 3]);
            assert!(!list.is_empty(&token));
            assert_eq!(list.len(&token), 3);
            assert_eq!(list.front(&token), Some(&1));
            assert_eq!(list.back(&token), Some(&3));
            assert_eq!(list.iter(&token).copied().collect::<Vec<_>>(), [1, 2, 3]);
            list.ring(&token).assert_well_formed();
        });
    }

    #[test]
    fn list_drop() {
        #[derive(Debug)]
        struct DropChecker<'a, T: Copy> {
            value: T,
            dropped: &'a RefCell<Vec<T>>,
        }
        impl<'a, T: Copy> DropChecker<'a, T> {
            fn new(value: T, dropped: &'a RefCell<Vec<T>>) -> Self {
                Self { value, dropped }
            }
        }
        impl<'a, T: Copy> Drop for DropChecker<'a, T> {
            fn drop(&mut self) {
                self.dropped.borrow_mut().push(self.value);
            }
        }
        let dropped = RefCell::new(Vec::<i32>::new());
        GhostToken::new(|mut token| {
            let list = List::from_iter([
                DropChecker::new(1, &dropped),
                DropChecker::new(2, &dropped),
                DropChecker::new(3, &dropped),
            ]);
            let mut cursor = list.cursor_start(&token);
            assert!(cursor.next(&token).is_ok());
            let removed = cursor.remove(&mut token).map(|checker| checker.value);
            assert_eq!(removed, Ok(1));
            assert_eq!(dropped.borrow().as_slice(), &[1]);
            drop(list);
        });
        assert_eq!(dropped.borrow().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn ring_attach_and_detach() {
        GhostToken::new(|mut token| {
            let list = List::new();
            let ring = list.ring_mut(&mut token);
            let a = ring.attach(NodeId::GHOST, NodeId::GHOST, 'a');
            let c = ring.attach(a, NodeId::GHOST, 'c');
            let b = ring.attach(a, c, 'b');
            ring.assert_well_formed();
            assert_eq!(ring.len(), 3);
            assert_eq!(ring.mod_count(), 3);
            assert_eq!(ring.next_of(a), b);
            assert_eq!(ring.prev_of(c), b);

            assert_eq!(ring.detach(NodeId::GHOST), None);
            assert_eq!(ring.mod_count(), 3);

            assert_eq!(ring.detach(b), Some('b'));
            assert_eq!(ring.detach(b), None);
            ring.assert_well_formed();
            assert_eq!(ring.next_of(a), c);
            assert_eq!(ring.len(), 2);
            assert_eq!(ring.mod_count(), 4);

            assert_eq!(list.iter(&token).collect::<String>(), "ac");
        });
    }

    #[test]
    fn ring_reuses_vacant_slots() {
        GhostToken::new(|mut token| {
            let list = List::from_iter(0..4);
            let ring = list.ring_mut(&mut token);
            assert_eq!(ring.nodes.len(), 5);

            assert_eq!(ring.pop_front(), Some(0));
            assert_eq!(ring.pop_back(), Some(3));
            ring.push_back(4);
            ring.push_back(5);
            ring.assert_well_formed();
            assert_eq!(ring.nodes.len(), 5);
            assert!(ring.vacant.is_empty());

            ring.push_back(6);
            assert_eq!(ring.nodes.len(), 6);
            assert_eq!(list.iter(&token).copied().collect::<Vec<_>>(), [1, 2, 4, 5, 6]);
        });
    }

    #[test]
    fn list_default_is_empty() {
        GhostToken::new(|token| {
            let list: List<String> = Default::default();
            assert!(list.is_empty(&token));
            assert!(!list.cursor_start(&token).has_next(&token).unwrap());
        });
    }
}
