use crate::list::{NodeId, Ring};
use std::fmt;
use std::iter::FusedIterator;

/// An iterator over the elements of a `List`.
///
/// It uses a pair of nodes `start..end` to represent a half-open subrange
/// of the list, where `start` is inclusive and `end` is not.
///
/// The `Iter` borrows the `GhostToken` of the list immutably, so no cursor
/// can change the list while it is alive.
///
/// # Examples
///
/// ```compile_fail
/// use cursor_list::{GhostToken, List};
///
/// GhostToken::new(|mut token| {
///     let list = List::from_iter([1, 2, 3]);
///     let mut iter = list.iter(&token);
///     let mut cursor = list.cursor_start(&token);
///
///     // Won't compile, because the token is already borrowed immutably.
///     cursor.add(4, &mut token).unwrap();
///     println!("{:?}", iter.next());
/// });
/// ```
pub struct Iter<'a, T: 'a> {
    ring: &'a Ring<T>,
    start: NodeId,
    end: NodeId,
    len: usize,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(ring: &'a Ring<T>) -> Self {
        Self {
            ring,
            start: ring.front(),
            end: NodeId::GHOST,
            len: ring.len(),
        }
    }
}

impl<'a, T: 'a> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring,
            start: self.start,
            end: self.end,
            len: self.len,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_tuple("Iter");
        for element in self.clone() {
            f.field(element);
        }
        f.finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let current = self.ring.element(self.start)?;
        self.start = self.ring.next_of(self.start);
        self.len -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let back = self.ring.prev_of(self.end);
        let current = self.ring.element(back)?;
        self.end = back;
        self.len -= 1;
        Some(current)
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// An owning iterator over the elements of a `List`.
///
/// This `struct` is created by the `into_iter` method on `List`
/// (provided by the `IntoIterator` trait).
pub struct IntoIter<T> {
    ring: Ring<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(ring: Ring<T>) -> Self {
        Self { ring }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter")
            .field(&Iter::new(&self.ring))
            .finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.ring.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.ring.len(), Some(self.ring.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ring.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use crate::list::List;
    use ghost_cell::GhostToken;

    #[test]
    fn iter_both_ends() {
        GhostToken::new(|token| {
            let list = List::from_iter([1, 2, 3, 4]);
            let mut iter = list.iter(&token);
            assert_eq!(iter.len(), 4);
            assert_eq!(iter.next(), Some(&1));
            assert_eq!(iter.next_back(), Some(&4));
            assert_eq!(iter.len(), 2);
            assert_eq!(iter.next_back(), Some(&3));
            assert_eq!(iter.next(), Some(&2));
            assert_eq!(iter.next(), None);
            assert_eq!(iter.next_back(), None);
            assert_eq!(iter.next(), None);
        });
    }

    #[test]
    fn iter_rev_and_last() {
        GhostToken::new(|token| {
            let list = List::from_iter("abc".chars());
            assert_eq!(list.iter(&token).rev().collect::<String>(), "cba");
            assert_eq!(list.iter(&token).last(), Some(&'c'));
            assert_eq!(
                format!("{:?}", list.iter(&token)),
                "Iter('a', 'b', 'c')"
            );
        });
    }

    #[test]
    fn iter_empty() {
        GhostToken::new(|token| {
            let list = List::<u8>::new();
            let mut iter = list.iter(&token);
            assert_eq!(iter.size_hint(), (0, Some(0)));
            assert_eq!(iter.next(), None);
            assert_eq!(iter.next_back(), None);
        });
    }

    #[test]
    fn iter_sees_cursor_changes() {
        GhostToken::new(|mut token| {
            let list = List::from_iter([1, 2, 3]);
            let mut cursor = list.cursor_start(&token);
            cursor.next(&token).unwrap();
            cursor.remove(&mut token).unwrap();
            cursor.next(&token).unwrap();
            cursor.add(5, &mut token).unwrap();
            assert_eq!(list.iter(&token).copied().collect::<Vec<_>>(), [2, 5, 3]);
            assert_eq!(list.iter(&token).rev().copied().collect::<Vec<_>>(), [3, 5, 2]);
        });
    }

    #[test]
    fn into_iter_both_ends() {
        let list: List<'_, String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut iter = list.into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next_back().as_deref(), Some("c"));
        assert_eq!(iter.next().as_deref(), Some("a"));
        assert_eq!(format!("{:?}", iter), "IntoIter(Iter(\"b\"))");
        assert_eq!(iter.next().as_deref(), Some("b"));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
}
