//! This crate provides a circular doubly-linked list with fail-fast,
//! bidirectional list cursors.
//!
//! The [`List`] allows inserting and removing elements at the position of a
//! [`Cursor`] in constant time. All changes to the list go through a cursor,
//! and a cursor refuses to work once the list has been structurally changed by
//! anyone else.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use cursor_list::{Error, GhostToken, List};
//!
//! GhostToken::new(|mut token| {
//!     let list = List::from_iter([10, 20, 30]);
//!     let mut cursor = list.cursor_start(&token);
//!
//!     assert_eq!(cursor.next(&token), Ok(&10));
//!     assert_eq!(cursor.next(&token), Ok(&20));
//!     assert_eq!(cursor.set(99, &mut token), Ok(20)); // [10, 99, 30]
//!     assert_eq!(cursor.remove(&mut token), Ok(99)); // [10, 30]
//!     assert_eq!(cursor.previous_index(&token), Ok(Some(0)));
//!     assert_eq!(cursor.remove(&mut token), Err(Error::IllegalState));
//!
//!     assert_eq!(list.len(&token), 2);
//!     assert_eq!(list.iter(&token).copied().collect::<Vec<_>>(), [10, 30]);
//! });
//! ```
//!
//! # Memory Layout
//!
//! The nodes of a list live in an arena and link to each other by index.
//! Slot 0 of the arena is always the ghost node:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) slot 0  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢   Element 2, 3, ...    ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        ├───────────┤
//! │  ║ element T ║           ║ element T ║                        ┊No element ┊
//! │  ╚═══════════╝           ╚═══════════╝                        └╌╌╌╌╌╌╌╌╌╌╌┘
//! │    Element 0               Element 1                              ↑
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Initially, the ghost node of an empty list links to itself in both
//! directions. As elements are inserted, `ghost.next` is the first element
//! and `ghost.prev` the last one. Slots of removed elements are kept on a free
//! list and reused by later insertions.
//!
//! The whole arena sits in a [`GhostCell`](ghost_cell::GhostCell) branded by a
//! [`GhostToken`]. Reading the list borrows the token immutably, changing it
//! borrows the token mutably. This is what allows several cursors to be alive
//! on the same list at once.
//!
//! # Cursors
//!
//! A [`Cursor`] sits in the gap between two adjacent elements. In a list with
//! length *n* there are *n* + 1 gaps, indexed by 0, 1, ..., *n*.
//! [`List::cursor_start`] creates a cursor at gap 0 and [`List::cursor_end`]
//! one at gap *n*.
//!
//! - [`next`] and [`previous`]: step over an element and return it;
//! - [`add`]: insert an element into the gap, before the cursor;
//! - [`remove`]: remove the element returned by the last step;
//! - [`set`]: replace the element returned by the last step.
//!
//! Unlike the cursors of most lists, the cursor does not wrap around the ghost
//! node: stepping past either end fails with [`Error::NoSuchElement`].
//!
//! # Fail-fast Cursors
//!
//! The list counts its structural changes (insertions and removals). Every
//! cursor remembers the count it last saw and checks it before each
//! operation, so once any cursor inserts or removes an element, all the other
//! cursors fail with [`Error::ConcurrentModification`].
//!
//! ```
//! use cursor_list::{Error, GhostToken, List};
//!
//! GhostToken::new(|mut token| {
//!     let list = List::from_iter([1, 2, 3]);
//!     let a = list.cursor_start(&token);
//!     let mut b = list.cursor_start(&token);
//!
//!     b.add(0, &mut token).unwrap();
//!     assert_eq!(b.next(&token), Ok(&1));
//!     assert!(matches!(
//!         a.has_next(&token),
//!         Err(Error::ConcurrentModification { .. })
//!     ));
//! });
//! ```
//!
//! [`next`]: crate::list::cursor::Cursor::next
//! [`previous`]: crate::list::cursor::Cursor::previous
//! [`add`]: crate::list::cursor::Cursor::add
//! [`remove`]: crate::list::cursor::Cursor::remove
//! [`set`]: crate::list::cursor::Cursor::set

#[doc(inline)]
pub use error::{Error, Result};
#[doc(no_inline)]
pub use ghost_cell::GhostToken;
#[doc(inline)]
pub use list::cursor::Cursor;
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use list::List;

mod error;
pub mod list;
