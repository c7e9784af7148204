#![forbid(unsafe_code)]

//! Order-sequence helpers.
//!
//! The engine mutates container orders exclusively through these functions,
//! and hosts use the same functions to mirror a [`DropSummary`] onto their own
//! data arrays:
//!
//! ```
//! use dragsort::order::{move_item, transfer_item};
//!
//! let mut todo = vec!["wash", "dry", "fold"];
//! move_item(&mut todo, 2, 0);
//! assert_eq!(todo, ["fold", "wash", "dry"]);
//!
//! let mut done = Vec::new();
//! transfer_item(&mut todo, &mut done, 0, 0);
//! assert_eq!(todo, ["wash", "dry"]);
//! assert_eq!(done, ["fold"]);
//! ```
//!
//! Indices are clamped into range instead of panicking, so a stale index
//! from the host degrades to "move to the nearest end".
//!
//! [`DropSummary`]: crate::event::DropSummary

/// Move the element at `from` to `to` within one slice.
///
/// Both indices are clamped to the last valid position. Elements in between
/// shift by one toward the vacated slot.
pub fn move_item<T>(items: &mut [T], from: usize, to: usize) {
    let Some(last) = items.len().checked_sub(1) else {
        return;
    };
    let from = from.min(last);
    let to = to.min(last);
    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    }
}

/// Move the element at `from` in `source` to index `to` in `target`.
///
/// `from` is clamped to the last element of `source`, `to` to the length of
/// `target` (so an out-of-range `to` appends). Returns `false` when `source`
/// is empty and nothing moved.
pub fn transfer_item<T>(source: &mut Vec<T>, target: &mut Vec<T>, from: usize, to: usize) -> bool {
    let Some(last) = source.len().checked_sub(1) else {
        return false;
    };
    let value = source.remove(from.min(last));
    target.insert(to.min(target.len()), value);
    true
}

/// Clone the element at `from` in `source` into `target` at `to`.
///
/// Same clamping rules as [`transfer_item`]; `source` is left untouched.
pub fn copy_item<T: Clone>(source: &[T], target: &mut Vec<T>, from: usize, to: usize) -> bool {
    let Some(last) = source.len().checked_sub(1) else {
        return false;
    };
    target.insert(to.min(target.len()), source[from.min(last)].clone());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_forward_shifts_middle_back() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        move_item(&mut v, 0, 2);
        assert_eq!(v, ['b', 'c', 'a', 'd']);
    }

    #[test]
    fn move_backward_shifts_middle_forward() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        move_item(&mut v, 3, 1);
        assert_eq!(v, ['a', 'd', 'b', 'c']);
    }

    #[test]
    fn move_same_index_is_noop() {
        let mut v = vec![1, 2, 3];
        move_item(&mut v, 1, 1);
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn move_clamps_out_of_range() {
        let mut v = vec![1, 2, 3];
        move_item(&mut v, 0, 99);
        assert_eq!(v, [2, 3, 1]);
        move_item(&mut v, 42, 0);
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn move_on_empty_slice() {
        let mut v: Vec<u8> = Vec::new();
        move_item(&mut v, 0, 3);
        assert!(v.is_empty());
    }

    #[test]
    fn transfer_appends_when_target_index_too_large() {
        let mut a = vec![1, 2];
        let mut b = vec![9];
        assert!(transfer_item(&mut a, &mut b, 0, 10));
        assert_eq!(a, [2]);
        assert_eq!(b, [9, 1]);
    }

    #[test]
    fn transfer_from_empty_source() {
        let mut a: Vec<u8> = Vec::new();
        let mut b = vec![1];
        assert!(!transfer_item(&mut a, &mut b, 0, 0));
        assert_eq!(b, [1]);
    }

    #[test]
    fn copy_leaves_source_intact() {
        let a = vec!["x", "y"];
        let mut b = vec!["z"];
        assert!(copy_item(&a, &mut b, 1, 0));
        assert_eq!(a, ["x", "y"]);
        assert_eq!(b, ["y", "z"]);
    }
}
