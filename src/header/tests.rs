use crate::alloc::boxed::Box;
use crate::alloc::format;
use crate::alloc::string::{String, ToString};
use crate::alloc::vec::Vec;
use core::cell::Cell;
use core::mem;

use crate::raw::ReserveError;
use crate::{small_vec, Header, RangeError, SmallVec};

/// Element that counts clones and drops, to check the relocation paths
/// never touch either.
#[derive(Debug, PartialEq, Eq)]
struct Counted<'a> {
    value: usize,
    clones: &'a Cell<usize>,
    drops: &'a Cell<usize>,
}

impl<'a> Counted<'a> {
    fn new(value: usize, clones: &'a Cell<usize>, drops: &'a Cell<usize>) -> Self {
        Self {
            value,
            clones,
            drops,
        }
    }
}

impl Clone for Counted<'_> {
    fn clone(&self) -> Self {
        self.clones.set(self.clones.get() + 1);
        Self { ..*self }
    }
}

impl Drop for Counted<'_> {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn observers() {
    let mut v = SmallVec::<u8, 7>::new();
    assert_eq!(v.len(), 0);
    assert!(v.is_empty());
    assert!(v.is_inline());
    assert_eq!(v.capacity(), 7);
    assert_eq!(v.inline_capacity(), 7);
    assert_eq!(v.spare_capacity_mut().len(), 7);

    v.push(1);
    assert_eq!(v.len(), 1);
    assert!(!v.is_empty());
    assert_eq!(v.as_slice(), &[1]);
    assert_eq!(&v[..], &[1]);

    assert_eq!(v.max_len(), isize::MAX as usize);
    assert_eq!(SmallVec::<u64, 2>::new().max_len(), isize::MAX as usize / 8);
    assert_eq!(SmallVec::<(), 2>::new().max_len(), usize::MAX);
}

#[test]
fn inline_capacity_survives_erasure() {
    fn probe(v: &Header<u8>) -> usize {
        v.inline_capacity()
    }
    assert_eq!(probe(&SmallVec::<u8, 2>::new()), 2);
    assert_eq!(probe(&SmallVec::<u8, 31>::new()), 31);
    assert_eq!(probe(&SmallVec::<u8, 0>::new()), 0);
}

#[test]
fn push_growth_policy() {
    let mut v = SmallVec::<usize, 4>::new();
    for i in 0..4 {
        v.push(i);
        assert!(v.is_inline());
        assert_eq!(v.capacity(), 4);
    }

    v.push(4);
    assert!(!v.is_inline());
    assert_eq!(v.capacity(), 8);
    assert_eq!(v, [0, 1, 2, 3, 4]);

    for i in 5..8 {
        v.push(i);
    }
    assert_eq!(v.capacity(), 8);
    v.push(8);
    assert_eq!(v.capacity(), 16);
    assert_eq!(v, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn growth_neither_clones_nor_drops() {
    let clones = Cell::new(0);
    let drops = Cell::new(0);

    let mut v = SmallVec::<Counted<'_>, 2>::new();
    for i in 0..100 {
        v.push(Counted::new(i, &clones, &drops));
    }
    assert_eq!(clones.get(), 0);
    assert_eq!(drops.get(), 0);
    assert_eq!(v.len(), 100);
    assert!(v.iter().enumerate().all(|(i, c)| c.value == i));

    drop(v);
    assert_eq!(clones.get(), 0);
    assert_eq!(drops.get(), 100);
}

#[test]
fn reserve() {
    let mut v = SmallVec::<u8, 4>::new();
    v.reserve(2);
    assert!(v.is_inline());

    // an explicit reserve jumps straight to the requested size
    v.reserve(100);
    assert!(!v.is_inline());
    assert_eq!(v.capacity(), 100);

    v.extend_from_slice(b"hello");
    let cap = v.capacity();
    v.reserve(1);
    assert_eq!(v.capacity(), cap);
}

#[test]
fn try_reserve_overflow() {
    let mut v = SmallVec::<u32, 4>::new();
    v.push(42);

    assert_eq!(
        v.try_reserve(usize::MAX),
        Err(ReserveError::CapacityOverflow)
    );
    assert_eq!(
        v.try_reserve(isize::MAX as usize),
        Err(ReserveError::CapacityOverflow)
    );
    assert_eq!(v, [42]);
    assert!(v.is_inline());

    assert_eq!(v.try_reserve(10), Ok(()));
    assert!(v.capacity() >= 11);
}

#[test]
#[should_panic(expected = "capacity overflow")]
fn reserve_overflow_panics() {
    let mut v = SmallVec::<u32, 4>::new();
    v.reserve(usize::MAX);
}

#[test]
fn pop() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3];
    assert_eq!(v.pop(), Some(3));
    assert_eq!(v.pop(), Some(2));
    assert_eq!(v.pop(), Some(1));
    assert_eq!(v.pop(), None);
    assert_eq!(v.pop(), None);
}

#[test]
fn insert() {
    let mut v = SmallVec::<i32, 2>::new();
    v.insert(0, 3);
    v.insert(0, 1);
    v.insert(1, 2);
    v.insert(3, 4);
    assert_eq!(v, [1, 2, 3, 4]);
    assert!(!v.is_inline());
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn insert_out_of_bounds() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2];
    v.insert(3, 0);
}

#[test]
fn insert_from_slice() {
    let mut v: SmallVec<String, 2> = small_vec!["a".to_string(), "d".to_string()];
    v.insert_from_slice(1, &["b".to_string(), "c".to_string()]);
    assert_eq!(v, ["a", "b", "c", "d"]);

    v.insert_from_slice(4, &["e".to_string()]);
    assert_eq!(v, ["a", "b", "c", "d", "e"]);

    v.insert_from_slice(0, &[]);
    assert_eq!(v.len(), 5);
}

#[test]
fn insert_fill() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 5];
    v.insert_fill(1, 3, 0);
    assert_eq!(v, [1, 0, 0, 0, 5]);

    v.insert_fill(0, 0, 9);
    assert_eq!(v, [1, 0, 0, 0, 5]);
}

#[test]
fn insert_many() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 9];
    // filtered iterator, the length is unknown up front
    v.insert_many(1, (2..=8).filter(|i| i % 2 == 0));
    assert_eq!(v, [1, 2, 4, 6, 8, 9]);

    v.insert_many(0, core::iter::empty());
    assert_eq!(v, [1, 2, 4, 6, 8, 9]);

    let mut v = SmallVec::<Box<i32>, 2>::new();
    v.push(Box::new(1));
    v.push(Box::new(4));
    v.insert_many(1, [Box::new(2), Box::new(3)]);
    assert_eq!(v.iter().map(|b| **b).collect::<Vec<_>>(), [1, 2, 3, 4]);
}

#[test]
fn remove() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3, 4];
    assert_eq!(v.remove(1), 2);
    assert_eq!(v, [1, 3, 4]);
    assert_eq!(v.remove(2), 4);
    assert_eq!(v, [1, 3]);
    assert_eq!(v.remove(0), 1);
    assert_eq!(v.remove(0), 3);
    assert!(v.is_empty());
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn remove_out_of_bounds() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2];
    let _ = v.remove(2);
}

#[test]
fn swap_remove() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3, 4];
    assert_eq!(v.swap_remove(0), 1);
    assert_eq!(v, [4, 2, 3]);
    assert_eq!(v.swap_remove(2), 3);
    assert_eq!(v, [4, 2]);
}

#[test]
fn truncate_and_clear() {
    let drops = Cell::new(0);
    let clones = Cell::new(0);

    let mut v = SmallVec::<Counted<'_>, 2>::new();
    for i in 0..10 {
        v.push(Counted::new(i, &clones, &drops));
    }

    v.truncate(10);
    v.truncate(11);
    assert_eq!(drops.get(), 0);

    v.truncate(7);
    assert_eq!(drops.get(), 3);
    assert_eq!(v.len(), 7);
    let cap = v.capacity();
    assert_eq!(cap, 16);

    v.clear();
    assert_eq!(drops.get(), 10);
    assert!(v.is_empty());
    // clearing does not release the allocation
    assert_eq!(v.capacity(), cap);
    assert!(!v.is_inline());
}

#[test]
fn resize() {
    let mut v = SmallVec::<i32, 4>::new();
    v.resize(3, 7);
    assert_eq!(v, [7, 7, 7]);
    assert!(v.is_inline());

    v.resize(6, 8);
    assert_eq!(v, [7, 7, 7, 8, 8, 8]);
    assert!(!v.is_inline());

    v.resize(2, 9);
    assert_eq!(v, [7, 7]);
    v.resize(0, 0);
    assert!(v.is_empty());
}

#[test]
fn resize_with() {
    let mut v = SmallVec::<i32, 4>::new();
    let mut next = 0;
    v.resize_with(5, || {
        next += 1;
        next
    });
    assert_eq!(v, [1, 2, 3, 4, 5]);

    v.resize_with(2, || unreachable!());
    assert_eq!(v, [1, 2]);
}

#[test]
fn extend_from_slice() {
    let mut v = SmallVec::<u8, 4>::new();
    v.extend_from_slice(b"ab");
    assert!(v.is_inline());
    v.extend_from_slice(b"cdef");
    assert!(!v.is_inline());
    assert_eq!(v, *b"abcdef");
}

#[test]
fn assign() {
    let clones = Cell::new(0);
    let drops = Cell::new(0);

    let mut a = SmallVec::<Counted<'_>, 4>::new();
    for i in 0..3 {
        a.push(Counted::new(i, &clones, &drops));
    }
    let mut b = SmallVec::<Counted<'_>, 8>::new();
    for i in 10..12 {
        b.push(Counted::new(i, &clones, &drops));
    }

    // the surplus is dropped, the shared prefix is overwritten in place
    a.assign(&b);
    assert_eq!(drops.get(), 3);
    assert_eq!(clones.get(), 2);
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].value, 10);
    assert_eq!(a[1].value, 11);
    assert!(a.is_inline());
}

#[test]
fn assign_growing() {
    let mut a: SmallVec<i32, 2> = small_vec![1];
    let b: SmallVec<i32, 4> = small_vec![5, 6, 7, 8];
    a.assign(&b);
    assert_eq!(a, [5, 6, 7, 8]);
    assert_eq!(b, [5, 6, 7, 8]);
}

#[test]
fn assign_fill() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2];
    v.assign_fill(5, 0);
    assert_eq!(v, [0, 0, 0, 0, 0]);
    v.assign_fill(0, 1);
    assert!(v.is_empty());
}

#[test]
fn assign_from_slice() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3];
    v.assign_from_slice(&[8, 9]);
    assert_eq!(v, [8, 9]);
}

#[test]
fn assign_from_iter() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3];
    v.assign_from_iter(10..13);
    assert_eq!(v, [10, 11, 12]);
}

#[test]
fn swap_both_heap_is_pointer_exchange() {
    let mut a = SmallVec::<i32, 2>::from_slice(&[1, 2, 3, 4]);
    let mut b = SmallVec::<i32, 4>::from_slice(&[5, 6, 7, 8, 9]);
    assert!(!a.is_inline() && !b.is_inline());

    let a_data = a.as_ptr();
    let b_data = b.as_ptr();

    a.swap(&mut b);
    assert_eq!(a, [5, 6, 7, 8, 9]);
    assert_eq!(b, [1, 2, 3, 4]);
    // the elements did not move
    assert_eq!(a.as_ptr(), b_data);
    assert_eq!(b.as_ptr(), a_data);
}

#[test]
fn swap_inline() {
    let mut a = SmallVec::<i32, 4>::from_slice(&[1, 2, 3]);
    let mut b = SmallVec::<i32, 8>::from_slice(&[9]);
    a.swap(&mut b);
    assert_eq!(a, [9]);
    assert_eq!(b, [1, 2, 3]);
    assert!(a.is_inline());
    assert!(b.is_inline());

    // swap back through the other operand
    b.swap(&mut a);
    assert_eq!(a, [1, 2, 3]);
    assert_eq!(b, [9]);
}

#[test]
fn swap_mixed() {
    let mut a = SmallVec::<i32, 2>::from_slice(&[1, 2, 3, 4, 5]);
    let mut b = SmallVec::<i32, 8>::from_slice(&[6]);
    assert!(!a.is_inline() && b.is_inline());

    a.swap(&mut b);
    assert_eq!(a, [6]);
    assert_eq!(b, [1, 2, 3, 4, 5]);
}

#[test]
fn swap_with_self_sized_peers() {
    let drops = Cell::new(0);
    let clones = Cell::new(0);

    let mut a = SmallVec::<Counted<'_>, 4>::new();
    a.push(Counted::new(1, &clones, &drops));
    let mut b = SmallVec::<Counted<'_>, 4>::new();
    b.push(Counted::new(2, &clones, &drops));
    b.push(Counted::new(3, &clones, &drops));

    a.swap(&mut b);
    assert_eq!(clones.get(), 0);
    assert_eq!(drops.get(), 0);
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 1);
    assert_eq!(a[0].value, 2);
    assert_eq!(b[0].value, 1);
}

#[test]
fn take_from_steals_heap_allocation() {
    let mut a = SmallVec::<i32, 4>::from_slice(&[1, 2]);
    let mut b = SmallVec::<i32, 2>::from_slice(&[7, 8, 9]);
    assert!(!b.is_inline());
    let b_data = b.as_ptr();

    a.take_from(&mut b);
    assert_eq!(a, [7, 8, 9]);
    assert_eq!(a.as_ptr(), b_data);
    assert!(b.is_empty());
    assert!(b.is_inline());
    assert_eq!(b.capacity(), 2);

    // the source is reusable
    b.push(42);
    assert_eq!(b, [42]);
}

#[test]
fn take_from_inline_source() {
    let drops = Cell::new(0);
    let clones = Cell::new(0);

    let mut a = SmallVec::<Counted<'_>, 4>::new();
    a.push(Counted::new(0, &clones, &drops));
    let mut b = SmallVec::<Counted<'_>, 4>::new();
    b.push(Counted::new(1, &clones, &drops));
    b.push(Counted::new(2, &clones, &drops));

    a.take_from(&mut b);
    // a's old element dropped, b's elements moved without cloning
    assert_eq!(drops.get(), 1);
    assert_eq!(clones.get(), 0);
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].value, 1);
    assert!(b.is_empty());
}

#[test]
fn shrink_to_fit() {
    let mut v = SmallVec::<i32, 2>::new();

    // inline: no-op
    v.push(1);
    v.shrink_to_fit();
    assert!(v.is_inline());
    assert_eq!(v.capacity(), 2);

    // heap, partially filled: exact reallocation
    v.extend_from_slice(&[2, 3, 4, 5]);
    assert_eq!(v.capacity(), 5);
    v.reserve(10);
    assert_eq!(v.capacity(), 15);
    v.shrink_to_fit();
    assert!(!v.is_inline());
    assert_eq!(v.capacity(), 5);
    assert_eq!(v, [1, 2, 3, 4, 5]);

    // already exact: idempotent
    let data = v.as_ptr();
    v.shrink_to_fit();
    assert_eq!(v.as_ptr(), data);
    assert_eq!(v.capacity(), 5);

    // emptied: back to inline
    v.clear();
    v.shrink_to_fit();
    assert!(v.is_inline());
    assert_eq!(v.capacity(), 2);
}

#[test]
fn drain() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3, 4, 5];
    let drained: Vec<i32> = v.drain(1..4).collect();
    assert_eq!(drained, [2, 3, 4]);
    assert_eq!(v, [1, 5]);

    let drained: Vec<i32> = v.drain(..).collect();
    assert_eq!(drained, [1, 5]);
    assert!(v.is_empty());
}

#[test]
fn drain_rev_and_partial() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3, 4, 5];
    {
        let mut drain = v.drain(1..4);
        assert_eq!(drain.size_hint(), (3, Some(3)));
        assert_eq!(drain.next(), Some(2));
        assert_eq!(drain.next_back(), Some(4));
        assert_eq!(drain.as_slice(), &[3]);
        // the rest is dropped with the iterator
    }
    assert_eq!(v, [1, 5]);
}

#[test]
fn drain_drops_undrained() {
    let drops = Cell::new(0);
    let clones = Cell::new(0);

    let mut v = SmallVec::<Counted<'_>, 4>::new();
    for i in 0..6 {
        v.push(Counted::new(i, &clones, &drops));
    }

    let mut drain = v.drain(1..5);
    let first = drain.next();
    assert_eq!(first.as_ref().map(|c| c.value), Some(1));
    drop(first);
    assert_eq!(drops.get(), 1);
    drop(drain);
    assert_eq!(drops.get(), 4);

    assert_eq!(v.len(), 2);
    assert_eq!(v[0].value, 0);
    assert_eq!(v[1].value, 5);
}

#[test]
fn drain_leak() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3, 4, 5];
    let mut drain = v.drain(1..3);
    assert_eq!(drain.next(), Some(2));
    mem::forget(drain);

    // leaked, not broken: the undrained elements and the tail are lost
    assert_eq!(v, [1]);
    v.push(6);
    assert_eq!(v, [1, 6]);
}

#[test]
fn drain_bad_ranges() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3];

    let err = v.try_drain(2..1).unwrap_err();
    assert_eq!(err, RangeError::StartGreaterThanEnd { start: 2, end: 1 });

    let err = v.try_drain(1..7).unwrap_err();
    assert_eq!(err, RangeError::EndOutOfBounds { end: 7, len: 3 });

    assert_eq!(v, [1, 2, 3]);
}

#[test]
#[should_panic(expected = "end index 7 is out of bounds for length 3")]
fn drain_out_of_bounds() {
    let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3];
    let _ = v.drain(1..7);
}

#[test]
fn extend() {
    let mut v = SmallVec::<i32, 4>::new();
    v.extend(0..3);
    v.extend([3, 4].iter());
    assert_eq!(v, [0, 1, 2, 3, 4]);
}

#[test]
fn set_len_spare_capacity() {
    let mut v = SmallVec::<u8, 8>::new();
    let spare = v.spare_capacity_mut();
    spare[0].write(1);
    spare[1].write(2);
    // SAFETY: the first two slots were just written
    unsafe { v.set_len(2) };
    assert_eq!(v, [1, 2]);
}

#[test]
fn formatting_and_cmp() {
    let v: SmallVec<i32, 4> = small_vec![1, 2, 3];
    assert_eq!(format!("{v:?}"), "[1, 2, 3]");

    let w: SmallVec<i32, 8> = small_vec![1, 2, 4];
    assert!(*v < *w);
    assert!(v[..] < w[..]);
    assert_eq!(*v, [1, 2, 3]);
    assert_ne!(*v, *w);
}

#[test]
fn zst() {
    let mut v = SmallVec::<(), 2>::new();
    for _ in 0..100 {
        v.push(());
    }
    assert_eq!(v.len(), 100);
    assert!(!v.is_inline());
    assert_eq!(v.capacity(), usize::MAX);

    assert_eq!(v.pop(), Some(()));
    assert_eq!(v.len(), 99);

    v.truncate(10);
    assert_eq!(v.len(), 10);

    let drained: Vec<()> = v.drain(2..5).collect();
    assert_eq!(drained.len(), 3);
    assert_eq!(v.len(), 7);

    v.clear();
    v.shrink_to_fit();
    assert!(v.is_inline());
    assert_eq!(v.capacity(), 2);
}

#[test]
fn zst_swap_and_take() {
    let mut a = SmallVec::<(), 2>::from_elem((), 10);
    let mut b = SmallVec::<(), 4>::new();
    a.swap(&mut b);
    assert_eq!(a.len(), 0);
    assert_eq!(b.len(), 10);

    a.take_from(&mut b);
    assert_eq!(a.len(), 10);
    assert_eq!(b.len(), 0);
}

#[cfg(feature = "std")]
#[test]
fn panicking_clone_keeps_vector_coherent() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    struct Bomb(u8);
    impl Clone for Bomb {
        fn clone(&self) -> Self {
            assert!(self.0 != 3, "boom");
            Self(self.0)
        }
    }

    let mut v = SmallVec::<Bomb, 8>::new();
    v.push(Bomb(0));
    v.push(Bomb(9));

    let result = catch_unwind(AssertUnwindSafe(|| {
        v.insert_from_slice(1, &[Bomb(1), Bomb(2), Bomb(3), Bomb(4)]);
    }));
    assert!(result.is_err());

    // the clones made before the panic are kept, the tail is back in place
    let values: Vec<u8> = v.iter().map(|b| b.0).collect();
    assert_eq!(values, [0, 1, 2, 9]);

    // the vector is fully usable afterwards
    v.push(Bomb(5));
    assert_eq!(v.len(), 5);
}

#[cfg(feature = "std")]
#[test]
fn panicking_clone_during_resize() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    struct Bomb {
        id: u8,
        left: Cell<u8>,
    }
    impl Clone for Bomb {
        fn clone(&self) -> Self {
            let left = self.left.get();
            assert!(left != 0, "boom");
            self.left.set(left - 1);
            Self {
                id: self.id,
                left: Cell::new(0),
            }
        }
    }

    let mut v = SmallVec::<Bomb, 2>::new();
    v.push(Bomb {
        id: 7,
        left: Cell::new(0),
    });

    let result = catch_unwind(AssertUnwindSafe(|| {
        v.resize(
            5,
            Bomb {
                id: 8,
                left: Cell::new(2),
            },
        );
    }));
    assert!(result.is_err());

    // two clones succeeded before the panic
    assert_eq!(v.len(), 3);
    assert_eq!(v[0].id, 7);
    assert_eq!(v[1].id, 8);
    assert_eq!(v[2].id, 8);
}
