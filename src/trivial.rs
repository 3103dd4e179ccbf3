//! Trivial relocatability marker trait.
//!
//! A type is *trivially relocatable* when moving a value to a new address is
//! semantically equivalent to copying its object representation bytes and
//! forgetting the source. In Rust this property is universal: a move **is** a
//! bitwise copy and no code can observe the old address afterwards. The trait
//! therefore holds for every type, and this crate's relocation engine (see
//! [`crate::raw`]) uses the byte-copy strategy unconditionally.
//!
//! The trait is still exposed as a queryable capability for generic raw
//! storage code layered on top of this crate, and to record the classic
//! derivation rules from languages with observable moves:
//!
//! * trivially movable and trivially destructible types (here: `Copy`-like
//!   primitives) are trivially relocatable;
//! * owning pointer types (`Box`, `Rc`, `Arc` and their weak counterparts)
//!   are trivially relocatable because their internal invariants do not
//!   depend on the address of the handle itself;
//! * composites of trivially relocatable types are trivially relocatable;
//! * any other type can opt in with an `unsafe impl`.

use crate::alloc::borrow::Cow;
use crate::alloc::boxed::Box;
use crate::alloc::rc::{self, Rc};
use crate::alloc::string::String;
use crate::alloc::sync::{self, Arc};
use crate::alloc::vec::Vec;
use core::cell::{Cell, RefCell, UnsafeCell};
use core::mem::{ManuallyDrop, MaybeUninit};
use core::num::{NonZeroI32, NonZeroI64, NonZeroIsize, NonZeroU32, NonZeroU64, NonZeroUsize};
use core::ptr::NonNull;

/// Marker trait for types whose values may be relocated by a plain byte copy.
///
/// # Safety
///
/// Implementors assert that copying the bytes of a value to a new location
/// and abandoning the original (without dropping it) yields a valid value.
/// Every Rust type satisfies this by language semantics, so implementing the
/// trait cannot by itself cause unsoundness in this crate; the `unsafe`
/// qualifier keeps the contract explicit for downstream code that may rely
/// on the property across FFI or custom storage schemes.
pub unsafe trait TriviallyRelocatable {}

macro_rules! trivially_relocatable {
    ($($ty:ty),+ $(,)?) => {
        $( unsafe impl TriviallyRelocatable for $ty {} )+
    };
}

trivially_relocatable! {
    (), bool, char,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64,
    String,
    NonZeroU32, NonZeroU64, NonZeroUsize,
    NonZeroI32, NonZeroI64, NonZeroIsize,
}

// Owning pointers: address-invariant internals.
unsafe impl<T: ?Sized> TriviallyRelocatable for Box<T> {}
unsafe impl<T: ?Sized> TriviallyRelocatable for Rc<T> {}
unsafe impl<T: ?Sized> TriviallyRelocatable for rc::Weak<T> {}
unsafe impl<T: ?Sized> TriviallyRelocatable for Arc<T> {}
unsafe impl<T: ?Sized> TriviallyRelocatable for sync::Weak<T> {}

// References and raw pointers point away from themselves.
unsafe impl<T: ?Sized> TriviallyRelocatable for &T {}
unsafe impl<T: ?Sized> TriviallyRelocatable for &mut T {}
unsafe impl<T: ?Sized> TriviallyRelocatable for *const T {}
unsafe impl<T: ?Sized> TriviallyRelocatable for *mut T {}
unsafe impl<T: ?Sized> TriviallyRelocatable for NonNull<T> {}

// Composite lifts.
unsafe impl<T: TriviallyRelocatable> TriviallyRelocatable for Option<T> {}
unsafe impl<T: TriviallyRelocatable, E: TriviallyRelocatable> TriviallyRelocatable for Result<T, E> {}
unsafe impl<T: TriviallyRelocatable, const N: usize> TriviallyRelocatable for [T; N] {}
unsafe impl<T: TriviallyRelocatable> TriviallyRelocatable for ManuallyDrop<T> {}
unsafe impl<T: TriviallyRelocatable> TriviallyRelocatable for MaybeUninit<T> {}
unsafe impl<T: TriviallyRelocatable> TriviallyRelocatable for Cell<T> {}
unsafe impl<T: TriviallyRelocatable> TriviallyRelocatable for RefCell<T> {}
unsafe impl<T: TriviallyRelocatable> TriviallyRelocatable for UnsafeCell<T> {}

unsafe impl<A: TriviallyRelocatable> TriviallyRelocatable for (A,) {}
unsafe impl<A: TriviallyRelocatable, B: TriviallyRelocatable> TriviallyRelocatable for (A, B) {}
unsafe impl<A: TriviallyRelocatable, B: TriviallyRelocatable, C: TriviallyRelocatable>
    TriviallyRelocatable for (A, B, C)
{
}

// Containers that own their elements through a heap pointer.
unsafe impl<T> TriviallyRelocatable for Vec<T> {}
unsafe impl<T: Clone + TriviallyRelocatable> TriviallyRelocatable for Cow<'_, [T]> {}

unsafe impl<T, const N: usize> TriviallyRelocatable for crate::SmallVec<T, N> {}

#[cfg(test)]
mod tests {
    use crate::alloc::boxed::Box;
    use crate::alloc::rc::Rc;
    use crate::alloc::string::String;
    use crate::alloc::sync::Arc;
    use crate::alloc::vec::Vec;

    use super::TriviallyRelocatable;
    use crate::SmallVec;

    const fn assert_relocatable<T: TriviallyRelocatable>() {}

    #[test]
    fn derivation() {
        assert_relocatable::<u8>();
        assert_relocatable::<(u32, f64)>();
        assert_relocatable::<[Option<char>; 7]>();

        assert_relocatable::<Box<String>>();
        assert_relocatable::<Rc<[u8]>>();
        assert_relocatable::<Arc<str>>();

        assert_relocatable::<Vec<Box<u8>>>();
        assert_relocatable::<SmallVec<Box<u8>, 4>>();
    }

    #[test]
    fn opt_in() {
        struct WithDrop(#[allow(dead_code)] u8);
        impl Drop for WithDrop {
            fn drop(&mut self) {}
        }
        unsafe impl TriviallyRelocatable for WithDrop {}

        assert_relocatable::<WithDrop>();
        assert_relocatable::<Option<WithDrop>>();
    }
}
