//! Type-level mutability tags for views.

use core::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Const {}
    impl Sealed for super::Mut {}
}

/// Marker for the mutability of a view.
///
/// This is sealed and only implemented by [Const] and [Mut]. All view
/// operations are shared between the two, only element writes and deep
/// assignment require [Mut].
pub trait Mutability: sealed::Sealed + Copy + fmt::Debug + 'static {
    /// If views tagged with this marker may write through their pointer.
    const MUTABLE: bool;
}

/// Marker for read-only views.
#[derive(Clone, Copy, Debug)]
pub enum Const {}

/// Marker for views which may write to the memory they describe.
#[derive(Clone, Copy, Debug)]
pub enum Mut {}

impl Mutability for Const {
    const MUTABLE: bool = false;
}

impl Mutability for Mut {
    const MUTABLE: bool = true;
}
