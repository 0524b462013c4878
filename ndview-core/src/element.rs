/// An element which can be stored in a strided view, and reinterpreted from
/// the raw bytes of an opaque frame.
///
/// Element apt types have the following guarantees:
///
/// * The type does not need to be dropped (by implementing [Copy]).
/// * Every bit pattern of the correct size is a legal value of the type, and
///   the type has no padding bytes.
///
/// # Safety
///
/// Implementor must make sure that any bit-pattern is a legal bit-pattern for
/// the implemented type.
pub unsafe trait Element: Copy + 'static {}

// Helper macro to implement [Element] for primitive types.
macro_rules! impl_primitive {
    ($($ty:ty),* $(,)?) => {
        $(unsafe impl Element for $ty {})*
    };
}

// Note: trivial integer and float implementations.
impl_primitive!(u8, u16, u32, u64, u128, usize);
impl_primitive!(i8, i16, i32, i64, i128, isize);
impl_primitive!(f32, f64);

/// Arrays of elements are packed without padding.
unsafe impl<T, const N: usize> Element for [T; N] where T: Element {}
