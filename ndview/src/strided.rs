//! The base strided view over typed memory.

use core::fmt;
use core::marker;
use core::mem;
use core::ptr;

use ndview_core::{
    check_axis, check_shape, stepped_len, stepped_origin, Const, Dimension, Error, Indices, Mut,
    Mutability, RemoveAxis, Result, SliceView, Span, View,
};

/// A strided view over memory holding elements of type `T`.
///
/// The view is a descriptor made up of the address of the element at the
/// origin, a shape and a set of strides. Strides are counted in **bytes**, so
/// the address of the element at coordinate `c` is
/// `start + sum(c[i] * strides[i])` byte offsets away from the start. Strides
/// may be negative (reversed axis) or zero (broadcast axis).
///
/// The view never owns the memory it describes. Copying a view copies the
/// descriptor, and two views may alias the same memory. Elements are always
/// accessed by value so aliasing views never hand out overlapping
/// references.
///
/// See [Const] and [Mut] for the mutability tag `M`.
pub struct StridedView<'a, T, D, M = Const> {
    /// Pointer to the element at the origin, null for a null view.
    ptr: *mut T,
    /// Extent along every axis.
    shape: D,
    /// Byte distance per unit step along every axis.
    strides: D,
    /// The marker indicating the lifetime and mutability of the view.
    _marker: marker::PhantomData<(&'a [T], M)>,
}

impl<'a, T, D, M> StridedView<'a, T, D, M>
where
    D: Dimension,
    M: Mutability,
{
    /// Construct a null view, which describes no memory.
    ///
    /// ```
    /// use ndview::StridedView;
    ///
    /// let view = StridedView::<u32, [isize; 2]>::null();
    /// assert!(view.is_null());
    /// ```
    pub fn null() -> Self {
        Self {
            ptr: ptr::null_mut(),
            shape: D::zeros(),
            strides: D::zeros(),
            _marker: marker::PhantomData,
        }
    }

    /// Construct a view from its raw parts.
    ///
    /// Fails with [Error::NullView] if `ptr` is null and with
    /// [Error::NegativeExtent] if any extent is negative.
    ///
    /// # Safety
    ///
    /// Caller must ensure that every element reachable through `shape` and
    /// `strides` lies within one allocation which outlives `'a`, and which is
    /// valid for writes if `M` is [Mut].
    pub unsafe fn new_unchecked(ptr: *mut T, shape: D, strides: D) -> Result<Self> {
        if ptr.is_null() {
            return Err(Error::NullView);
        }

        check_shape(&shape)?;

        Ok(Self {
            ptr,
            shape,
            strides,
            _marker: marker::PhantomData,
        })
    }

    /// Row-major strides for `shape`, with the last axis varying fastest.
    ///
    /// The innermost stride is the size of `T` plus `padding` bytes, every
    /// outer stride covers the full extent of the axis inside of it.
    ///
    /// ```
    /// use ndview::StridedView;
    ///
    /// let strides = StridedView::<u32, [isize; 3]>::default_strides([10, 3, 4], 0);
    /// assert_eq!(strides, [48, 16, 4]);
    ///
    /// let strides = StridedView::<u32, [isize; 2]>::default_strides([3, 4], 4);
    /// assert_eq!(strides, [32, 8]);
    /// ```
    pub fn default_strides(shape: D, padding: usize) -> D {
        let mut strides = D::zeros();
        let mut stride = (mem::size_of::<T>() + padding) as isize;

        for (s, &n) in strides
            .as_mut_slice()
            .iter_mut()
            .zip(shape.as_slice())
            .rev()
        {
            *s = stride;
            stride *= n;
        }

        strides
    }

    /// The padding in bytes following each innermost element, if the axes
    /// from `minimal_dimension` inwards have default strides.
    pub fn default_strides_padding(&self, minimal_dimension: usize) -> Option<usize> {
        let shape = self.shape.as_slice();
        let strides = self.strides.as_slice();

        let inner = match strides.last() {
            Some(&inner) => inner,
            None => return Some(0),
        };

        let padding = inner - mem::size_of::<T>() as isize;

        if padding < 0 {
            return None;
        }

        for axis in (minimal_dimension..D::NDIM.saturating_sub(1)).rev() {
            if strides[axis] != shape[axis + 1] * strides[axis + 1] {
                return None;
            }
        }

        Some(padding as usize)
    }

    /// Test if the axes from `minimal_dimension` inwards have default strides
    /// with any padding.
    pub fn has_default_strides(&self, minimal_dimension: usize) -> bool {
        self.default_strides_padding(minimal_dimension).is_some()
    }

    /// Test if the axes from `minimal_dimension` inwards have default strides
    /// without padding.
    pub fn has_default_strides_without_padding(&self, minimal_dimension: usize) -> bool {
        self.default_strides_padding(minimal_dimension) == Some(0)
    }

    /// Test if this is a null view.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// The address of the element at the origin.
    #[inline]
    pub fn start(&self) -> *const T {
        self.ptr
    }

    /// The extent along every axis.
    #[inline]
    pub fn shape(&self) -> D {
        self.shape
    }

    /// The byte stride of every axis.
    #[inline]
    pub fn strides(&self) -> D {
        self.strides
    }

    /// The number of elements in the view.
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// The span covering the whole view.
    pub fn full_span(&self) -> Span<D> {
        Span::full(self.shape)
    }

    /// Iterate over every coordinate in the view in row-major order.
    pub fn indices(&self) -> Indices<D> {
        Indices::new(self.shape)
    }

    /// The byte offset of `coord` from the start of the view.
    ///
    /// This is not bounds checked.
    pub fn offset_of(&self, coord: &D) -> isize {
        coord
            .as_slice()
            .iter()
            .zip(self.strides.as_slice())
            .map(|(c, s)| c * s)
            .sum()
    }

    /// The address of the element at `coord`.
    pub fn ptr_at(&self, coord: D) -> Result<*const T> {
        self.check_coord(&coord)?;
        Ok(self.byte_offset(self.offset_of(&coord)))
    }

    /// Index every axis, producing a view of the single element at `coord`.
    pub fn at(&self, coord: D) -> Result<StridedView<'a, T, [isize; 0], M>> {
        self.check_coord(&coord)?;

        Ok(StridedView {
            ptr: self.byte_offset(self.offset_of(&coord)),
            shape: [],
            strides: [],
            _marker: marker::PhantomData,
        })
    }

    /// Read the element at `coord`.
    ///
    /// ```
    /// use ndview::StridedView;
    ///
    /// let data = (0u32..12).collect::<Vec<_>>();
    /// let view = StridedView::from_slice(&data, [3, 4])?;
    /// assert_eq!(view.get([2, 1])?, 9);
    /// assert!(view.get([3, 0]).is_err());
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn get(&self, coord: D) -> Result<T>
    where
        T: Copy,
    {
        let ptr = self.ptr_at(coord)?;
        // SAFETY: the coordinate is in bounds, and the constructor guarantees
        // that every in-bounds element is readable.
        Ok(unsafe { ptr::read_unaligned(ptr) })
    }

    /// Fix `axis` to `index`, producing a view of one dimension less.
    ///
    /// Fails with [Error::OutOfRange] if `index` is outside of the extent of
    /// `axis`.
    pub fn slice(&self, index: isize, axis: usize) -> Result<StridedView<'a, T, D::Smaller, M>>
    where
        D: RemoveAxis,
    {
        self.slice_to(index, axis)
    }

    /// Slice into an arbitrary dimension `S`, which must have exactly one axis
    /// less than `D`.
    pub(crate) fn slice_to<S>(&self, index: isize, axis: usize) -> Result<StridedView<'a, T, S, M>>
    where
        S: Dimension,
    {
        self.check_null()?;
        check_axis::<D>(axis)?;
        let extent = self.shape.as_slice()[axis];

        if index < 0 || index >= extent {
            return Err(Error::OutOfRange {
                axis,
                index,
                extent,
            });
        }

        let shape = self.shape.as_slice();
        let strides = self.strides.as_slice();

        let (shape, strides) = match (
            S::from_parts(&shape[..axis], &shape[axis + 1..]),
            S::from_parts(&strides[..axis], &strides[axis + 1..]),
        ) {
            (Some(shape), Some(strides)) => (shape, strides),
            _ => {
                return Err(Error::AxisOutOfRange {
                    axis: S::NDIM,
                    ndim: D::NDIM,
                })
            }
        };

        Ok(StridedView {
            ptr: self.byte_offset(index * self.strides.as_slice()[axis]),
            shape,
            strides,
            _marker: marker::PhantomData,
        })
    }

    /// Fix the leading `coord.len()` axes, producing a view of the remaining
    /// axes.
    pub(crate) fn fix_leading<S>(&self, coord: &[isize]) -> Result<StridedView<'a, T, S, M>>
    where
        S: Dimension,
    {
        self.check_null()?;
        let shape = self.shape.as_slice();
        let strides = self.strides.as_slice();

        if coord.len() > D::NDIM {
            return Err(Error::AxisOutOfRange {
                axis: coord.len(),
                ndim: D::NDIM,
            });
        }

        let mut offset = 0;

        for (axis, ((&c, &n), &s)) in coord.iter().zip(shape).zip(strides).enumerate() {
            if c < 0 || c >= n {
                return Err(Error::OutOfRange {
                    axis,
                    index: c,
                    extent: n,
                });
            }

            offset += c * s;
        }

        let (shape, strides) = match (
            S::from_slice(&shape[coord.len()..]),
            S::from_slice(&strides[coord.len()..]),
        ) {
            (Some(shape), Some(strides)) => (shape, strides),
            _ => {
                return Err(Error::AxisOutOfRange {
                    axis: S::NDIM,
                    ndim: D::NDIM,
                })
            }
        };

        Ok(StridedView {
            ptr: self.byte_offset(offset),
            shape,
            strides,
            _marker: marker::PhantomData,
        })
    }

    /// Section `axis` over `start..end` with `step`.
    ///
    /// The new stride of the axis is the old stride multiplied by `step`, and
    /// its new extent is `ceil((end - start) / |step|)`. A negative step
    /// traverses the range from `end - 1` downwards. Fails if the range is not
    /// contained in the extent of the axis.
    pub fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self> {
        self.check_null()?;
        check_axis::<D>(axis)?;

        if step == 0 {
            return Err(Error::ZeroStep { axis });
        }

        let extent = self.shape.as_slice()[axis];

        if start < 0 || end < start || end > extent {
            return Err(Error::SectionOutOfRange {
                axis,
                start,
                end,
                extent,
            });
        }

        let stride = self.strides.as_slice()[axis];
        let len = stepped_len(start, end, step);
        let origin = stepped_origin(start, end, step);

        let mut out = *self;
        out.ptr = self.byte_offset(origin * stride);
        out.shape.as_mut_slice()[axis] = len;
        out.strides.as_mut_slice()[axis] = stride * step;
        Ok(out)
    }

    /// Section every axis over `start..end` with `steps`.
    ///
    /// Either every axis is sectioned, or an error is returned.
    ///
    /// ```
    /// use ndview::StridedView;
    ///
    /// let data = (0u32..24).collect::<Vec<_>>();
    /// let view = StridedView::from_slice(&data, [4, 6])?;
    /// let section = view.section([1, 0], [3, 6], [1, 2])?;
    ///
    /// assert_eq!(section.shape(), [2, 3]);
    /// assert_eq!(section.iter().collect::<Vec<_>>(), [6, 8, 10, 12, 14, 16]);
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn section(&self, start: D, end: D, steps: D) -> Result<Self> {
        View::section(self, start, end, steps)
    }

    /// Section every axis over `span` with `steps`.
    pub fn section_span(&self, span: Span<D>, steps: D) -> Result<Self> {
        self.section(span.start, span.end, steps)
    }

    /// Replace the described region with that of `other`.
    pub fn reset(&mut self, other: Self) {
        tracing::trace!(shape = ?other.shape, strides = ?other.strides, "reset strided view");
        *self = other;
    }

    /// Test if both views have identical descriptors.
    pub fn same<N>(&self, other: &StridedView<'_, T, D, N>) -> bool
    where
        N: Mutability,
    {
        ptr::eq(self.ptr, other.ptr) && self.shape == other.shape && self.strides == other.strides
    }

    /// Deep comparison of every element against `other`.
    ///
    /// Fails with [Error::ShapeMismatch] if the shapes differ.
    pub fn compare<N>(&self, other: &StridedView<'_, T, D, N>) -> Result<bool>
    where
        T: PartialEq + Copy,
        N: Mutability,
    {
        self.check_null()?;
        other.check_null()?;
        check_same_shape(&self.shape, &other.shape)?;

        for coord in self.indices() {
            // SAFETY: both views share the same in-bounds coordinates.
            let (a, b) = unsafe {
                (
                    ptr::read_unaligned(self.byte_offset(self.offset_of(&coord))),
                    ptr::read_unaligned(other.byte_offset(other.offset_of(&coord))),
                )
            };

            if a != b {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Convert into a read-only view of the same region.
    pub fn as_const(&self) -> StridedView<'a, T, D, Const> {
        StridedView {
            ptr: self.ptr,
            shape: self.shape,
            strides: self.strides,
            _marker: marker::PhantomData,
        }
    }

    /// Iterate over the elements of the view in row-major order.
    pub fn iter(&self) -> Iter<'a, T, D, M>
    where
        T: Copy,
    {
        let indices = if self.is_null() {
            None
        } else {
            Some(self.indices())
        };

        Iter {
            view: *self,
            indices,
        }
    }

    #[inline]
    pub(crate) fn check_null(&self) -> Result<()> {
        if self.is_null() {
            return Err(Error::NullView);
        }

        Ok(())
    }

    fn check_coord(&self, coord: &D) -> Result<()> {
        self.check_null()?;

        for (axis, (&c, &n)) in coord
            .as_slice()
            .iter()
            .zip(self.shape.as_slice())
            .enumerate()
        {
            if c < 0 || c >= n {
                return Err(Error::OutOfRange {
                    axis,
                    index: c,
                    extent: n,
                });
            }
        }

        Ok(())
    }

    /// Offset the start pointer by `bytes`.
    #[inline]
    fn byte_offset(&self, bytes: isize) -> *mut T {
        self.ptr.cast::<u8>().wrapping_offset(bytes).cast::<T>()
    }

    /// Reinterpret the view as one over elements of type `U` of a different
    /// dimension, keeping address and strides.
    pub(crate) fn reinterpret<U, S>(&self, shape: S, strides: S) -> StridedView<'a, U, S, M> {
        StridedView {
            ptr: self.ptr.cast::<U>(),
            shape,
            strides,
            _marker: marker::PhantomData,
        }
    }
}

impl<'a, T, D> StridedView<'a, T, D, Const>
where
    D: Dimension,
{
    /// Construct a read-only view with default strides over a slice.
    ///
    /// Fails with [Error::BufferTooSmall] if the slice cannot hold every
    /// element of `shape`.
    ///
    /// ```
    /// use ndview::StridedView;
    ///
    /// let data = [1u32, 2, 3, 4, 5, 6];
    /// let view = StridedView::from_slice(&data[..], [2, 3])?;
    /// assert_eq!(view.get([1, 0])?, 4);
    ///
    /// assert!(StridedView::from_slice(&data[..], [4, 3]).is_err());
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn from_slice(data: &'a [T], shape: D) -> Result<Self> {
        check_shape(&shape)?;
        check_len::<T>(data.len(), shape.size())?;
        let strides = Self::default_strides(shape, 0);

        // SAFETY: the slice holds every element of the shape in row-major
        // order and outlives 'a.
        unsafe { Self::new_unchecked(data.as_ptr() as *mut T, shape, strides) }
    }
}

impl<'a, T, D> StridedView<'a, T, D, Mut>
where
    D: Dimension,
{
    /// Construct a mutable view with default strides over a slice.
    pub fn from_mut_slice(data: &'a mut [T], shape: D) -> Result<Self> {
        check_shape(&shape)?;
        check_len::<T>(data.len(), shape.size())?;
        let strides = Self::default_strides(shape, 0);

        // SAFETY: the slice holds every element of the shape in row-major
        // order, is valid for writes and outlives 'a.
        unsafe { Self::new_unchecked(data.as_mut_ptr(), shape, strides) }
    }

    /// The mutable address of the element at the origin.
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut T {
        self.ptr
    }

    /// Write `value` to the element at `coord`.
    ///
    /// ```
    /// use ndview::StridedView;
    ///
    /// let mut data = [0u8; 6];
    /// let view = StridedView::from_mut_slice(&mut data[..], [2, 3])?;
    /// view.set([1, 2], 7)?;
    /// assert_eq!(data, [0, 0, 0, 0, 0, 7]);
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn set(&self, coord: D, value: T) -> Result<()>
    where
        T: Copy,
    {
        let ptr = self.ptr_at(coord)? as *mut T;
        // SAFETY: the coordinate is in bounds, and mutable views are only
        // constructed over writable memory.
        unsafe { ptr::write_unaligned(ptr, value) };
        Ok(())
    }

    /// Deep assignment of every element of `other` into this view.
    ///
    /// Fails with [Error::ShapeMismatch] if the shapes differ. Overlapping
    /// views are copied element by element in row-major order.
    pub fn assign<N>(&self, other: &StridedView<'_, T, D, N>) -> Result<()>
    where
        T: Copy,
        N: Mutability,
    {
        self.check_null()?;
        other.check_null()?;
        check_same_shape(&self.shape, &other.shape)?;

        for coord in self.indices() {
            // SAFETY: both views share the same in-bounds coordinates, and this
            // view is writable.
            unsafe {
                let value = ptr::read_unaligned(other.byte_offset(other.offset_of(&coord)));
                ptr::write_unaligned(self.byte_offset(self.offset_of(&coord)), value);
            }
        }

        Ok(())
    }
}

impl<'a, T, M> StridedView<'a, T, [isize; 0], M>
where
    M: Mutability,
{
    /// Read the single element of a zero-dimensional view.
    pub fn value(&self) -> Result<T>
    where
        T: Copy,
    {
        self.get([])
    }
}

impl<T, D, M> Clone for StridedView<'_, T, D, M>
where
    D: Copy,
{
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

/// Note: views are always Copy since they are descriptors of memory they do
/// not own.
impl<T, D, M> Copy for StridedView<'_, T, D, M> where D: Copy {}

impl<'a, T, D, M> View for StridedView<'a, T, D, M>
where
    D: Dimension,
    M: Mutability,
{
    type Dim = D;
    type Point = StridedView<'a, T, [isize; 0], M>;

    #[inline]
    fn is_null(&self) -> bool {
        StridedView::is_null(self)
    }

    #[inline]
    fn start(&self) -> *const u8 {
        self.ptr.cast::<u8>()
    }

    #[inline]
    fn shape(&self) -> D {
        self.shape
    }

    fn at(&self, coord: D) -> Result<Self::Point> {
        StridedView::at(self, coord)
    }

    fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self> {
        StridedView::axis_section(self, axis, start, end, step)
    }

    fn same(&self, other: &Self) -> bool {
        StridedView::same(self, other)
    }
}

impl<'a, T, D, M> SliceView for StridedView<'a, T, D, M>
where
    D: RemoveAxis,
    M: Mutability,
{
    type Slice = StridedView<'a, T, D::Smaller, M>;

    fn slice(&self, index: isize, axis: usize) -> Result<Self::Slice> {
        StridedView::slice(self, index, axis)
    }
}

impl<'b, T, D, M, N> PartialEq<StridedView<'b, T, D, N>> for StridedView<'_, T, D, M>
where
    T: PartialEq + Copy,
    D: Dimension,
    M: Mutability,
    N: Mutability,
{
    fn eq(&self, other: &StridedView<'b, T, D, N>) -> bool {
        match self.compare(other) {
            Ok(equal) => equal,
            Err(..) => self.is_null() && other.is_null(),
        }
    }
}

impl<T, D, M> fmt::Debug for StridedView<'_, T, D, M>
where
    D: Dimension,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedView")
            .field("start", &self.ptr)
            .field("shape", &self.shape.as_slice())
            .field("strides", &self.strides.as_slice())
            .finish()
    }
}

/// An iterator over the elements of a strided view, in row-major order.
pub struct Iter<'a, T, D, M> {
    view: StridedView<'a, T, D, M>,
    indices: Option<Indices<D>>,
}

impl<T, D, M> Iterator for Iter<'_, T, D, M>
where
    T: Copy,
    D: Dimension,
    M: Mutability,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        let coord = self.indices.as_mut()?.next()?;
        let ptr = self.view.byte_offset(self.view.offset_of(&coord));
        // SAFETY: indices only yields in-bounds coordinates of a non-null
        // view.
        Some(unsafe { ptr::read_unaligned(ptr) })
    }
}

pub(crate) fn check_same_shape<D>(left: &D, right: &D) -> Result<()>
where
    D: Dimension,
{
    if left != right {
        return Err(Error::ShapeMismatch {
            left: left.as_slice().to_vec(),
            right: right.as_slice().to_vec(),
        });
    }

    Ok(())
}

fn check_len<T>(len: usize, elements: usize) -> Result<()> {
    if elements > len {
        let size = mem::size_of::<T>();

        return Err(Error::BufferTooSmall {
            required: elements * size,
            len: len * size,
        });
    }

    Ok(())
}
