//! Layout-erased views over arrays of frames.

use core::fmt;
use core::marker;
use core::slice;

use ndview_core::{
    check_axis, check_shape, Const, Dimension, Error, FrameFormat, Indices, InsertAxis, Mut,
    Mutability, RemoveAxis, Result, SliceView, Span, View,
};

use crate::strided::{check_same_shape, StridedView};

/// A view over an array of frames whose internal layout is only known to the
/// frame format `F`.
///
/// This is a strided byte view of one extra, innermost axis which spans the
/// bytes `0..frame_size` of every frame with a stride of one. That axis is
/// hidden from the public surface and is never partially sectioned, so a
/// frame is always handled as a whole.
pub struct OpaqueView<'a, F, D, M = Const>
where
    D: InsertAxis,
{
    base: StridedView<'a, u8, D::Larger, M>,
    format: F,
}

impl<'a, F, D, M> OpaqueView<'a, F, D, M>
where
    F: FrameFormat,
    D: InsertAxis,
    M: Mutability,
{
    /// Construct a null view of the given format.
    pub fn null(format: F) -> Self {
        Self {
            base: StridedView::null(),
            format,
        }
    }

    /// Construct a view from its raw parts.
    ///
    /// # Safety
    ///
    /// Caller must ensure that every frame reachable through `shape` and
    /// `strides` lies within one allocation which outlives `'a`, and which is
    /// valid for writes if `M` is [Mut].
    pub unsafe fn new_unchecked(ptr: *mut u8, shape: D, strides: D, format: F) -> Result<Self> {
        check_shape(&shape)?;
        let frame_size = format.frame_size() as isize;
        let base = StridedView::new_unchecked(ptr, shape.push(frame_size), strides.push(1))?;
        Ok(Self { base, format })
    }

    /// Construct a view with default strides from its raw parts.
    ///
    /// # Safety
    ///
    /// See [OpaqueView::new_unchecked].
    pub unsafe fn with_default_strides(
        ptr: *mut u8,
        shape: D,
        format: F,
        frame_padding: usize,
    ) -> Result<Self> {
        let strides = Self::default_strides(shape, &format, frame_padding);
        Self::new_unchecked(ptr, shape, strides, format)
    }

    /// Construct from a byte view whose innermost axis covers exactly one
    /// frame with a stride of one.
    pub fn from_base(base: StridedView<'a, u8, D::Larger, M>, format: F) -> Result<Self> {
        let inner = D::NDIM;

        if base.shape().as_slice()[inner] != format.frame_size() as isize
            || base.strides().as_slice()[inner] != 1
        {
            return Err(Error::LayoutMismatch {
                reason: "innermost byte axis does not span one frame",
            });
        }

        Ok(Self { base, format })
    }

    /// Row-major strides for `shape` where each frame is followed by
    /// `frame_padding` bytes.
    ///
    /// ```
    /// use ndview::{OpaqueView, RawFormat};
    ///
    /// let format = RawFormat::new(4);
    /// let strides = OpaqueView::<RawFormat, [isize; 3]>::default_strides([10, 3, 4], &format, 0);
    /// assert_eq!(strides, [48, 16, 4]);
    ///
    /// let strides = OpaqueView::<RawFormat, [isize; 2]>::default_strides([3, 4], &format, 2);
    /// assert_eq!(strides, [24, 6]);
    /// ```
    pub fn default_strides(shape: D, format: &F, frame_padding: usize) -> D {
        let mut strides = D::zeros();
        let mut stride = (format.frame_size() + frame_padding) as isize;

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

    /// The padding in bytes following each frame, if the axes from
    /// `minimal_dimension` inwards have default strides.
    pub fn default_strides_padding(&self, minimal_dimension: usize) -> Option<usize> {
        let shape = self.shape();
        let strides = self.strides();
        let (shape, strides) = (shape.as_slice(), strides.as_slice());

        let inner = match strides.last() {
            Some(&inner) => inner,
            None => return Some(0),
        };

        let padding = inner - self.format.frame_size() as isize;

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
    /// with any frame padding.
    pub fn has_default_strides(&self, minimal_dimension: usize) -> bool {
        self.default_strides_padding(minimal_dimension).is_some()
    }

    /// Test if the axes from `minimal_dimension` inwards have default strides
    /// without frame padding.
    pub fn has_default_strides_without_padding(&self, minimal_dimension: usize) -> bool {
        self.default_strides_padding(minimal_dimension) == Some(0)
    }

    /// Test if this is a null view.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.base.is_null()
    }

    /// The address of the first byte of the frame at the origin.
    #[inline]
    pub fn start(&self) -> *const u8 {
        self.base.start()
    }

    /// The extent along every frame axis.
    pub fn shape(&self) -> D {
        head(&self.base.shape())
    }

    /// The byte stride of every frame axis.
    pub fn strides(&self) -> D {
        head(&self.base.strides())
    }

    /// The number of frames in the view.
    pub fn size(&self) -> usize {
        self.shape().size()
    }

    /// The span covering the whole view.
    pub fn full_span(&self) -> Span<D> {
        Span::full(self.shape())
    }

    /// The format of every frame.
    #[inline]
    pub fn frame_format(&self) -> &F {
        &self.format
    }

    /// The underlying byte view, including the innermost byte axis.
    #[inline]
    pub fn base_view(&self) -> &StridedView<'a, u8, D::Larger, M> {
        &self.base
    }

    /// Index every frame axis, producing a view of the single frame at
    /// `coord`.
    pub fn at(&self, coord: D) -> Result<OpaqueView<'a, F, [isize; 0], M>> {
        Ok(OpaqueView {
            base: self.base.fix_leading::<[isize; 1]>(coord.as_slice())?,
            format: self.format,
        })
    }

    /// The frame handle of the frame at `coord`.
    pub fn frame_at(&self, coord: D) -> Result<FrameHandle<'a, F, M>> {
        self.at(coord)?.frame_handle()
    }

    /// Fix `axis` to `index`, producing a view of one dimension less.
    pub fn slice(&self, index: isize, axis: usize) -> Result<OpaqueView<'a, F, D::Smaller, M>>
    where
        D: RemoveAxis,
        D::Smaller: InsertAxis,
    {
        check_axis::<D>(axis)?;

        Ok(OpaqueView {
            base: self.base.slice_to(index, axis)?,
            format: self.format,
        })
    }

    /// Section a frame axis over `start..end` with `step`.
    pub fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self> {
        check_axis::<D>(axis)?;

        Ok(Self {
            base: self.base.axis_section(axis, start, end, step)?,
            format: self.format,
        })
    }

    /// Section every frame axis, keeping every frame whole.
    pub fn section(&self, start: D, end: D, steps: D) -> Result<Self> {
        let frame_size = self.format.frame_size() as isize;

        let base = self
            .base
            .section(start.push(0), end.push(frame_size), steps.push(1))?;

        Ok(Self {
            base,
            format: self.format,
        })
    }

    /// Section every frame axis over `span` with `steps`.
    pub fn section_span(&self, span: Span<D>, steps: D) -> Result<Self> {
        self.section(span.start, span.end, steps)
    }

    /// Replace the described region and format with that of `other`.
    pub fn reset(&mut self, other: Self) {
        tracing::trace!(shape = ?other.shape(), format = ?other.format, "reset opaque view");
        *self = other;
    }

    /// Test if both views have identical descriptors and frame formats.
    pub fn same<N>(&self, other: &OpaqueView<'_, F, D, N>) -> bool
    where
        N: Mutability,
    {
        self.base.same(&other.base) && self.format == other.format
    }

    /// Deep comparison of every frame against `other`.
    ///
    /// Fails if the shapes differ or if the frame formats are not
    /// compatible.
    pub fn compare<N>(&self, other: &OpaqueView<'_, F, D, N>) -> Result<bool>
    where
        N: Mutability,
    {
        self.check_compatible(other)?;

        for coord in Indices::new(self.shape()) {
            // SAFETY: both views share the same in-bounds frame coordinates and
            // compatible frame formats.
            let equal = unsafe {
                self.format.compare_frame(
                    self.frame_ptr(&coord),
                    &other.format,
                    other.frame_ptr(&coord),
                )
            };

            if !equal {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Convert into a read-only view of the same frames.
    pub fn as_const(&self) -> OpaqueView<'a, F, D, Const> {
        OpaqueView {
            base: self.base.as_const(),
            format: self.format,
        }
    }

    /// Iterate over the handles of every frame in row-major order.
    pub fn frames(&self) -> Frames<'a, F, D, M> {
        let indices = if self.is_null() {
            None
        } else {
            Some(Indices::new(self.shape()))
        };

        Frames {
            view: *self,
            indices,
        }
    }

    fn check_compatible<N>(&self, other: &OpaqueView<'_, F, D, N>) -> Result<()>
    where
        N: Mutability,
    {
        self.base.check_null()?;
        other.base.check_null()?;
        check_same_shape(&self.shape(), &other.shape())?;

        if !self.format.is_compatible(&other.format) {
            return Err(Error::FormatMismatch {
                left: self.format.frame_size(),
                right: other.format.frame_size(),
            });
        }

        Ok(())
    }

    /// Pointer to the frame at `coord`, which is not bounds checked.
    fn frame_ptr(&self, coord: &D) -> *mut u8 {
        let offset: isize = coord
            .as_slice()
            .iter()
            .zip(self.strides().as_slice())
            .map(|(c, s)| c * s)
            .sum();

        (self.base.start() as *mut u8).wrapping_offset(offset)
    }
}

impl<'a, F, D> OpaqueView<'a, F, D, Const>
where
    F: FrameFormat,
    D: InsertAxis,
{
    /// Construct a read-only view with default strides over a byte slice.
    ///
    /// ```
    /// use ndview::{OpaqueView, RawFormat};
    ///
    /// let data = [0u8; 24];
    /// let view = OpaqueView::from_bytes(&data[..], [2, 3], RawFormat::new(4))?;
    /// assert_eq!(view.strides(), [12, 4]);
    ///
    /// assert!(OpaqueView::from_bytes(&data[..], [3, 3], RawFormat::new(4)).is_err());
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn from_bytes(data: &'a [u8], shape: D, format: F) -> Result<Self> {
        check_bytes(data.len(), &shape, &format)?;
        // SAFETY: the slice holds every frame in row-major order and outlives
        // 'a.
        unsafe { Self::with_default_strides(data.as_ptr() as *mut u8, shape, format, 0) }
    }
}

impl<'a, F, D> OpaqueView<'a, F, D, Mut>
where
    F: FrameFormat,
    D: InsertAxis,
{
    /// Construct a mutable view with default strides over a byte slice.
    pub fn from_mut_bytes(data: &'a mut [u8], shape: D, format: F) -> Result<Self> {
        check_bytes(data.len(), &shape, &format)?;
        // SAFETY: the slice holds every frame in row-major order, is valid for
        // writes and outlives 'a.
        unsafe { Self::with_default_strides(data.as_mut_ptr(), shape, format, 0) }
    }

    /// Deep assignment of every frame of `other` into this view.
    ///
    /// Fails if the shapes differ or if the frame formats are not
    /// compatible.
    pub fn assign<N>(&self, other: &OpaqueView<'_, F, D, N>) -> Result<()>
    where
        N: Mutability,
    {
        self.check_compatible(other)?;

        for coord in Indices::new(self.shape()) {
            // SAFETY: both views share the same in-bounds frame coordinates,
            // and this view is writable.
            unsafe {
                self.format
                    .copy_frame(self.frame_ptr(&coord), &other.format, other.frame_ptr(&coord));
            }
        }

        Ok(())
    }
}

impl<'a, F, M> OpaqueView<'a, F, [isize; 0], M>
where
    F: FrameFormat,
    M: Mutability,
{
    /// The handle of the single frame of a zero-dimensional view.
    ///
    /// This pairs the address of the frame with its format, and is the only
    /// way to reach the content of a frame. Fails with [Error::NullView] for a
    /// null view.
    ///
    /// ```
    /// use ndview::{Error, OpaqueView, RawFormat};
    ///
    /// let data = [1u8, 2, 3, 4];
    /// let view = OpaqueView::from_bytes(&data[..], [1], RawFormat::new(4))?;
    /// assert_eq!(view.at([0])?.frame_handle()?.as_ptr(), data.as_ptr());
    ///
    /// let null = OpaqueView::<_, [isize; 0]>::null(RawFormat::new(4));
    /// assert_eq!(null.frame_handle().map(|_| ()), Err(Error::NullView));
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn frame_handle(&self) -> Result<FrameHandle<'a, F, M>> {
        self.base.check_null()?;

        Ok(FrameHandle {
            ptr: self.base.start() as *mut u8,
            format: self.format,
            _marker: marker::PhantomData,
        })
    }
}

impl<F, D, M> Clone for OpaqueView<'_, F, D, M>
where
    F: Copy,
    D: InsertAxis,
{
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, D, M> Copy for OpaqueView<'_, F, D, M>
where
    F: Copy,
    D: InsertAxis,
{
}

impl<'a, F, D, M> View for OpaqueView<'a, F, D, M>
where
    F: FrameFormat,
    D: InsertAxis,
    M: Mutability,
{
    type Dim = D;
    type Point = OpaqueView<'a, F, [isize; 0], M>;

    #[inline]
    fn is_null(&self) -> bool {
        OpaqueView::is_null(self)
    }

    #[inline]
    fn start(&self) -> *const u8 {
        OpaqueView::start(self)
    }

    fn shape(&self) -> D {
        OpaqueView::shape(self)
    }

    fn at(&self, coord: D) -> Result<Self::Point> {
        OpaqueView::at(self, coord)
    }

    fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self> {
        OpaqueView::axis_section(self, axis, start, end, step)
    }

    fn section(&self, start: D, end: D, steps: D) -> Result<Self> {
        OpaqueView::section(self, start, end, steps)
    }

    fn same(&self, other: &Self) -> bool {
        OpaqueView::same(self, other)
    }
}

impl<'a, F, D, M> SliceView for OpaqueView<'a, F, D, M>
where
    F: FrameFormat,
    D: RemoveAxis + InsertAxis,
    D::Smaller: InsertAxis,
    M: Mutability,
{
    type Slice = OpaqueView<'a, F, D::Smaller, M>;

    fn slice(&self, index: isize, axis: usize) -> Result<Self::Slice> {
        OpaqueView::slice(self, index, axis)
    }
}

impl<'b, F, D, M, N> PartialEq<OpaqueView<'b, F, D, N>> for OpaqueView<'_, F, D, M>
where
    F: FrameFormat,
    D: InsertAxis,
    M: Mutability,
    N: Mutability,
{
    fn eq(&self, other: &OpaqueView<'b, F, D, N>) -> bool {
        match self.compare(other) {
            Ok(equal) => equal,
            Err(..) => self.is_null() && other.is_null(),
        }
    }
}

impl<F, D, M> fmt::Debug for OpaqueView<'_, F, D, M>
where
    F: fmt::Debug,
    D: InsertAxis,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueView")
            .field("base", &self.base)
            .field("format", &self.format)
            .finish()
    }
}

/// A pointer to one frame paired with its format.
pub struct FrameHandle<'a, F, M = Const> {
    ptr: *mut u8,
    format: F,
    _marker: marker::PhantomData<(&'a [u8], M)>,
}

impl<'a, F, M> FrameHandle<'a, F, M>
where
    F: FrameFormat,
    M: Mutability,
{
    /// The address of the first byte of the frame.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /// The format of the frame.
    #[inline]
    pub fn format(&self) -> &F {
        &self.format
    }

    /// The number of bytes of the frame.
    #[inline]
    pub fn frame_size(&self) -> usize {
        self.format.frame_size()
    }

    /// Access every byte spanned by the frame, including padding between
    /// elements.
    ///
    /// # Safety
    ///
    /// Caller must ensure that nothing writes to the frame through an aliasing
    /// view while the returned slice is alive.
    pub unsafe fn as_bytes(&self) -> &'a [u8] {
        slice::from_raw_parts(self.ptr, self.frame_size())
    }

    /// Copy the frame into the leading bytes of `out`, laid out the same way
    /// as in the frame.
    ///
    /// Only the bytes the format considers content are copied, padding
    /// between elements is left untouched in `out`.
    pub fn read_into(&self, out: &mut [u8]) -> Result<()> {
        let required = self.frame_size();
        let len = out.len();

        let out = out
            .get_mut(..required)
            .ok_or(Error::BufferTooSmall { required, len })?;

        // SAFETY: the handle was produced by a non-null view guaranteeing the
        // frame is readable, and `out` holds a whole frame.
        unsafe { self.format.copy_frame(out.as_mut_ptr(), &self.format, self.ptr) };

        Ok(())
    }
}

impl<'a, F> FrameHandle<'a, F, Mut>
where
    F: FrameFormat,
{
    /// The mutable address of the first byte of the frame.
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Overwrite the frame with the leading bytes of `bytes`, which are laid
    /// out the same way as the frame.
    ///
    /// Padding between elements is not written, since it may belong to
    /// memory outside of the view.
    pub fn write_from(&self, bytes: &[u8]) -> Result<()> {
        let required = self.frame_size();
        let len = bytes.len();

        let bytes = bytes
            .get(..required)
            .ok_or(Error::BufferTooSmall { required, len })?;

        // SAFETY: the handle was produced by a non-null mutable view
        // guaranteeing the frame is writable, and `bytes` holds a whole frame.
        unsafe { self.format.copy_frame(self.ptr, &self.format, bytes.as_ptr()) };

        Ok(())
    }
}

impl<F, M> Clone for FrameHandle<'_, F, M>
where
    F: Copy,
{
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, M> Copy for FrameHandle<'_, F, M> where F: Copy {}

impl<F, M> fmt::Debug for FrameHandle<'_, F, M>
where
    F: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHandle")
            .field("ptr", &self.ptr)
            .field("format", &self.format)
            .finish()
    }
}

/// An iterator over the frames of an opaque view, in row-major order.
pub struct Frames<'a, F, D, M>
where
    D: InsertAxis,
{
    view: OpaqueView<'a, F, D, M>,
    indices: Option<Indices<D>>,
}

impl<'a, F, D, M> Iterator for Frames<'a, F, D, M>
where
    F: FrameFormat,
    D: InsertAxis,
    M: Mutability,
{
    type Item = FrameHandle<'a, F, M>;

    fn next(&mut self) -> Option<Self::Item> {
        let coord = self.indices.as_mut()?.next()?;

        Some(FrameHandle {
            ptr: self.view.frame_ptr(&coord),
            format: self.view.format,
            _marker: marker::PhantomData,
        })
    }
}

/// The leading `D::NDIM` axes of `larger`.
fn head<D, L>(larger: &L) -> D
where
    D: Dimension,
    L: Dimension,
{
    let mut out = D::zeros();
    let n = D::NDIM.min(L::NDIM);
    out.as_mut_slice()[..n].copy_from_slice(&larger.as_slice()[..n]);
    out
}

fn check_bytes<F, D>(len: usize, shape: &D, format: &F) -> Result<()>
where
    F: FrameFormat,
    D: Dimension,
{
    check_shape(shape)?;
    let required = shape.size() * format.frame_size();

    if required > len {
        return Err(Error::BufferTooSmall { required, len });
    }

    Ok(())
}
