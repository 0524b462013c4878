//! Zero-copy casts between typed and opaque views.
//!
//! Casting to an opaque view absorbs the innermost axes of a typed view into
//! an [NdFormat] frame, casting back expands the frame into axes again. Both
//! directions are pure reinterpretation: the address, the outer shape and
//! strides, every wraparound triple and the start time of timed views are
//! carried over unchanged.

use core::mem;

use ndview_core::{Dimension, Element, Error, FrameFormat, InsertAxis, Mutability, Result};

use crate::format::NdFormat;
use crate::opaque::OpaqueView;
use crate::strided::StridedView;
use crate::timed::TimedView;
use crate::wrap::WrapView;

impl<'a, T, D, M> StridedView<'a, T, D, M>
where
    T: Element,
    D: Dimension,
    M: Mutability,
{
    /// Cast into an opaque view of dimension `O`, absorbing the innermost
    /// `D::NDIM - O::NDIM` axes into the frame format.
    ///
    /// The format is synthesized from `T` and the absorbed axes, which must
    /// have positive strides.
    ///
    /// ```
    /// use ndview::{FrameFormat, StridedView};
    ///
    /// let data = (0i32..24).collect::<Vec<_>>();
    /// let view = StridedView::from_slice(&data, [2, 3, 4])?;
    ///
    /// let opaque = view.to_opaque::<[isize; 1]>()?;
    /// assert_eq!(opaque.shape(), [2]);
    /// assert_eq!(opaque.frame_format().frame_size(), 48);
    /// assert_eq!(opaque.start(), view.start().cast());
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn to_opaque<O>(&self) -> Result<OpaqueView<'a, NdFormat, O, M>>
    where
        O: InsertAxis,
    {
        self.check_null()?;
        frame_axes::<D, O>()?;
        let shape = self.shape();
        let strides = self.strides();

        let format = NdFormat::new(
            mem::size_of::<T>(),
            mem::align_of::<T>(),
            &shape.as_slice()[O::NDIM..],
            &strides.as_slice()[O::NDIM..],
        )
        .map_err(rejected)?;

        self.build_opaque(format)
    }

    /// Cast into an opaque view of dimension `O` with an existing format,
    /// which must agree with `T` and the absorbed axes.
    pub fn to_opaque_with<O>(&self, format: NdFormat) -> Result<OpaqueView<'a, NdFormat, O, M>>
    where
        O: InsertAxis,
    {
        self.check_null()?;
        frame_axes::<D, O>()?;
        check_element::<T>(&format)?;

        let shape = self.shape();
        let strides = self.strides();

        if format.shape() != &shape.as_slice()[O::NDIM..] {
            return Err(layout_mismatch("frame shape differs from the absorbed axes"));
        }

        if format.strides() != &strides.as_slice()[O::NDIM..] {
            return Err(layout_mismatch("frame strides differ from the absorbed axes"));
        }

        self.build_opaque(format)
    }

    /// Cast an opaque view back into a typed view, expanding each frame into
    /// `D::NDIM - O::NDIM` innermost axes of `T`.
    ///
    /// Fails with [Error::LayoutMismatch] if the frame format disagrees with
    /// `T` on element size or alignment, or if the frame has a different
    /// number of axes.
    pub fn from_opaque<O>(view: &OpaqueView<'a, NdFormat, O, M>) -> Result<Self>
    where
        O: InsertAxis,
    {
        let format = *view.frame_format();

        if frame_axes::<D, O>()? != format.ndim() {
            return Err(layout_mismatch("frame dimension differs from the target"));
        }

        check_element::<T>(&format)?;

        if view.is_null() {
            return Err(Error::NullView);
        }

        let outer_shape = view.shape();
        let outer_strides = view.strides();

        let (shape, strides) = match (
            D::from_parts(outer_shape.as_slice(), format.shape()),
            D::from_parts(outer_strides.as_slice(), format.strides()),
        ) {
            (Some(shape), Some(strides)) => (shape, strides),
            _ => return Err(layout_mismatch("frame dimension differs from the target")),
        };

        tracing::trace!(shape = ?shape, strides = ?strides, "cast opaque view to typed view");
        Ok(view.base_view().reinterpret(shape, strides))
    }

    fn build_opaque<O>(&self, format: NdFormat) -> Result<OpaqueView<'a, NdFormat, O, M>>
    where
        O: InsertAxis,
    {
        let shape = self.shape();
        let strides = self.strides();
        let frame_size = format.frame_size() as isize;

        let (shape, strides) = match (
            O::from_slice(&shape.as_slice()[..O::NDIM]),
            O::from_slice(&strides.as_slice()[..O::NDIM]),
        ) {
            (Some(shape), Some(strides)) => (shape.push(frame_size), strides.push(1)),
            _ => return Err(layout_mismatch("frame dimension differs from the target")),
        };

        tracing::trace!(shape = ?shape, format = ?format, "cast typed view to opaque view");
        OpaqueView::from_base(self.reinterpret(shape, strides), format)
    }
}

impl<'a, T, D, M> WrapView<StridedView<'a, T, D, M>>
where
    T: Element,
    D: Dimension,
    M: Mutability,
{
    /// Cast into an opaque wraparound view of dimension `O`.
    ///
    /// The absorbed axes must be unremapped: starting at zero with a step of
    /// one over their full raw extent.
    pub fn to_opaque<O>(&self) -> Result<WrapView<OpaqueView<'a, NdFormat, O, M>>>
    where
        O: InsertAxis,
    {
        let n = O::NDIM;
        frame_axes::<D, O>()?;

        let raw = self.raw_shape();
        let (origin, steps, shape) = (self.wrap_origin(), self.wrap_steps(), self.shape());

        let unmapped = (n..D::NDIM).all(|axis| {
            origin.as_slice()[axis] == 0
                && steps.as_slice()[axis] == 1
                && shape.as_slice()[axis] == raw.as_slice()[axis]
        });

        if !unmapped {
            return Err(layout_mismatch("frame axes of a wraparound view are remapped"));
        }

        let base = self.base_view().to_opaque::<O>()?;

        match (
            O::from_slice(&origin.as_slice()[..n]),
            O::from_slice(&steps.as_slice()[..n]),
            O::from_slice(&shape.as_slice()[..n]),
        ) {
            (Some(origin), Some(steps), Some(shape)) => {
                Ok(WrapView::from_parts(base, origin, steps, shape))
            }
            _ => Err(layout_mismatch("frame dimension differs from the target")),
        }
    }

    /// Cast an opaque wraparound view back into a typed one, adding
    /// unremapped frame axes.
    pub fn from_opaque<O>(view: &WrapView<OpaqueView<'a, NdFormat, O, M>>) -> Result<Self>
    where
        O: InsertAxis,
    {
        let base = StridedView::<'a, T, D, M>::from_opaque(view.base_view())?;
        let format = view.base_view().frame_format();
        let k = format.ndim();

        let zeros = [0; ndview_core::MAX_NDIM];
        let ones = [1; ndview_core::MAX_NDIM];

        match (
            D::from_parts(view.wrap_origin().as_slice(), &zeros[..k]),
            D::from_parts(view.wrap_steps().as_slice(), &ones[..k]),
            D::from_parts(view.shape().as_slice(), format.shape()),
        ) {
            (Some(origin), Some(steps), Some(shape)) => {
                Ok(WrapView::from_parts(base, origin, steps, shape))
            }
            _ => Err(layout_mismatch("frame dimension differs from the target")),
        }
    }
}

impl<'a, T, D, M> TimedView<StridedView<'a, T, D, M>>
where
    T: Element,
    D: Dimension,
    M: Mutability,
{
    /// Cast into an opaque timed view of dimension `O`, keeping the start
    /// time.
    pub fn to_opaque<O>(&self) -> Result<TimedView<OpaqueView<'a, NdFormat, O, M>>>
    where
        O: InsertAxis,
    {
        TimedView::new(self.non_timed().to_opaque::<O>()?, self.start_time())
    }

    /// Cast an opaque timed view back into a typed one, keeping the start
    /// time.
    pub fn from_opaque<O>(view: &TimedView<OpaqueView<'a, NdFormat, O, M>>) -> Result<Self>
    where
        O: InsertAxis,
    {
        TimedView::new(WrapView::from_opaque(&view.non_timed())?, view.start_time())
    }
}

/// The number of axes absorbed into a frame when casting between `D` and
/// `O`.
fn frame_axes<D, O>() -> Result<usize>
where
    D: Dimension,
    O: Dimension,
{
    D::NDIM
        .checked_sub(O::NDIM)
        .ok_or_else(|| layout_mismatch("opaque view has more axes than the typed view"))
}

fn check_element<T>(format: &NdFormat) -> Result<()>
where
    T: Element,
{
    if format.elem_size() != mem::size_of::<T>() {
        return Err(layout_mismatch("element size differs from the frame format"));
    }

    if format.elem_alignment() != mem::align_of::<T>() {
        return Err(layout_mismatch("element alignment differs from the frame format"));
    }

    Ok(())
}

fn layout_mismatch(reason: &'static str) -> Error {
    tracing::debug!(reason, "rejected cast");
    Error::LayoutMismatch { reason }
}

fn rejected(error: Error) -> Error {
    tracing::debug!(%error, "rejected cast");
    error
}
