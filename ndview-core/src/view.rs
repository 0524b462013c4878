//! The traits every view layer implements.

use crate::{AxisCall, Dimension, Error, Result};

/// The strided view contract.
///
/// Implemented by the base views and by the decorators wrapping them, so that
/// a decorator can itself be decorated. Views are cheap descriptor values,
/// cloning one never touches the memory it describes.
pub trait View: Clone {
    /// The shape, strides and coordinate type of the view.
    type Dim: Dimension;

    /// The zero-dimensional view produced when indexing every axis.
    type Point: View<Dim = [isize; 0]>;

    /// Test if this is a null view, which describes no memory.
    fn is_null(&self) -> bool;

    /// The address of the element at the origin of the view.
    fn start(&self) -> *const u8;

    /// The extent along every axis.
    fn shape(&self) -> Self::Dim;

    /// The number of elements in the view.
    fn size(&self) -> usize {
        self.shape().size()
    }

    /// Index every axis of the view.
    fn at(&self, coord: Self::Dim) -> Result<Self::Point>;

    /// Section a single axis over `start..end` with the given `step`.
    ///
    /// A negative step traverses the range from `end - 1` downwards.
    fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self>;

    /// Section every axis over `start..end` with the given `steps`.
    fn section(&self, start: Self::Dim, end: Self::Dim, steps: Self::Dim) -> Result<Self> {
        let mut out = self.clone();

        for axis in 0..Self::Dim::NDIM {
            out = out.axis_section(
                axis,
                start.as_slice()[axis],
                end.as_slice()[axis],
                steps.as_slice()[axis],
            )?;
        }

        Ok(out)
    }

    /// Test if both views have identical descriptors.
    ///
    /// This is not deep comparison, two views describing the same elements
    /// through different descriptors are not the same.
    fn same(&self, other: &Self) -> bool;

    /// Start sectioning the view one axis at a time.
    fn fcall(&self) -> AxisCall<Self> {
        AxisCall::new(self.clone())
    }
}

/// A view which can fix one axis to an index, producing a view of one
/// dimension less.
pub trait SliceView: View {
    /// The view with one axis removed.
    type Slice: View;

    /// Fix `axis` to `index`.
    fn slice(&self, index: isize, axis: usize) -> Result<Self::Slice>;
}

/// Check that `axis` exists in a view of dimension `D`.
pub fn check_axis<D>(axis: usize) -> Result<()>
where
    D: Dimension,
{
    if axis >= D::NDIM {
        return Err(Error::AxisOutOfRange {
            axis,
            ndim: D::NDIM,
        });
    }

    Ok(())
}

/// Check that all extents of `shape` are non-negative.
pub fn check_shape<D>(shape: &D) -> Result<()>
where
    D: Dimension,
{
    match shape.as_slice().iter().position(|&n| n < 0) {
        Some(axis) => Err(Error::NegativeExtent {
            axis,
            extent: shape.as_slice()[axis],
        }),
        None => Ok(()),
    }
}

/// The number of elements in `start..end` visited with `step`, which must be
/// non-zero.
///
/// ```
/// assert_eq!(ndview_core::stepped_len(0, 5, 2), 3);
/// assert_eq!(ndview_core::stepped_len(1, 3, -1), 2);
/// assert_eq!(ndview_core::stepped_len(3, 1, 1), 0);
/// ```
pub fn stepped_len(start: isize, end: isize, step: isize) -> isize {
    let len = (end - start).max(0);
    let step = step.abs();
    (len + step - 1) / step
}

/// The first index visited when traversing `start..end` with `step`.
///
/// ```
/// assert_eq!(ndview_core::stepped_origin(1, 3, 1), 1);
/// assert_eq!(ndview_core::stepped_origin(1, 3, -1), 2);
/// ```
pub fn stepped_origin(start: isize, end: isize, step: isize) -> isize {
    if step < 0 && end > start {
        end - 1
    } else {
        start
    }
}
