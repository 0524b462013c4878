//! Circularly indexed views, the mechanism behind ring buffers of frames.

use core::fmt;

use ndview_core::{
    check_axis, stepped_len, stepped_origin, Dimension, Error, Indices, Mut, Mutability,
    RemoveAxis, Result, SliceView, View,
};

use crate::strided::{check_same_shape, StridedView};

/// Wrap `base` so that axis `i` covers the logical range `start[i]..end[i]`
/// traversed with `steps[i]`, remapped onto the raw extent of the axis.
///
/// See [WrapView::new].
pub fn wraparound<V>(base: V, start: V::Dim, end: V::Dim, steps: V::Dim) -> Result<WrapView<V>>
where
    V: View,
{
    WrapView::new(base, start, end, steps)
}

/// A view presenting a circularly indexed window over another view.
///
/// Every axis carries its own affine map from logical to raw coordinates:
/// logical index `k` lands on the raw index `origin + k * step`, reduced
/// modulo the raw extent of the axis. The logical range may extend past the
/// raw extent in either direction and may be traversed backwards, so unlike
/// the base view a wraparound view never rejects an index for being out of
/// range.
pub struct WrapView<V>
where
    V: View,
{
    base: V,
    origin: V::Dim,
    steps: V::Dim,
    shape: V::Dim,
}

impl<V> WrapView<V>
where
    V: View,
{
    /// Construct a wraparound view over `base`.
    ///
    /// Axis `i` covers `start[i]..end[i]` stepped by `steps[i]`, with the
    /// logical extent `ceil((end[i] - start[i]) / |steps[i]|)`. A negative step
    /// traverses the range from `end[i] - 1` downwards.
    ///
    /// ```
    /// use ndview::{wraparound, StridedView};
    ///
    /// let data = (0u32..120).collect::<Vec<_>>();
    /// let raw = StridedView::from_slice(&data, [10, 3, 4])?;
    /// let view = wraparound(raw, [-3, 2, 1], [2, 7, 3], [1, 2, -1])?;
    ///
    /// assert_eq!(view.shape(), [5, 3, 2]);
    /// assert_eq!(view.get([0, 0, 0])?, raw.get([7, 2, 2])?);
    /// assert_eq!(view.get([0, 1, 0])?, raw.get([7, 1, 2])?);
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn new(base: V, start: V::Dim, end: V::Dim, steps: V::Dim) -> Result<Self> {
        if base.is_null() {
            return Err(Error::NullView);
        }

        let raw = base.shape();
        let mut origin = V::Dim::zeros();
        let mut shape = V::Dim::zeros();

        for axis in 0..V::Dim::NDIM {
            let s = start.as_slice()[axis];
            let e = end.as_slice()[axis];
            let step = steps.as_slice()[axis];
            let extent = raw.as_slice()[axis];

            if step == 0 {
                return Err(Error::ZeroStep { axis });
            }

            let len = stepped_len(s, e, step);

            if e < s || (len > 0 && extent == 0) {
                return Err(Error::SectionOutOfRange {
                    axis,
                    start: s,
                    end: e,
                    extent,
                });
            }

            origin.as_mut_slice()[axis] = stepped_origin(s, e, step);
            shape.as_mut_slice()[axis] = len;
        }

        Ok(Self {
            base,
            origin,
            steps,
            shape,
        })
    }

    /// Wrap `base` without remapping any axis.
    pub fn identity(base: V) -> Result<Self> {
        let shape = base.shape();
        Self::new(base, V::Dim::zeros(), shape, V::Dim::splat(1))
    }

    /// Construct from an already normalized descriptor.
    pub(crate) fn from_parts(base: V, origin: V::Dim, steps: V::Dim, shape: V::Dim) -> Self {
        Self {
            base,
            origin,
            steps,
            shape,
        }
    }

    /// Test if this is a null view.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.base.is_null()
    }

    /// The wrapped view.
    #[inline]
    pub fn base_view(&self) -> &V {
        &self.base
    }

    /// The logical extent along every axis.
    #[inline]
    pub fn shape(&self) -> V::Dim {
        self.shape
    }

    /// The number of logical elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// The raw extent along every axis, as given by the wrapped view.
    #[inline]
    pub fn raw_shape(&self) -> V::Dim {
        self.base.shape()
    }

    /// The unreduced raw index of logical index zero along every axis.
    #[inline]
    pub fn wrap_origin(&self) -> V::Dim {
        self.origin
    }

    /// The logical step along every axis.
    #[inline]
    pub fn wrap_steps(&self) -> V::Dim {
        self.steps
    }

    /// The canonical inclusive start of the logical range of every axis.
    ///
    /// Together with [wrap_end] and [wrap_steps] this reconstructs an
    /// equivalent view through [WrapView::new].
    ///
    /// [wrap_end]: WrapView::wrap_end
    /// [wrap_steps]: WrapView::wrap_steps
    pub fn wrap_start(&self) -> V::Dim {
        self.map_axes(|origin, step, len| {
            if step < 0 && len > 0 {
                origin + (len - 1) * step
            } else {
                origin
            }
        })
    }

    /// The canonical exclusive end of the logical range of every axis.
    pub fn wrap_end(&self) -> V::Dim {
        self.map_axes(|origin, step, len| {
            if len == 0 {
                origin
            } else if step < 0 {
                origin + 1
            } else {
                origin + (len - 1) * step + 1
            }
        })
    }

    /// Translate a logical coordinate into the raw coordinate of the wrapped
    /// view.
    ///
    /// The result is always within the raw extent. Fails only for axes whose
    /// raw extent is zero.
    pub fn physical(&self, coord: V::Dim) -> Result<V::Dim> {
        let mut out = V::Dim::zeros();

        for axis in 0..V::Dim::NDIM {
            out.as_mut_slice()[axis] = self.physical_index(axis, coord.as_slice()[axis])?;
        }

        Ok(out)
    }

    fn physical_index(&self, axis: usize, index: isize) -> Result<isize> {
        let extent = self.base.shape().as_slice()[axis];

        if extent == 0 {
            return Err(Error::OutOfRange {
                axis,
                index,
                extent,
            });
        }

        let raw = self.origin.as_slice()[axis] + index * self.steps.as_slice()[axis];
        Ok(raw.rem_euclid(extent))
    }

    /// Test if the logical range of `axis` crosses the raw extent, in which
    /// case some raw index is reached through wrapping.
    pub fn axis_wraps(&self, axis: usize) -> Result<bool> {
        check_axis::<V::Dim>(axis)?;

        let len = self.shape.as_slice()[axis];

        if len == 0 {
            return Ok(false);
        }

        let first = self.origin.as_slice()[axis];
        let last = first + (len - 1) * self.steps.as_slice()[axis];
        let extent = self.base.shape().as_slice()[axis];
        Ok(first.min(last) < 0 || first.max(last) >= extent)
    }

    /// The address of the element at logical coordinate zero.
    pub fn start(&self) -> *const u8 {
        if self.size() == 0 {
            return self.base.start();
        }

        match self.at(V::Dim::zeros()) {
            Ok(point) => point.start(),
            Err(..) => self.base.start(),
        }
    }

    /// Index every axis at a logical coordinate.
    pub fn at(&self, coord: V::Dim) -> Result<V::Point> {
        self.base.at(self.physical(coord)?)
    }

    /// Fix `axis` to the logical `index`, producing a wraparound view of one
    /// dimension less.
    pub fn slice(&self, index: isize, axis: usize) -> Result<WrapView<V::Slice>>
    where
        V: SliceView,
        V::Dim: RemoveAxis<Smaller = <V::Slice as View>::Dim>,
    {
        check_axis::<V::Dim>(axis)?;
        let base = self.base.slice(self.physical_index(axis, index)?, axis)?;

        Ok(WrapView {
            base,
            origin: self.origin.remove_axis(axis),
            steps: self.steps.remove_axis(axis),
            shape: self.shape.remove_axis(axis),
        })
    }

    /// Section the logical range of `axis` over `start..end` with `step`.
    ///
    /// The section is composed with the existing affine map of the axis, so
    /// repeated sectioning stays exact. The range is not required to lie
    /// within the logical extent.
    pub fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self> {
        check_axis::<V::Dim>(axis)?;

        if step == 0 {
            return Err(Error::ZeroStep { axis });
        }

        if end < start {
            return Err(Error::SectionOutOfRange {
                axis,
                start,
                end,
                extent: self.shape.as_slice()[axis],
            });
        }

        let mut out = self.clone();
        let old_step = self.steps.as_slice()[axis];
        out.origin.as_mut_slice()[axis] += stepped_origin(start, end, step) * old_step;
        out.steps.as_mut_slice()[axis] = old_step * step;
        out.shape.as_mut_slice()[axis] = stepped_len(start, end, step);
        Ok(out)
    }

    /// Section every logical axis over `start..end` with `steps`.
    pub fn section(&self, start: V::Dim, end: V::Dim, steps: V::Dim) -> Result<Self> {
        View::section(self, start, end, steps)
    }

    /// Replace the wrapped view and every wraparound triple with those of
    /// `other`.
    pub fn reset(&mut self, other: Self) {
        tracing::trace!(
            shape = ?other.shape,
            origin = ?other.origin,
            steps = ?other.steps,
            "reset wraparound view"
        );

        *self = other;
    }

    /// Test if both views wrap the same view with the same descriptors.
    pub fn same(&self, other: &Self) -> bool {
        self.base.same(&other.base)
            && self.origin == other.origin
            && self.steps == other.steps
            && self.shape == other.shape
    }

    fn map_axes(&self, f: impl Fn(isize, isize, isize) -> isize) -> V::Dim {
        let mut out = V::Dim::zeros();

        for axis in 0..V::Dim::NDIM {
            out.as_mut_slice()[axis] = f(
                self.origin.as_slice()[axis],
                self.steps.as_slice()[axis],
                self.shape.as_slice()[axis],
            );
        }

        out
    }
}

impl<'a, T, D, M> WrapView<StridedView<'a, T, D, M>>
where
    D: Dimension,
    M: Mutability,
{
    /// Read the element at a logical coordinate.
    pub fn get(&self, coord: D) -> Result<T>
    where
        T: Copy,
    {
        self.base.get(self.physical(coord)?)
    }

    /// Deep comparison of every logical element against `other`.
    pub fn compare<N>(&self, other: &WrapView<StridedView<'_, T, D, N>>) -> Result<bool>
    where
        T: PartialEq + Copy,
        N: Mutability,
    {
        check_same_shape(&self.shape, &other.shape)?;

        for coord in Indices::new(self.shape) {
            if self.get(coord)? != other.get(coord)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Iterate over the logical elements in row-major order.
    pub fn iter(&self) -> WrapIter<'a, T, D, M> {
        WrapIter {
            view: *self,
            indices: Indices::new(self.shape),
        }
    }
}

impl<'a, T, D> WrapView<StridedView<'a, T, D, Mut>>
where
    D: Dimension,
{
    /// Write `value` to the element at a logical coordinate.
    pub fn set(&self, coord: D, value: T) -> Result<()>
    where
        T: Copy,
    {
        self.base.set(self.physical(coord)?, value)
    }
}

impl<V> Clone for WrapView<V>
where
    V: View,
{
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            origin: self.origin,
            steps: self.steps,
            shape: self.shape,
        }
    }
}

impl<V> Copy for WrapView<V> where V: View + Copy {}

impl<V> View for WrapView<V>
where
    V: View,
{
    type Dim = V::Dim;
    type Point = V::Point;

    #[inline]
    fn is_null(&self) -> bool {
        WrapView::is_null(self)
    }

    fn start(&self) -> *const u8 {
        WrapView::start(self)
    }

    #[inline]
    fn shape(&self) -> V::Dim {
        self.shape
    }

    fn at(&self, coord: V::Dim) -> Result<V::Point> {
        WrapView::at(self, coord)
    }

    fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self> {
        WrapView::axis_section(self, axis, start, end, step)
    }

    fn same(&self, other: &Self) -> bool {
        WrapView::same(self, other)
    }
}

impl<V> SliceView for WrapView<V>
where
    V: SliceView,
    V::Dim: RemoveAxis<Smaller = <V::Slice as View>::Dim>,
{
    type Slice = WrapView<V::Slice>;

    fn slice(&self, index: isize, axis: usize) -> Result<Self::Slice> {
        WrapView::slice(self, index, axis)
    }
}

/// Wraparound views are equal when their descriptors are, see
/// [WrapView::same]. Use [WrapView::compare] for deep comparison.
impl<V> PartialEq for WrapView<V>
where
    V: View,
{
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<V> fmt::Debug for WrapView<V>
where
    V: View + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapView")
            .field("base", &self.base)
            .field("origin", &self.origin.as_slice())
            .field("steps", &self.steps.as_slice())
            .field("shape", &self.shape.as_slice())
            .finish()
    }
}

/// An iterator over the elements of a wraparound view, see
/// [WrapView::iter].
pub struct WrapIter<'a, T, D, M>
where
    D: Dimension,
    M: Mutability,
{
    view: WrapView<StridedView<'a, T, D, M>>,
    indices: Indices<D>,
}

impl<T, D, M> Iterator for WrapIter<'_, T, D, M>
where
    T: Copy,
    D: Dimension,
    M: Mutability,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let coord = self.indices.next()?;
        Some(self.view.get(coord))
    }
}
