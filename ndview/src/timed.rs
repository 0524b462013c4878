//! Wraparound views whose first axis carries absolute time labels.

use core::fmt;

use ndview_core::{
    check_axis, stepped_origin, Dimension, Error, Mutability, RemoveAxis, Result, SliceView, Time,
    View,
};

use crate::strided::StridedView;
use crate::wrap::WrapView;

/// Bind axis 0 of `view` to time labels starting at `start_time`.
///
/// See [TimedView::new].
pub fn timed<V>(view: WrapView<V>, start_time: Time) -> Result<TimedView<V>>
where
    V: View,
{
    TimedView::new(view, start_time)
}

/// A wraparound view whose axis 0 is labelled with absolute times.
///
/// Local coordinate `c` along axis 0 carries the time `start_time + c`.
/// Sectioning axis 0 re-derives the start time, so labels stay consistent
/// with the stream the view was taken from however often it is sectioned.
pub struct TimedView<V>
where
    V: View,
{
    wrap: WrapView<V>,
    start_time: Time,
}

impl<V> TimedView<V>
where
    V: View,
{
    /// Label axis 0 of `view` starting at `start_time`.
    ///
    /// Fails with [Error::AxisOutOfRange] for zero-dimensional views, which
    /// have no axis to carry time.
    ///
    /// ```
    /// use ndview::{timed, wraparound, StridedView};
    ///
    /// let data = (0u32..120).collect::<Vec<_>>();
    /// let raw = StridedView::from_slice(&data, [10, 3, 4])?;
    /// let view = timed(wraparound(raw, [-3, 2, 1], [2, 7, 3], [1, 2, -1])?, 100)?;
    ///
    /// assert_eq!(view.duration(), 5);
    /// assert_eq!(view.end_time(), 105);
    /// assert_eq!(view.time_to_coordinate(102)?, 2);
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn new(wrap: WrapView<V>, start_time: Time) -> Result<Self> {
        check_axis::<V::Dim>(0)?;
        Ok(Self { wrap, start_time })
    }

    /// Test if this is a null view.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.wrap.is_null()
    }

    /// The time of local coordinate zero along axis 0.
    #[inline]
    pub fn start_time(&self) -> Time {
        self.start_time
    }

    /// The exclusive end time.
    #[inline]
    pub fn end_time(&self) -> Time {
        self.start_time + self.duration()
    }

    /// The extent of axis 0.
    #[inline]
    pub fn duration(&self) -> Time {
        self.wrap.shape().as_slice()[0] as Time
    }

    /// The local coordinate along axis 0 of `time`.
    ///
    /// Fails with [Error::TimeOutOfRange] if `time` is outside of
    /// `start_time..end_time`.
    pub fn time_to_coordinate(&self, time: Time) -> Result<isize> {
        if time < self.start_time || time >= self.end_time() {
            return Err(Error::TimeOutOfRange {
                time,
                start: self.start_time,
                end: self.end_time(),
            });
        }

        Ok((time - self.start_time) as isize)
    }

    /// The time carried by the local coordinate `coord` along axis 0.
    #[inline]
    pub fn coordinate_to_time(&self, coord: isize) -> Time {
        coord as Time + self.start_time
    }

    /// The logical extent along every axis.
    #[inline]
    pub fn shape(&self) -> V::Dim {
        self.wrap.shape()
    }

    /// The number of logical elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.wrap.size()
    }

    /// The address of the element at logical coordinate zero.
    pub fn start(&self) -> *const u8 {
        self.wrap.start()
    }

    /// The underlying wraparound view, without time labels.
    #[inline]
    pub fn non_timed(&self) -> WrapView<V> {
        self.wrap.clone()
    }

    /// Index every axis at a logical coordinate.
    pub fn at(&self, coord: V::Dim) -> Result<V::Point> {
        self.wrap.at(coord)
    }

    /// Index axis 0 at the local coordinate `coord`, dropping the time
    /// labels with the axis that carried them.
    pub fn index(&self, coord: isize) -> Result<WrapView<V::Slice>>
    where
        V: SliceView,
        V::Dim: RemoveAxis<Smaller = <V::Slice as View>::Dim>,
    {
        self.wrap.slice(coord, 0)
    }

    /// Index axis 0 at `time`.
    pub fn at_time(&self, time: Time) -> Result<WrapView<V::Slice>>
    where
        V: SliceView,
        V::Dim: RemoveAxis<Smaller = <V::Slice as View>::Dim>,
    {
        self.index(self.time_to_coordinate(time)?)
    }

    /// Section axis 0 over the times `start..end`.
    ///
    /// Fails with [Error::TimeOutOfRange] unless
    /// `start_time <= start <= end <= end_time`.
    pub fn tsection(&self, start: Time, end: Time) -> Result<Self> {
        for time in [start, end] {
            if time < self.start_time || time > self.end_time() || end < start {
                return Err(Error::TimeOutOfRange {
                    time,
                    start: self.start_time,
                    end: self.end_time(),
                });
            }
        }

        let start = (start - self.start_time) as isize;
        let end = (end - self.start_time) as isize;
        self.axis_section(0, start, end, 1)
    }

    /// Fix `axis`, which must not be the time axis, to the logical `index`.
    ///
    /// Fails with [Error::TimeAxis] for axis 0, see [TimedView::index].
    pub fn slice(&self, index: isize, axis: usize) -> Result<TimedView<V::Slice>>
    where
        V: SliceView,
        V::Dim: RemoveAxis<Smaller = <V::Slice as View>::Dim>,
    {
        if axis == 0 {
            return Err(Error::TimeAxis);
        }

        Ok(TimedView {
            wrap: self.wrap.slice(index, axis)?,
            start_time: self.start_time,
        })
    }

    /// Section the logical range of `axis` over `start..end` with `step`.
    ///
    /// Sectioning axis 0 moves the start time to the time of the first
    /// visited coordinate, so that the frame at coordinate zero of the section
    /// keeps its label. For negative steps that is `end - 1` and not `start`.
    /// Labels of a reversed section still increase along its axis, so only its
    /// first frame carries its original time.
    pub fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self> {
        let wrap = self.wrap.axis_section(axis, start, end, step)?;

        let start_time = if axis == 0 {
            self.coordinate_to_time(stepped_origin(start, end, step))
        } else {
            self.start_time
        };

        Ok(Self { wrap, start_time })
    }

    /// Section every logical axis over `start..end` with `steps`.
    pub fn section(&self, start: V::Dim, end: V::Dim, steps: V::Dim) -> Result<Self> {
        View::section(self, start, end, steps)
    }

    /// Replace the wraparound view and start time with those of `other`.
    pub fn reset(&mut self, other: Self) {
        tracing::trace!(start_time = other.start_time, "reset timed view");
        *self = other;
    }

    /// Test if both views have the same descriptors and start time.
    pub fn same(&self, other: &Self) -> bool {
        self.wrap.same(&other.wrap) && self.start_time == other.start_time
    }
}

impl<'a, T, D, M> TimedView<StridedView<'a, T, D, M>>
where
    D: Dimension,
    M: Mutability,
{
    /// Read the element at a logical coordinate.
    pub fn get(&self, coord: D) -> Result<T>
    where
        T: Copy,
    {
        self.wrap.get(coord)
    }
}

impl<V> Clone for TimedView<V>
where
    V: View,
{
    fn clone(&self) -> Self {
        Self {
            wrap: self.wrap.clone(),
            start_time: self.start_time,
        }
    }
}

impl<V> Copy for TimedView<V> where V: View + Copy {}

impl<V> View for TimedView<V>
where
    V: View,
{
    type Dim = V::Dim;
    type Point = V::Point;

    #[inline]
    fn is_null(&self) -> bool {
        TimedView::is_null(self)
    }

    fn start(&self) -> *const u8 {
        TimedView::start(self)
    }

    #[inline]
    fn shape(&self) -> V::Dim {
        TimedView::shape(self)
    }

    fn at(&self, coord: V::Dim) -> Result<V::Point> {
        TimedView::at(self, coord)
    }

    fn axis_section(&self, axis: usize, start: isize, end: isize, step: isize) -> Result<Self> {
        TimedView::axis_section(self, axis, start, end, step)
    }

    fn same(&self, other: &Self) -> bool {
        TimedView::same(self, other)
    }
}

/// Timed views are equal when their descriptors and start times are, see
/// [TimedView::same].
impl<V> PartialEq for TimedView<V>
where
    V: View,
{
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<V> fmt::Debug for TimedView<V>
where
    V: View + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedView")
            .field("wrap", &self.wrap)
            .field("start_time", &self.start_time)
            .finish()
    }
}
