use crate::{Result, View};

/// A view being sectioned one axis at a time, starting from axis 0.
///
/// Every operation consumes the current axis and moves on to the next one.
///
/// See [View::fcall].
///
/// ```
/// use ndview::{StridedView, View};
///
/// let data = (0u32..24).collect::<Vec<_>>();
/// let view = StridedView::from_slice(&data, [2, 3, 4])?;
///
/// let section = view.fcall().index(1)?.all().step_range(0, 4, 2)?.into_view();
/// assert_eq!(section.shape(), [1, 3, 2]);
/// assert_eq!(section.get([0, 2, 1])?, 22);
/// # Ok::<_, ndview::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct AxisCall<V> {
    view: V,
    axis: usize,
}

impl<V> AxisCall<V>
where
    V: View,
{
    /// Construct a new axis call positioned at axis 0.
    pub(crate) fn new(view: V) -> Self {
        Self { view, axis: 0 }
    }

    /// The axis the next operation applies to.
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Section the current axis over `start..end`.
    pub fn range(self, start: isize, end: isize) -> Result<Self> {
        self.step_range(start, end, 1)
    }

    /// Section the current axis over `start..end` with `step`.
    pub fn step_range(self, start: isize, end: isize, step: isize) -> Result<Self> {
        let view = self.view.axis_section(self.axis, start, end, step)?;

        Ok(Self {
            view,
            axis: self.axis + 1,
        })
    }

    /// Section the current axis to the single coordinate `index`, keeping
    /// the axis with an extent of one.
    pub fn index(self, index: isize) -> Result<Self> {
        self.range(index, index + 1)
    }

    /// Leave the current axis as it is.
    pub fn all(self) -> Self {
        Self {
            view: self.view,
            axis: self.axis + 1,
        }
    }

    /// Finish, returning the sectioned view.
    #[inline]
    pub fn into_view(self) -> V {
        self.view
    }
}
