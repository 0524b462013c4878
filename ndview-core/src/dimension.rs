//! Dimension vocabulary shared by shapes, strides and coordinates.
//!
//! Every one of these is a `[isize; N]`. Shapes are required to be
//! non-negative by the views which consume them, strides and coordinates are
//! freely signed.

use core::fmt;
use core::hash::Hash;

/// The largest dimension count with [RemoveAxis] or [InsertAxis]
/// relationships defined.
pub const MAX_NDIM: usize = 6;

/// A fixed-size tuple of signed integers, one per axis.
///
/// # Examples
///
/// ```
/// use ndview_core::Dimension;
///
/// let shape = [10isize, 3, 4];
/// assert_eq!(<[isize; 3]>::NDIM, 3);
/// assert_eq!(shape.size(), 120);
/// assert_eq!(<[isize; 2]>::from_slice(&[1, 2]), Some([1, 2]));
/// ```
pub trait Dimension: Copy + Eq + Hash + fmt::Debug + AsRef<[isize]> + AsMut<[isize]> + 'static {
    /// The number of axes.
    const NDIM: usize;

    /// All axes set to zero.
    fn zeros() -> Self;

    /// All axes set to `value`.
    fn splat(value: isize) -> Self;

    /// Construct from a slice of exactly [NDIM][Dimension::NDIM] values.
    fn from_slice(values: &[isize]) -> Option<Self>;

    /// Construct by concatenating `head` and `tail`, which must together
    /// contain exactly [NDIM][Dimension::NDIM] values.
    fn from_parts(head: &[isize], tail: &[isize]) -> Option<Self> {
        if head.len() + tail.len() != Self::NDIM {
            return None;
        }

        let mut out = Self::zeros();
        let (a, b) = out.as_mut().split_at_mut(head.len());
        a.copy_from_slice(head);
        b.copy_from_slice(tail);
        Some(out)
    }

    /// Access the axes as a slice.
    #[inline]
    fn as_slice(&self) -> &[isize] {
        self.as_ref()
    }

    /// Access the axes as a mutable slice.
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [isize] {
        self.as_mut()
    }

    /// Product of all axes, treating negative values as zero.
    ///
    /// The product of zero axes is one.
    fn size(&self) -> usize {
        self.as_slice()
            .iter()
            .map(|&n| n.max(0) as usize)
            .product()
    }
}

impl<const N: usize> Dimension for [isize; N] {
    const NDIM: usize = N;

    #[inline]
    fn zeros() -> Self {
        [0; N]
    }

    #[inline]
    fn splat(value: isize) -> Self {
        [value; N]
    }

    #[inline]
    fn from_slice(values: &[isize]) -> Option<Self> {
        values.try_into().ok()
    }
}

/// A dimension which has a dimension one smaller than itself.
pub trait RemoveAxis: Dimension {
    /// The dimension with one axis removed.
    type Smaller: Dimension;

    /// Remove the given axis.
    ///
    /// Axes past the end are ignored, in which case the result holds the
    /// leading axes.
    ///
    /// ```
    /// use ndview_core::RemoveAxis;
    ///
    /// assert_eq!([1isize, 2, 3].remove_axis(1), [1, 3]);
    /// ```
    fn remove_axis(&self, axis: usize) -> Self::Smaller {
        let mut out = Self::Smaller::zeros();
        let slots = out.as_mut_slice();
        let mut n = 0;

        for (i, &value) in self.as_slice().iter().enumerate() {
            if i == axis || n == slots.len() {
                continue;
            }

            slots[n] = value;
            n += 1;
        }

        out
    }
}

/// A dimension which has a dimension one larger than itself.
pub trait InsertAxis: Dimension {
    /// The dimension with one extra axis.
    type Larger: Dimension;

    /// Append an innermost axis.
    ///
    /// ```
    /// use ndview_core::InsertAxis;
    ///
    /// assert_eq!([1isize, 2].push(8), [1, 2, 8]);
    /// ```
    fn push(&self, value: isize) -> Self::Larger {
        let mut out = Self::Larger::zeros();
        let slots = out.as_mut_slice();
        slots[..Self::NDIM].copy_from_slice(self.as_slice());
        slots[Self::NDIM] = value;
        out
    }
}

// Helper macro to wire up the smaller/larger relationship between two
// dimension counts.
macro_rules! impl_axis {
    ($($small:literal <=> $large:literal),* $(,)?) => {
        $(
            impl RemoveAxis for [isize; $large] {
                type Smaller = [isize; $small];
            }

            impl InsertAxis for [isize; $small] {
                type Larger = [isize; $large];
            }
        )*
    };
}

impl_axis!(0 <=> 1, 1 <=> 2, 2 <=> 3, 3 <=> 4, 4 <=> 5, 5 <=> 6);

/// A half-open coordinate range `[start, end)` per axis.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span<D> {
    /// Inclusive start coordinate.
    pub start: D,
    /// Exclusive end coordinate.
    pub end: D,
}

impl<D> Span<D>
where
    D: Dimension,
{
    /// Construct a new span.
    pub fn new(start: D, end: D) -> Self {
        Self { start, end }
    }

    /// The span covering the whole of `shape`.
    ///
    /// ```
    /// use ndview_core::Span;
    ///
    /// let span = Span::full([4isize, 5]);
    /// assert_eq!(span.start, [0, 0]);
    /// assert_eq!(span.shape(), [4, 5]);
    /// ```
    pub fn full(shape: D) -> Self {
        Self {
            start: D::zeros(),
            end: shape,
        }
    }

    /// The extent of the span along every axis, clamped at zero.
    pub fn shape(&self) -> D {
        let mut out = D::zeros();

        for ((o, s), e) in out
            .as_mut_slice()
            .iter_mut()
            .zip(self.start.as_slice())
            .zip(self.end.as_slice())
        {
            *o = (e - s).max(0);
        }

        out
    }

    /// Number of coordinates in the span.
    pub fn size(&self) -> usize {
        self.shape().size()
    }

    /// Test if the span contains the given coordinate.
    pub fn contains(&self, coord: &D) -> bool {
        coord
            .as_slice()
            .iter()
            .zip(self.start.as_slice())
            .zip(self.end.as_slice())
            .all(|((c, s), e)| s <= c && c < e)
    }
}

impl<D> fmt::Debug for Span<D>
where
    D: Dimension,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start.as_slice(), self.end.as_slice())
    }
}

/// Row-major iterator over every coordinate inside of a shape.
///
/// The last axis varies fastest. A shape with a zero extent yields nothing,
/// the zero-dimensional shape yields exactly one empty coordinate.
///
/// ```
/// use ndview_core::Indices;
///
/// let all = Indices::new([2isize, 2]).collect::<Vec<_>>();
/// assert_eq!(all, [[0, 0], [0, 1], [1, 0], [1, 1]]);
/// ```
#[derive(Clone)]
pub struct Indices<D> {
    shape: D,
    next: Option<D>,
}

impl<D> Indices<D>
where
    D: Dimension,
{
    /// Construct an iterator over all coordinates in `shape`.
    pub fn new(shape: D) -> Self {
        let next = if shape.as_slice().iter().all(|&n| n > 0) {
            Some(D::zeros())
        } else {
            None
        };

        Self { shape, next }
    }
}

impl<D> Iterator for Indices<D>
where
    D: Dimension,
{
    type Item = D;

    fn next(&mut self) -> Option<D> {
        let current = self.next?;
        let mut next = current;
        let mut carried = true;

        for (c, &n) in next
            .as_mut_slice()
            .iter_mut()
            .zip(self.shape.as_slice())
            .rev()
        {
            *c += 1;

            if *c < n {
                carried = false;
                break;
            }

            *c = 0;
        }

        self.next = if carried { None } else { Some(next) };
        Some(current)
    }
}
