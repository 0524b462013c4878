use thiserror::Error;

/// Errors raised by view operations.
///
/// Every error is raised at the point of the offending call, the view the
/// operation was called on is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A coordinate or slice index outside of the extent of an axis.
    #[error("index {index} is out of range for axis {axis} with extent {extent}")]
    OutOfRange {
        /// The axis being indexed.
        axis: usize,
        /// The offending index.
        index: isize,
        /// The extent of the axis.
        extent: isize,
    },
    /// A section which is not contained in the extent of an axis.
    #[error("section {start}..{end} is out of range for axis {axis} with extent {extent}")]
    SectionOutOfRange {
        /// The axis being sectioned.
        axis: usize,
        /// Start of the section.
        start: isize,
        /// End of the section.
        end: isize,
        /// The extent of the axis.
        extent: isize,
    },
    /// An axis which the view does not have.
    #[error("axis {axis} is out of range for a view with {ndim} dimensions")]
    AxisOutOfRange {
        /// The offending axis.
        axis: usize,
        /// The number of dimensions of the view.
        ndim: usize,
    },
    /// A step of zero was used to section an axis.
    #[error("zero step used for axis {axis}")]
    ZeroStep {
        /// The offending axis.
        axis: usize,
    },
    /// A shape with a negative extent.
    #[error("negative extent {extent} for axis {axis}")]
    NegativeExtent {
        /// The offending axis.
        axis: usize,
        /// The offending extent.
        extent: isize,
    },
    /// Two views of differing shape were combined.
    #[error("shape mismatch: {left:?} and {right:?}")]
    ShapeMismatch {
        /// Shape of the receiving view.
        left: Vec<isize>,
        /// Shape of the argument view.
        right: Vec<isize>,
    },
    /// Two opaque views disagreeing on their frame size were combined.
    #[error("frame format mismatch: frame size {left} and {right}")]
    FormatMismatch {
        /// Frame size of the receiving view.
        left: usize,
        /// Frame size of the argument view.
        right: usize,
    },
    /// A cast between a frame format and an element type which disagree on
    /// their layout.
    #[error("layout mismatch: {reason}")]
    LayoutMismatch {
        /// What about the layout disagreed.
        reason: &'static str,
    },
    /// A slice too small to hold the described view.
    #[error("buffer of {len} bytes is too small, {required} bytes required")]
    BufferTooSmall {
        /// Bytes required by the view.
        required: usize,
        /// Bytes available in the buffer.
        len: usize,
    },
    /// An operation other than the null check on a null view.
    #[error("operation on null view")]
    NullView,
    /// A time label outside of the span of a timed view.
    #[error("time {time} is out of range {start}..{end}")]
    TimeOutOfRange {
        /// The offending time.
        time: i64,
        /// Start time of the view.
        start: i64,
        /// End time of the view.
        end: i64,
    },
    /// The time axis of a timed view cannot be removed while keeping time
    /// labels.
    #[error("axis 0 carries time and cannot be sliced on a timed view")]
    TimeAxis,
}

/// The re-exported error type.
pub type Result<T, E = Error> = ::std::result::Result<T, E>;
