//! Frame formats understood by opaque views.
//!
//! * [RawFormat] describes frames of opaque bytes.
//! * [NdFormat] describes frames which are themselves small strided arrays of
//!   fixed-size elements, this is what casts between typed and opaque views
//!   synthesize and validate against.

use core::fmt;
use core::mem;
use core::ptr;
use core::slice;

use ndview_core::{check_shape, Element, Error, FrameFormat, Result, MAX_NDIM};

/// A frame of `size` opaque bytes.
///
/// ```
/// use ndview::{FrameFormat, RawFormat};
///
/// let format = RawFormat::new(4);
/// assert_eq!(format.frame_size(), 4);
/// assert!(format.is_compatible(&RawFormat::new(4)));
/// assert!(!format.is_compatible(&RawFormat::new(2)));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RawFormat {
    size: usize,
}

impl RawFormat {
    /// Construct a raw format of `size` bytes.
    pub const fn new(size: usize) -> Self {
        Self { size }
    }
}

impl FrameFormat for RawFormat {
    #[inline]
    fn frame_size(&self) -> usize {
        self.size
    }
}

/// A frame which is an array of fixed-size elements.
///
/// Element strides are in bytes and must be positive, so that the elements
/// of a frame occupy the byte range `0..frame_size` in increasing order. The
/// frame size is the number of bytes from the first element to the end of
/// the last one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NdFormat {
    elem_size: usize,
    elem_alignment: usize,
    ndim: usize,
    shape: [isize; MAX_NDIM],
    strides: [isize; MAX_NDIM],
}

impl NdFormat {
    /// Construct a format from its element layout.
    ///
    /// ```
    /// use ndview::{FrameFormat, NdFormat};
    ///
    /// let format = NdFormat::new(4, 4, &[2, 3], &[16, 4])?;
    /// assert_eq!(format.frame_size(), 28);
    /// assert!(!format.is_contiguous());
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn new(
        elem_size: usize,
        elem_alignment: usize,
        shape: &[isize],
        strides: &[isize],
    ) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(Error::LayoutMismatch {
                reason: "frame shape and strides differ in dimension",
            });
        }

        if shape.len() > MAX_NDIM {
            return Err(Error::LayoutMismatch {
                reason: "too many frame axes",
            });
        }

        if !elem_alignment.is_power_of_two() {
            return Err(Error::LayoutMismatch {
                reason: "element alignment is not a power of two",
            });
        }

        if strides.iter().any(|&s| s <= 0) {
            return Err(Error::LayoutMismatch {
                reason: "frame strides must be positive",
            });
        }

        let mut out = Self {
            elem_size,
            elem_alignment,
            ndim: shape.len(),
            shape: [0; MAX_NDIM],
            strides: [0; MAX_NDIM],
        };

        out.shape[..shape.len()].copy_from_slice(shape);
        out.strides[..strides.len()].copy_from_slice(strides);
        check_shape(&out.shape)?;
        Ok(out)
    }

    /// The default format for a row-major array of `T` with the given shape.
    ///
    /// ```
    /// use ndview::{FrameFormat, NdFormat};
    ///
    /// let format = NdFormat::contiguous::<i32>(&[2, 3])?;
    /// assert_eq!(format.frame_size(), 24);
    /// assert_eq!(format.strides(), &[12, 4]);
    /// assert!(format.is_contiguous());
    /// # Ok::<_, ndview::Error>(())
    /// ```
    pub fn contiguous<T>(shape: &[isize]) -> Result<Self>
    where
        T: Element,
    {
        let mut strides = [0; MAX_NDIM];
        let strides = strides.get_mut(..shape.len()).ok_or(Error::LayoutMismatch {
            reason: "too many frame axes",
        })?;

        let mut stride = mem::size_of::<T>() as isize;

        for (s, &n) in strides.iter_mut().zip(shape).rev() {
            *s = stride;
            stride *= n;
        }

        Self::new(mem::size_of::<T>(), mem::align_of::<T>(), shape, strides)
    }

    /// The format of a frame holding a single `T`.
    pub fn scalar<T>() -> Self
    where
        T: Element,
    {
        Self {
            elem_size: mem::size_of::<T>(),
            elem_alignment: mem::align_of::<T>(),
            ndim: 0,
            shape: [0; MAX_NDIM],
            strides: [0; MAX_NDIM],
        }
    }

    /// Size in bytes of one element.
    #[inline]
    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// Alignment of one element.
    #[inline]
    pub fn elem_alignment(&self) -> usize {
        self.elem_alignment
    }

    /// Number of axes of a frame.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Shape of a frame.
    #[inline]
    pub fn shape(&self) -> &[isize] {
        &self.shape[..self.ndim]
    }

    /// Byte strides of a frame.
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides[..self.ndim]
    }

    /// Number of elements in one frame.
    pub fn elem_count(&self) -> usize {
        self.shape().iter().map(|&n| n as usize).product()
    }

    /// Test if elements are packed without any padding between them.
    pub fn is_contiguous(&self) -> bool {
        let mut stride = self.elem_size as isize;

        for (&s, &n) in self.strides().iter().zip(self.shape()).rev() {
            if n > 1 && s != stride {
                return false;
            }

            stride *= n;
        }

        true
    }

    /// Call `f` with the byte offset of every element in row-major order,
    /// both in this layout and in the layout of `other`.
    ///
    /// Both formats must have the same shape.
    fn for_each_offset(&self, other: &Self, mut f: impl FnMut(isize, isize) -> bool) -> bool {
        if self.elem_count() == 0 {
            return true;
        }

        let mut coord = [0isize; MAX_NDIM];

        loop {
            let (a, b) = coord
                .iter()
                .zip(self.strides().iter().zip(other.strides()))
                .fold((0, 0), |(a, b), (c, (s, t))| (a + c * s, b + c * t));

            if !f(a, b) {
                return false;
            }

            let mut axis = self.ndim;

            loop {
                if axis == 0 {
                    return true;
                }

                axis -= 1;
                coord[axis] += 1;

                if coord[axis] < self.shape[axis] {
                    break;
                }

                coord[axis] = 0;
            }
        }
    }
}

impl FrameFormat for NdFormat {
    fn frame_size(&self) -> usize {
        if self.elem_count() == 0 {
            return 0;
        }

        let reach: isize = self
            .strides()
            .iter()
            .zip(self.shape())
            .map(|(s, n)| (n - 1) * s)
            .sum();

        reach as usize + self.elem_size
    }

    /// Frames are compatible when they hold the same number and size of
    /// elements, regardless of how the elements are laid out.
    fn is_compatible(&self, other: &Self) -> bool {
        self.elem_size == other.elem_size && self.shape() == other.shape()
    }

    unsafe fn copy_frame(&self, dst: *mut u8, src_format: &Self, src: *const u8) {
        if self.strides() == src_format.strides() && self.is_contiguous() {
            ptr::copy(src, dst, self.frame_size());
            return;
        }

        let size = self.elem_size;

        self.for_each_offset(src_format, |dst_offset, src_offset| {
            ptr::copy(src.offset(src_offset), dst.offset(dst_offset), size);
            true
        });
    }

    unsafe fn compare_frame(&self, a: *const u8, b_format: &Self, b: *const u8) -> bool {
        let size = self.elem_size;

        // Padding between elements is not part of the frame.
        self.for_each_offset(b_format, |a_offset, b_offset| {
            let a = slice::from_raw_parts(a.offset(a_offset), size);
            let b = slice::from_raw_parts(b.offset(b_offset), size);
            a == b
        })
    }
}

impl fmt::Debug for NdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdFormat")
            .field("elem_size", &self.elem_size)
            .field("elem_alignment", &self.elem_alignment)
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .finish()
    }
}
