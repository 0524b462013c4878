//! The frame format collaborator of opaque views.

use core::fmt;
use core::ptr;
use core::slice;

/// Description of the byte layout of one frame.
///
/// An opaque view never looks inside of a frame, it only uses the frame size
/// to navigate memory and the hooks below to copy and compare whole frames.
/// Formats are immutable values which are compared for equality.
///
/// Frames are only ever accessed bytewise, so a format places no alignment
/// requirement on the memory it describes.
pub trait FrameFormat: Copy + Eq + fmt::Debug {
    /// The number of bytes occupied by one frame.
    fn frame_size(&self) -> usize;

    /// Test if frames of `other` can be copied into or compared with frames
    /// of this format.
    fn is_compatible(&self, other: &Self) -> bool {
        self.frame_size() == other.frame_size()
    }

    /// Copy one frame laid out as `src_format` from `src` to `dst`.
    ///
    /// The default implementation copies all [frame_size] bytes, which may
    /// overlap. Formats with padding only copy the bytes that hold content,
    /// leaving the padding of `dst` untouched.
    ///
    /// # Safety
    ///
    /// `src_format` must be compatible with this format. `dst` must be valid
    /// for writes of [frame_size] bytes, and `src` valid for reads of the
    /// frame size of `src_format`.
    ///
    /// [frame_size]: FrameFormat::frame_size
    unsafe fn copy_frame(&self, dst: *mut u8, src_format: &Self, src: *const u8) {
        let _ = src_format;
        ptr::copy(src, dst, self.frame_size());
    }

    /// Compare the frame at `a` with the frame at `b`, which is laid out as
    /// `b_format`.
    ///
    /// # Safety
    ///
    /// `b_format` must be compatible with this format. Both pointers must be
    /// valid for reads of the frame size of their format.
    unsafe fn compare_frame(&self, a: *const u8, b_format: &Self, b: *const u8) -> bool {
        let _ = b_format;
        let len = self.frame_size();
        slice::from_raw_parts(a, len) == slice::from_raw_parts(b, len)
    }
}
