//! Zero-copy N-dimensional views over memory buffers.
//!
//! This is made up of two parts:
//!
//! * [ndview-core] - The core crate, which defines the dimension vocabulary
//!   and the [View] traits that allow for navigating buffers independent of
//!   how a view is layered.
//! * [ndview] - This crate, which provides the concrete views implementing
//!   the traits in [ndview-core].
//!
//! A view is a small descriptor: the address of the element at its origin, a
//! shape and a set of byte strides. It never owns the memory it describes,
//! so sectioning, slicing and casting a view is free and never touches the
//! buffer.
//!
//! <br>
//!
//! ## Views
//!
//! * [StridedView]: a typed view over elements of type `T`.
//! * [OpaqueView]: a view over frames whose internal layout is only known to
//!   a [FrameFormat], such as [RawFormat] or [NdFormat].
//! * [WrapView]: a circularly indexed window over another view, which is how
//!   ring buffers of frames are navigated.
//! * [TimedView]: a wraparound view whose first axis is labelled with
//!   absolute times.
//!
//! Typed and opaque views can be cast into each other without copying, see
//! [StridedView::to_opaque] and [StridedView::from_opaque].
//!
//! <br>
//!
//! ## Examples
//!
//! A ring buffer of ten frames of `3x4` samples, where the five most recent
//! frames start at raw index 7 and wrap around to the beginning of the
//! buffer:
//!
//! ```rust
//! use ndview::{timed, wraparound, StridedView, View};
//!
//! let data = (0u32..120).collect::<Vec<_>>();
//! let raw = StridedView::from_slice(&data, [10, 3, 4])?;
//!
//! let recent = wraparound(raw, [7, 0, 0], [12, 3, 4], [1, 1, 1])?;
//! assert_eq!(recent.shape(), [5, 3, 4]);
//! assert_eq!(recent.get([3, 0, 0])?, raw.get([0, 0, 0])?);
//!
//! let recent = timed(recent, 1000)?;
//! let later = recent.tsection(1002, 1005)?;
//! assert_eq!(later.start_time(), 1002);
//! assert_eq!(later.get([1, 0, 0])?, raw.get([0, 0, 0])?);
//!
//! let window = later.fcall().all().range(1, 2)?.into_view();
//! assert_eq!(window.shape(), [3, 1, 4]);
//! # Ok::<_, ndview::Error>(())
//! ```
//!
//! [ndview-core]: https://docs.rs/ndview-core
//! [ndview]: https://docs.rs/ndview

#![deny(missing_docs, rustdoc::broken_intra_doc_links)]
#![allow(clippy::should_implement_trait)]

mod cast;

pub mod format;
pub use self::format::{NdFormat, RawFormat};

pub mod opaque;
pub use self::opaque::{FrameHandle, Frames, OpaqueView};

pub mod strided;
pub use self::strided::StridedView;

pub mod timed;
pub use self::timed::{timed, TimedView};

pub mod wrap;
pub use self::wrap::{wraparound, WrapView};

#[cfg(test)]
mod tests;

pub use ndview_core::*;
