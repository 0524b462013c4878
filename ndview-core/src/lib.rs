//! The core traits of [ndview].
//!
//! If you want to build a component which navigates frame buffers without
//! depending on any one concrete view you can add a dependency directly to
//! these traits instead of depending on all of the [ndview] crate.
//!
//! [ndview]: https://docs.rs/ndview

#![deny(missing_docs, rustdoc::broken_intra_doc_links)]
#![allow(clippy::should_implement_trait)]

mod call;
pub use self::call::AxisCall;

mod dimension;
pub use self::dimension::{Dimension, Indices, InsertAxis, RemoveAxis, Span, MAX_NDIM};

mod element;
pub use self::element::Element;

mod error;
pub use self::error::{Error, Result};

mod frame_format;
pub use self::frame_format::FrameFormat;

mod mutability;
pub use self::mutability::{Const, Mut, Mutability};

mod view;
pub use self::view::{check_axis, check_shape, stepped_len, stepped_origin, SliceView, View};

/// Time labels used by timed views.
pub type Time = i64;
