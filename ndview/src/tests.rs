//! Note: some of these tests duplicate doc tests, but they're here so that we
//! can run them through miri and get a good idea of the soundness of the raw
//! pointer arithmetic in the views.

mod opaque;
mod strided;
mod wrap;
