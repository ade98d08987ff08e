#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use objrec_image as image;

#[doc(inline)]
pub use objrec_3d as k3d;
