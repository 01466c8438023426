#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use regmask_image as image;

#[doc(inline)]
pub use regmask_imgproc as imgproc;

#[doc(inline)]
pub use regmask_io as io;

#[doc(inline)]
pub use regmask_metric as metric;
