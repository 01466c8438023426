mod kernels;
pub use kernels::{Kernel, KernelShape};

mod ops;
pub use ops::{erode, erode_by_radius};
