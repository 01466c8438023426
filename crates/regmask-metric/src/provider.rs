use std::path::Path;

use regmask_image::{ImageError, Mask};
use regmask_imgproc::morphology::{erode_by_radius, KernelShape};
use regmask_io::IoError;

/// Loads a mask from storage.
pub trait MaskProvider {
    /// Load the mask stored at `path`.
    fn load(&self, path: &Path) -> Result<Mask, IoError>;
}

/// Reads masks from image files, see [`regmask_io::functional::read_mask`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMaskProvider;

impl MaskProvider for FileMaskProvider {
    fn load(&self, path: &Path) -> Result<Mask, IoError> {
        regmask_io::functional::read_mask(path)
    }
}

/// Morphological erosion of a mask by an integer radius.
pub trait MaskEroder {
    /// Return `mask` with every foreground pixel within `radius` of the
    /// background removed. A radius of zero leaves the mask unchanged.
    fn erode(&self, mask: &Mask, radius: usize) -> Result<Mask, ImageError>;
}

/// Binary erosion with a structuring element of the requested radius.
#[derive(Debug, Clone, Copy)]
pub struct MorphologyEroder {
    /// Shape of the structuring element.
    pub shape: KernelShape,
}

impl Default for MorphologyEroder {
    fn default() -> Self {
        Self {
            shape: KernelShape::Ball,
        }
    }
}

impl MaskEroder for MorphologyEroder {
    fn erode(&self, mask: &Mask, radius: usize) -> Result<Mask, ImageError> {
        erode_by_radius(mask, radius, self.shape)
    }
}
