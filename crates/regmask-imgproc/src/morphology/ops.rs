use super::kernels::{Kernel, KernelShape};
use rayon::prelude::*;
use regmask_image::{ImageError, Mask};

/// Erode a binary mask using a [`Kernel`].
///
/// A pixel stays foreground only if every active kernel neighbour is
/// foreground. Neighbours outside the image count as foreground, so the
/// image border alone never erodes the mask.
///
/// # Arguments
///
/// * `src` - The source mask.
/// * `dst` - The destination mask (will be overwritten).
/// * `kernel` - The structuring element.
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if the sizes don't match.
pub fn erode(src: &Mask, dst: &mut Mask, kernel: &Kernel) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let width = src.width();
    let height = src.height();
    if width == 0 || height == 0 {
        return Ok(());
    }

    let offsets = kernel.offsets();
    let src_data = src.as_slice();
    let mut eroded = vec![0u8; width * height];

    eroded
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                if src_data[y * width + x] == 0 {
                    continue;
                }

                let keep = offsets.iter().all(|&(dx, dy)| {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                        return true;
                    }
                    src_data[ny as usize * width + nx as usize] != 0
                });

                *value = u8::from(keep);
            }
        });

    *dst = Mask::new(src.size(), eroded)?;

    Ok(())
}

/// Erode a mask by a structuring element of the given shape and radius.
///
/// Allocates the output. A radius of zero returns a copy of `src`.
///
/// Radii beyond the mask diagonal erode exactly like the diagonal, so the
/// structuring element never grows past it.
///
/// # Example
///
/// ```
/// use regmask_image::Mask;
/// use regmask_imgproc::morphology::{erode_by_radius, KernelShape};
///
/// let mask = Mask::new([3, 3].into(), vec![1, 1, 1, 1, 1, 1, 1, 1, 0]).unwrap();
/// let eroded = erode_by_radius(&mask, 1, KernelShape::Box).unwrap();
///
/// assert_eq!(eroded.as_slice(), &[1, 1, 1, 1, 0, 0, 1, 0, 0]);
/// ```
pub fn erode_by_radius(src: &Mask, radius: usize, shape: KernelShape) -> Result<Mask, ImageError> {
    let radius = radius.min(diagonal(src));
    let mut dst = Mask::from_size_val(src.size(), false);
    erode(src, &mut dst, &Kernel::new(shape, radius)?)?;
    Ok(dst)
}

// smallest radius whose structuring element covers the whole mask
fn diagonal(mask: &Mask) -> usize {
    (mask.width() as f64).hypot(mask.height() as f64).ceil() as usize
}
