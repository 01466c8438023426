use regmask_image::ImageError;

/// Shapes of morphological [`Kernel`]s.
///
/// All kernels are square, centered and span `2 * radius + 1` pixels per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// Every pixel of the square is active.
    Box,

    /// Only the horizontal and vertical center lines are active.
    Cross,

    /// Pixels within euclidean distance `radius` of the center are active.
    Ball,
}

/// A binary structuring element.
///
/// Stores a flat `0`/`1` mask where `1` marks offsets included in the
/// morphological operation.
///
/// # Example
///
/// ```rust
/// use regmask_imgproc::morphology::{Kernel, KernelShape};
///
/// let kernel = Kernel::new(KernelShape::Box, 1).unwrap();
/// assert_eq!(kernel.size(), 3);
/// assert_eq!(kernel.data(), &[1; 9]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<u8>,
    radius: usize,
}

impl Kernel {
    /// Create a structuring element of the given shape and radius.
    ///
    /// A radius of zero yields the single-pixel identity kernel for every shape.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidKernelRadius`] when `(2 * radius + 1)^2`
    /// overflows.
    pub fn new(shape: KernelShape, radius: usize) -> Result<Self, ImageError> {
        let size = radius
            .checked_mul(2)
            .and_then(|d| d.checked_add(1))
            .filter(|&size| size.checked_mul(size).is_some())
            .ok_or(ImageError::InvalidKernelRadius(radius))?;
        let r = radius as isize;
        let mut data = vec![0u8; size * size];

        for (i, row) in data.chunks_mut(size).enumerate() {
            let dy = i as isize - r;
            for (j, value) in row.iter_mut().enumerate() {
                let dx = j as isize - r;
                let active = match shape {
                    KernelShape::Box => true,
                    KernelShape::Cross => dx == 0 || dy == 0,
                    KernelShape::Ball => dx * dx + dy * dy <= r * r,
                };
                *value = u8::from(active);
            }
        }

        Ok(Self { data, radius })
    }

    /// Get a reference to the kernel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the radius of the kernel.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Get the side length of the kernel.
    pub fn size(&self) -> usize {
        2 * self.radius + 1
    }

    /// The `(dx, dy)` offsets of all active elements relative to the center.
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let size = self.size();
        let r = self.radius as isize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 1)
            .map(|(idx, _)| ((idx % size) as isize - r, (idx / size) as isize - r))
            .collect()
    }
}
