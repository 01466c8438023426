use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of a mask in pixels.
///
/// # Examples
///
/// ```
/// use regmask_image::ImageSize;
///
/// let size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(size.width, 10);
/// assert_eq!(size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// A binary mask over a 2D image grid.
///
/// Samples are stored in row-major order and normalized to `0` (background)
/// or `1` (foreground). A mask with no foreground pixel is still a valid mask;
/// see [`Mask::is_empty`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    size: ImageSize,
    data: Vec<u8>,
}

impl Mask {
    /// Create a new mask from raw samples.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the mask in pixels.
    /// * `data` - The samples in row-major order. Any non-zero value is foreground.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the mask size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use regmask_image::{ImageSize, Mask};
    ///
    /// let mask = Mask::new(
    ///     ImageSize { width: 2, height: 2 },
    ///     vec![0, 255, 7, 0],
    /// ).unwrap();
    ///
    /// assert_eq!(mask.as_slice(), &[0, 1, 1, 0]);
    /// assert_eq!(mask.count_foreground(), 2);
    /// ```
    pub fn new(size: ImageSize, data: Vec<u8>) -> Result<Self, ImageError> {
        if data.len() != size.width * size.height {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height,
            ));
        }

        let data = data.into_iter().map(|v| u8::from(v != 0)).collect();

        Ok(Self { size, data })
    }

    /// Create a new mask where every pixel has the same value.
    pub fn from_size_val(size: ImageSize, foreground: bool) -> Self {
        Self {
            size,
            data: vec![u8::from(foreground); size.width * size.height],
        }
    }

    /// The size of the mask in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The width of the mask in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the mask in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The normalized samples in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size.width && y < self.size.height).then(|| y * self.size.width + x)
    }

    /// Get the value at `(x, y)`, or `None` when outside the mask.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        self.index(x, y).map(|idx| self.data[idx] != 0)
    }

    /// Whether `(x, y)` is a foreground pixel. Pixels outside the mask are background.
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.get(x, y).unwrap_or(false)
    }

    /// Set the value at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] when `(x, y)` is outside the mask.
    pub fn set(&mut self, x: usize, y: usize, foreground: bool) -> Result<(), ImageError> {
        let idx = self.index(x, y).ok_or(ImageError::PixelIndexOutOfBounds(
            x,
            y,
            self.size.width,
            self.size.height,
        ))?;
        self.data[idx] = u8::from(foreground);
        Ok(())
    }

    /// Number of foreground pixels.
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Whether the mask has no foreground pixel at all.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }
}
