/// Smoothing and subsampling applied at one level of a Gaussian pyramid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PyramidLevel {
    /// Subsampling factor relative to the full resolution image.
    pub shrink_factor: f64,
    /// Standard deviation of the Gaussian smoothing kernel, in full resolution pixels.
    pub sigma: f64,
}

impl PyramidLevel {
    /// Distance from an edge, in pixels, over which the smoothing kernel
    /// mixes content from the other side.
    ///
    /// Taken as roughly twice the standard deviation, rounded up.
    pub fn influence_radius(&self) -> usize {
        (2.0 * self.sigma).ceil() as usize
    }
}

/// Compute the pyramid schedule for `level` out of `number_of_levels`.
///
/// Level `0` is the coarsest. The shrink factor is `2^(L - level - 1)` and the
/// image is smoothed with a Gaussian of variance `(factor / 2)^2` before
/// subsampling, so the finest level still carries `sigma = 0.5`.
///
/// `level` is not validated against `number_of_levels`; past the finest
/// level the factor keeps halving.
///
/// # Example
///
/// ```
/// use regmask_imgproc::pyramid::pyramid_schedule;
///
/// let coarse = pyramid_schedule(0, 3);
/// assert_eq!(coarse.shrink_factor, 4.0);
/// assert_eq!(coarse.sigma, 2.0);
/// assert_eq!(coarse.influence_radius(), 4);
/// ```
pub fn pyramid_schedule(level: usize, number_of_levels: usize) -> PyramidLevel {
    let exponent = number_of_levels as i32 - level as i32 - 1;
    let shrink_factor = 2f64.powi(exponent);

    PyramidLevel {
        shrink_factor,
        sigma: shrink_factor / 2.0,
    }
}
