use regmask_image::Mask;

use crate::error::MetricError;
use crate::schedule::MaskRole;

/// The part of a similarity metric that consumes masks.
///
/// Masks are installed by value and replace the previous one wholesale.
/// `None` means the metric samples the whole image for that role.
pub trait MaskedMetric {
    /// Replace the installed mask for `role`.
    fn set_mask(&mut self, role: MaskRole, mask: Option<Mask>);

    /// The mask currently installed for `role`.
    fn mask(&self, role: MaskRole) -> Option<&Mask>;

    /// Replace the per-parameter scales of the derivative step length.
    fn set_derivative_step_length_scales(&mut self, scales: Vec<f64>);

    /// The per-parameter scales of the derivative step length.
    fn derivative_step_length_scales(&self) -> &[f64];

    /// Prepare the metric for evaluation.
    fn initialize(&mut self) -> Result<(), MetricError>;
}

/// Default [`MaskedMetric`] state holder.
#[derive(Debug, Clone, Default)]
pub struct MetricBase {
    fixed_mask: Option<Mask>,
    moving_mask: Option<Mask>,
    derivative_step_length_scales: Vec<f64>,
    initialized: bool,
}

impl MetricBase {
    /// Create a metric base with no masks installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`MaskedMetric::initialize`] has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether `(x, y)` may be sampled for `role`.
    ///
    /// Without an installed mask every pixel may be sampled.
    pub fn is_inside_mask(&self, role: MaskRole, x: usize, y: usize) -> bool {
        self.mask(role).map_or(true, |mask| mask.is_foreground(x, y))
    }
}

impl MaskedMetric for MetricBase {
    fn set_mask(&mut self, role: MaskRole, mask: Option<Mask>) {
        match role {
            MaskRole::Fixed => self.fixed_mask = mask,
            MaskRole::Moving => self.moving_mask = mask,
        }
    }

    fn mask(&self, role: MaskRole) -> Option<&Mask> {
        match role {
            MaskRole::Fixed => self.fixed_mask.as_ref(),
            MaskRole::Moving => self.moving_mask.as_ref(),
        }
    }

    fn set_derivative_step_length_scales(&mut self, scales: Vec<f64>) {
        self.derivative_step_length_scales = scales;
    }

    fn derivative_step_length_scales(&self) -> &[f64] {
        &self.derivative_step_length_scales
    }

    fn initialize(&mut self) -> Result<(), MetricError> {
        self.initialized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmask_image::ImageError;

    #[test]
    fn install_and_replace_masks() -> Result<(), ImageError> {
        let mut metric = MetricBase::new();
        assert!(metric.mask(MaskRole::Fixed).is_none());
        assert!(metric.is_inside_mask(MaskRole::Fixed, 100, 100));

        let mask = Mask::new([2, 1].into(), vec![1, 0])?;
        metric.set_mask(MaskRole::Fixed, Some(mask.clone()));
        assert_eq!(metric.mask(MaskRole::Fixed), Some(&mask));
        assert!(metric.mask(MaskRole::Moving).is_none());

        assert!(metric.is_inside_mask(MaskRole::Fixed, 0, 0));
        assert!(!metric.is_inside_mask(MaskRole::Fixed, 1, 0));
        assert!(!metric.is_inside_mask(MaskRole::Fixed, 5, 0));
        assert!(metric.is_inside_mask(MaskRole::Moving, 1, 0));

        metric.set_mask(MaskRole::Fixed, None);
        assert!(metric.mask(MaskRole::Fixed).is_none());
        Ok(())
    }

    #[test]
    fn initialize_metric() -> Result<(), MetricError> {
        let mut metric = MetricBase::new();
        assert!(!metric.is_initialized());
        metric.initialize()?;
        assert!(metric.is_initialized());
        Ok(())
    }
}
