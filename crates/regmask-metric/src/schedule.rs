//! Erosion radii per resolution level.
//!
//! Before subsampling, pyramid level `level` of `L` is smoothed with a
//! Gaussian of standard deviation `2^(L - level - 1) / 2`, whose influence
//! reaches roughly twice that far. Mask pixels closer than that to the mask
//! boundary see background mixed into their neighbourhood, so the mask is
//! eroded by `ceil(2^(L - level - 1)) + 1` pixels. The moving image gradient
//! used by the metric derivative has a wider support, so the moving mask is
//! eroded by the radius of the next coarser level.

use std::fmt;

/// Which image a mask applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskRole {
    /// The fixed (reference) image.
    Fixed,
    /// The moving (subject) image.
    Moving,
}

impl MaskRole {
    /// Both roles, fixed first.
    pub const ALL: [MaskRole; 2] = [MaskRole::Fixed, MaskRole::Moving];

    /// The command line flag holding the mask path for this role.
    pub fn command_line_key(&self) -> &'static str {
        match self {
            MaskRole::Fixed => "-fMask",
            MaskRole::Moving => "-mMask",
        }
    }
}

impl fmt::Display for MaskRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskRole::Fixed => write!(f, "fixed"),
            MaskRole::Moving => write!(f, "moving"),
        }
    }
}

// ceil(2^exponent) + 1, saturating for very large exponents
fn radius_for_exponent(exponent: i64) -> usize {
    let exponent = exponent.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    (2f64.powi(exponent).ceil() as usize).saturating_add(1)
}

/// Erosion radius of the fixed mask at `level` out of `number_of_resolutions`.
///
/// `ceil(2^(L - level - 1)) + 1`. The level is not validated: past the finest
/// level the power drops below one and the radius bottoms out at 2.
pub fn fixed_erosion_radius(level: usize, number_of_resolutions: usize) -> usize {
    radius_for_exponent(number_of_resolutions as i64 - level as i64 - 1)
}

/// Erosion radius of the moving mask at `level` out of `number_of_resolutions`.
///
/// `ceil(2^(L - level)) + 1`, i.e. the fixed radius of the next coarser level.
pub fn moving_erosion_radius(level: usize, number_of_resolutions: usize) -> usize {
    radius_for_exponent(number_of_resolutions as i64 - level as i64)
}

/// Erosion radius for `role` at `level` out of `number_of_resolutions`.
///
/// # Example
///
/// ```
/// use regmask_metric::schedule::{erosion_radius, MaskRole};
///
/// assert_eq!(erosion_radius(MaskRole::Fixed, 0, 3), 5);
/// assert_eq!(erosion_radius(MaskRole::Moving, 0, 3), 9);
/// ```
pub fn erosion_radius(role: MaskRole, level: usize, number_of_resolutions: usize) -> usize {
    match role {
        MaskRole::Fixed => fixed_erosion_radius(level, number_of_resolutions),
        MaskRole::Moving => moving_erosion_radius(level, number_of_resolutions),
    }
}

/// Erosion radii of one resolution level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRadii {
    /// The resolution level, 0 being the coarsest.
    pub level: usize,
    /// Radius applied to the fixed mask.
    pub fixed: usize,
    /// Radius applied to the moving mask.
    pub moving: usize,
}

/// The erosion radii of every level of an `L`-level pyramid, coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErosionSchedule {
    number_of_resolutions: usize,
}

impl ErosionSchedule {
    /// Create the schedule for `number_of_resolutions` levels.
    pub fn new(number_of_resolutions: usize) -> Self {
        Self {
            number_of_resolutions,
        }
    }

    /// Number of levels in the schedule.
    pub fn number_of_resolutions(&self) -> usize {
        self.number_of_resolutions
    }

    /// Radii of a single level.
    pub fn level(&self, level: usize) -> LevelRadii {
        LevelRadii {
            level,
            fixed: fixed_erosion_radius(level, self.number_of_resolutions),
            moving: moving_erosion_radius(level, self.number_of_resolutions),
        }
    }

    /// Iterate the radii of all levels, coarsest first.
    pub fn levels(&self) -> impl Iterator<Item = LevelRadii> + '_ {
        (0..self.number_of_resolutions).map(move |level| self.level(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmask_imgproc::pyramid::pyramid_schedule;

    #[test]
    fn radii_three_levels() {
        assert_eq!(fixed_erosion_radius(0, 3), 5);
        assert_eq!(moving_erosion_radius(0, 3), 9);
        assert_eq!(fixed_erosion_radius(1, 3), 3);
        assert_eq!(moving_erosion_radius(1, 3), 5);
        assert_eq!(fixed_erosion_radius(2, 3), 2);
        assert_eq!(moving_erosion_radius(2, 3), 3);
    }

    #[test]
    fn moving_is_doubled_fixed() {
        for num_levels in 1..12 {
            for level in 0..num_levels {
                let fixed = fixed_erosion_radius(level, num_levels);
                let moving = moving_erosion_radius(level, num_levels);
                assert_eq!(moving, 2 * (fixed - 1) + 1, "L={num_levels} level={level}");
            }
        }
    }

    #[test]
    fn moving_is_next_coarser_fixed() {
        for level in 1..6 {
            assert_eq!(moving_erosion_radius(level, 6), fixed_erosion_radius(level - 1, 6));
        }
    }

    #[test]
    fn radii_non_increasing() {
        for num_levels in 1..10 {
            let schedule = ErosionSchedule::new(num_levels).levels().collect::<Vec<_>>();
            assert_eq!(schedule.len(), num_levels);
            for pair in schedule.windows(2) {
                assert!(pair[0].fixed >= pair[1].fixed);
                assert!(pair[0].moving >= pair[1].moving);
            }
        }
    }

    #[test]
    fn radii_past_finest_level() {
        assert_eq!(fixed_erosion_radius(3, 3), 2);
        assert_eq!(fixed_erosion_radius(7, 3), 2);
        assert_eq!(moving_erosion_radius(3, 3), 2);
        assert_eq!(moving_erosion_radius(4, 3), 2);
    }

    #[test]
    fn fixed_radius_covers_pyramid_smoothing() {
        for num_levels in 1..8 {
            for level in 0..num_levels {
                let smoothing = pyramid_schedule(level, num_levels);
                assert_eq!(
                    fixed_erosion_radius(level, num_levels),
                    smoothing.influence_radius() + 1
                );
            }
        }
    }

    #[test]
    fn mask_role_keys() {
        assert_eq!(MaskRole::Fixed.command_line_key(), "-fMask");
        assert_eq!(MaskRole::Moving.command_line_key(), "-mMask");
        assert_eq!(MaskRole::Fixed.to_string(), "fixed");
        assert_eq!(MaskRole::Moving.to_string(), "moving");
    }
}
