use serde::{Deserialize, Serialize};
use strata_math::solve_cubic;

/// How much of a shape's interior is filled, measured inward from the outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Filling {
    /// Only the outline.
    Empty,
    /// A shell half the radius thick.
    Half,
    /// Completely solid.
    #[default]
    Full,
    /// A shell of the given fraction of the radius. Clamped into `[0, 1]`.
    Custom(f32),
}

impl Filling {
    /// Shell thickness as a fraction of the radius, always in `[0, 1]`.
    pub fn fill_ratio(self) -> f32 {
        match self {
            Self::Empty => 0.0,
            Self::Half => 0.5,
            Self::Full => 1.0,
            Self::Custom(ratio) if ratio.is_nan() => 0.0,
            Self::Custom(ratio) => ratio.clamp(0.0, 1.0),
        }
    }

    /// The shell thickness whose volume is `fraction` of the solid sphere.
    ///
    /// A shell of relative thickness `t` keeps `1 - (1 - t)³` of the volume,
    /// so this solves `t³ - 3t² + 3t - fraction = 0`.
    pub fn from_volume_fraction(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let thickness = solve_cubic(1.0, -3.0, 3.0, -fraction).map_or(fraction, |roots| roots.largest());
        Self::Custom(thickness.clamp(0.0, 1.0) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_ratios() {
        assert_eq!(Filling::Empty.fill_ratio(), 0.0);
        assert_eq!(Filling::Half.fill_ratio(), 0.5);
        assert_eq!(Filling::Full.fill_ratio(), 1.0);
        assert_eq!(Filling::default(), Filling::Full);
    }

    #[test]
    fn test_custom_is_clamped() {
        assert_eq!(Filling::Custom(0.3).fill_ratio(), 0.3);
        assert_eq!(Filling::Custom(1.7).fill_ratio(), 1.0);
        assert_eq!(Filling::Custom(-0.2).fill_ratio(), 0.0);
        assert_eq!(Filling::Custom(f32::NAN).fill_ratio(), 0.0);
    }

    #[test]
    fn test_from_volume_fraction() {
        // Half the radius keeps 1 - 1/8 of the volume.
        let ratio = Filling::from_volume_fraction(0.875).fill_ratio();
        assert!((ratio - 0.5).abs() < 1e-6, "got {ratio}");
        assert!(Filling::from_volume_fraction(0.0).fill_ratio().abs() < 1e-6);
        assert!((Filling::from_volume_fraction(1.0).fill_ratio() - 1.0).abs() < 1e-6);
        assert!((Filling::from_volume_fraction(3.0).fill_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ron_format() {
        let text = ron::to_string(&Filling::Custom(0.25)).unwrap();
        assert_eq!(text, "Custom(0.25)");
        let back: Filling = ron::from_str("Half").unwrap();
        assert_eq!(back, Filling::Half);
    }
}
