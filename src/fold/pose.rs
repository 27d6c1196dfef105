use super::FoldConfig;

/// Fold state for one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldPose {
    pub target: f32,
    pub angle: f32,
}

impl FoldPose {
    pub fn new(target: f32, angle: f32) -> Self {
        Self { target, angle }
    }

    /// Pose at `timestamp_ms` on the animation clock
    pub fn at(timestamp_ms: f64, config: &FoldConfig) -> Self {
        let phase = |period_ms: f64| {
            if period_ms > 0.0 {
                (timestamp_ms / period_ms).cos()
            } else {
                1.0
            }
        };

        Self {
            target: (config.amplitude as f64 * phase(config.fold_period_ms)) as f32,
            angle: (config.twist_amplitude as f64 * phase(config.twist_period_ms)) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_pose_at_zero_is_flat_and_fully_twisted() {
        let config = FoldConfig::default();
        let pose = FoldPose::at(0.0, &config);
        assert_eq!(pose.target, config.amplitude);
        assert_eq!(pose.angle, config.twist_amplitude);
    }

    #[test]
    fn test_pose_half_period_reaches_negative_amplitude() {
        let config = FoldConfig::default();
        let pose = FoldPose::at(PI * config.fold_period_ms, &config);
        assert!((pose.target + config.amplitude).abs() < 1e-4);
    }

    #[test]
    fn test_pose_stays_within_amplitude() {
        let config = FoldConfig::default();
        for step in 0..2000 {
            let pose = FoldPose::at(step as f64 * 37.0, &config);
            assert!(pose.target.abs() <= config.amplitude + 1e-5);
            assert!(pose.angle.abs() <= config.twist_amplitude + 1e-5);
        }
    }

    #[test]
    fn test_pose_ignores_non_positive_period() {
        let config = FoldConfig {
            fold_period_ms: 0.0,
            ..FoldConfig::default()
        };
        let pose = FoldPose::at(12345.0, &config);
        assert!(pose.target.is_finite());
        assert_eq!(pose.target, config.amplitude);
    }
}
