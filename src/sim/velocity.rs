//! Per-frame ball velocity

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Point, approx_eq};

/// Displacement applied to a ball each frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Velocity {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Build a velocity from a heading in degrees and a speed
    ///
    /// 0° points straight up the screen and angles grow clockwise,
    /// so 90° is right, 180° is down and 270° is left.
    pub fn from_angle_and_speed(angle: f64, speed: f64) -> Self {
        let radians = (angle - 90.0).to_radians();
        Self {
            dx: radians.cos() * speed,
            dy: radians.sin() * speed,
        }
    }

    /// Magnitude of the displacement
    #[inline]
    pub fn speed(&self) -> f64 {
        self.as_vec().length()
    }

    #[inline]
    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.dx, self.dy)
    }

    /// Where `point` ends up after one frame
    #[inline]
    pub fn apply_to_point(&self, point: Point) -> Point {
        point + self.as_vec()
    }

    /// Both components agree within the shared epsilon
    pub fn approx_eq(&self, other: &Velocity) -> bool {
        approx_eq(self.dx, other.dx) && approx_eq(self.dy, other.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_velocity_near(v: Velocity, dx: f64, dy: f64) {
        assert!(
            (v.dx - dx).abs() < 1e-9 && (v.dy - dy).abs() < 1e-9,
            "expected ({dx}, {dy}), got {v:?}"
        );
    }

    #[test]
    fn test_angle_convention() {
        assert_velocity_near(Velocity::from_angle_and_speed(0.0, 5.0), 0.0, -5.0);
        assert_velocity_near(Velocity::from_angle_and_speed(90.0, 5.0), 5.0, 0.0);
        assert_velocity_near(Velocity::from_angle_and_speed(180.0, 5.0), 0.0, 5.0);
        assert_velocity_near(Velocity::from_angle_and_speed(270.0, 5.0), -5.0, 0.0);
        assert_velocity_near(Velocity::from_angle_and_speed(360.0, 5.0), 0.0, -5.0);
    }

    #[test]
    fn test_speed_is_preserved() {
        for angle in [0.0, 30.0, 60.0, 300.0, 330.0, 123.4] {
            let v = Velocity::from_angle_and_speed(angle, 7.5);
            assert!((v.speed() - 7.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_apply_to_point() {
        let v = Velocity::new(3.0, -4.0);
        assert_eq!(v.apply_to_point(Point::new(10.0, 10.0)), Point::new(13.0, 6.0));
    }

    #[test]
    fn test_approx_eq() {
        let v = Velocity::new(1.0, 2.0);
        assert!(v.approx_eq(&Velocity::new(1.0 + 1e-9, 2.0)));
        assert!(!v.approx_eq(&Velocity::new(1.0, 2.001)));
    }
}
