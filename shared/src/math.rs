use serde::{Deserialize, Serialize};

/// Represents a vector in 2D space.
///
/// Screen coordinates: positive x is right, positive y is down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the magnitude of the vector.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the unit vector, or zero for the zero vector.
    pub fn normalize(&self) -> Vector2 {
        let mag = self.magnitude();
        if mag == 0.0 {
            Vector2::ZERO
        } else {
            Vector2 {
                x: self.x / mag,
                y: self.y / mag,
            }
        }
    }

    pub fn scale(&self, scalar: f32) -> Vector2 {
        Vector2 {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    pub fn add(&self, other: &Vector2) -> Vector2 {
        Vector2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub(&self, other: &Vector2) -> Vector2 {
        Vector2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Euclidean distance between two points.
    pub fn distance_to(&self, other: &Vector2) -> f32 {
        self.sub(other).magnitude()
    }

    /// Linear interpolation from `self` towards `other` by `alpha`.
    pub fn lerp(&self, other: &Vector2, alpha: f32) -> Vector2 {
        self.add(&other.sub(self).scale(alpha))
    }

    /// Clamps each axis into `[min, max]` of the matching axis.
    pub fn clamp(&self, min: &Vector2, max: &Vector2) -> Vector2 {
        Vector2 {
            x: self.x.max(min.x).min(max.x),
            y: self.y.max(min.y).min(max.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_normalize_diagonal() {
        let v = Vector2::new(1.0, 1.0).normalize();
        assert_approx_eq!(v.magnitude(), 1.0, 1e-6);
        assert_approx_eq!(v.x, v.y, 1e-6);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        let v = Vector2::ZERO.normalize();
        assert_eq!(v, Vector2::ZERO);
        assert!(!v.x.is_nan());
    }

    #[test]
    fn test_distance() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(3.0, 4.0);
        assert_approx_eq!(a.distance_to(&b), 5.0, 1e-6);
        assert_approx_eq!(b.distance_to(&a), 5.0, 1e-6);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(10.0, 0.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Vector2::new(5.0, 0.0));
    }

    #[test]
    fn test_clamp() {
        let min = Vector2::new(25.0, 25.0);
        let max = Vector2::new(475.0, 350.0);
        assert_eq!(
            Vector2::new(-10.0, 400.0).clamp(&min, &max),
            Vector2::new(25.0, 350.0)
        );
        assert_eq!(
            Vector2::new(100.0, 100.0).clamp(&min, &max),
            Vector2::new(100.0, 100.0)
        );
    }
}
