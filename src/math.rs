//! Easing and interpolation helpers used by camera transitions.

use nalgebra::Point3;

/// Cubic ease-in-out over normalized time.
///
/// Accelerates through the first half and decelerates through the second,
/// mapping `0.0` to `0.0` and `1.0` to `1.0`. Input outside `0.0..=1.0` is
/// clamped.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Linear interpolation between two points.
pub fn lerp_point(from: &Point3<f32>, to: &Point3<f32>, t: f32) -> Point3<f32> {
    from + (to - from) * t
}

/// Converts a zoom scalar at a target into the eye offset for a fixed
/// azimuth. Larger zoom values move the eye closer and lower.
pub fn orbit_offset(
    base_distance: f32,
    base_elevation: f32,
    azimuth_degrees: f32,
    zoom: f32,
) -> nalgebra::Vector3<f32> {
    let azimuth = azimuth_degrees.to_radians();
    let distance = base_distance / zoom;
    let elevation = base_elevation / zoom;

    nalgebra::Vector3::new(
        distance * azimuth.cos(),
        elevation,
        distance * azimuth.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
    }

    #[test]
    fn test_easing_halves() {
        // First half is 4t^3
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < 1e-6);
        // Second half mirrors it
        assert!((ease_in_out_cubic(0.75) - 0.9375).abs() < 1e-6);
    }

    #[test]
    fn test_easing_is_monotonic_and_clamped() {
        let mut last = ease_in_out_cubic(0.0);
        for step in 1..=100 {
            let value = ease_in_out_cubic(step as f32 / 100.0);
            assert!(value >= last);
            last = value;
        }
        assert_eq!(ease_in_out_cubic(-1.0), 0.0);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
    }

    #[test]
    fn test_lerp_point() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, -4.0, 2.0);
        assert_eq!(lerp_point(&a, &b, 0.0), a);
        assert_eq!(lerp_point(&a, &b, 0.5), Point3::new(5.0, -2.0, 1.0));
        assert_eq!(lerp_point(&a, &b, 1.0), b);
    }

    #[test]
    fn test_orbit_offset_scales_with_zoom() {
        let near = orbit_offset(30.0, 20.0, 45.0, 2.0);
        let far = orbit_offset(30.0, 20.0, 45.0, 1.0);
        assert!((near.y - 10.0).abs() < 1e-6);
        assert!((far.y - 20.0).abs() < 1e-6);
        // 45 degrees puts equal weight on x and z
        assert!((near.x - near.z).abs() < 1e-5);
        assert!((far.x - 2.0 * near.x).abs() < 1e-4);
    }
}
