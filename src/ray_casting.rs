//! Ray casting for mouse-based marker picking.
//!
//! Rays are built by unprojecting the cursor through the inverse
//! view-projection matrix and tested against marker bounding boxes.

use iced::{Point, Size};
use nalgebra::{Point3, Vector3, Vector4};

use crate::camera::{Camera, Projection};

/// 3D ray for intersection testing
#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Normalized direction
    pub direction: Vector3<f32>,
}

/// Axis-aligned bounding box in 3D space
#[derive(Debug, Clone, PartialEq)]
pub struct AABB {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl AABB {
    pub fn from_center_half_extents(center: Point3<f32>, half: Vector3<f32>) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Calculate mouse ray from viewport coordinates through the 3D scene.
///
/// Returns `None` if the view-projection matrix cannot be inverted or the
/// viewport is empty.
pub fn calculate_mouse_ray(
    mouse_pos: Point,
    viewport: Size,
    camera: &Camera,
    projection: &Projection,
) -> Option<Ray> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return None;
    }

    // Convert mouse position to normalized device coordinates (-1 to 1)
    let ndc_x = (2.0 * mouse_pos.x / viewport.width) - 1.0;
    let ndc_y = 1.0 - (2.0 * mouse_pos.y / viewport.height);

    let view_proj = projection.build_projection_matrix() * camera.build_view_matrix();
    let inv_view_proj = view_proj.try_inverse()?;

    let start = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
    let end = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

    // Convert from homogeneous coordinates
    let ray_start = Point3::new(start.x / start.w, start.y / start.w, start.z / start.w);
    let ray_end = Point3::new(end.x / end.w, end.y / end.w, end.z / end.w);

    Some(Ray {
        origin: ray_start,
        direction: (ray_end - ray_start).normalize(),
    })
}

/// Projects a world point to viewport coordinates. Points behind the camera
/// yield `None`.
pub fn project_to_viewport(
    point: &Point3<f32>,
    viewport: Size,
    camera: &Camera,
    projection: &Projection,
) -> Option<Point> {
    let view_proj = projection.build_projection_matrix() * camera.build_view_matrix();
    let clip = view_proj * point.to_homogeneous();
    if clip.w <= f32::EPSILON {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    Some(Point::new(
        (ndc_x + 1.0) * 0.5 * viewport.width,
        (1.0 - ndc_y) * 0.5 * viewport.height,
    ))
}

/// Ray/AABB intersection using the slab method.
///
/// Returns the distance along the ray to the nearest hit in front of the
/// origin.
pub fn ray_aabb_intersection(ray: &Ray, aabb: &AABB) -> Option<f32> {
    // Division by a zero component yields infinities, which the min/max
    // below handle correctly.
    let inv_dir = Vector3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    // Entry is the latest near plane, exit the earliest far plane
    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        None
    } else if tmin >= 0.0 {
        Some(tmin)
    } else {
        // Origin is inside the box
        Some(tmax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            eye: Point3::new(0.0, 0.0, 20.0),
            target: Point3::origin(),
            up: Vector3::y(),
        }
    }

    fn unit_box(center: Point3<f32>) -> AABB {
        AABB::from_center_half_extents(center, Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_hits_box_in_front() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 10.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        };
        let distance = ray_aabb_intersection(&ray, &unit_box(Point3::origin())).unwrap();
        assert!((distance - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_box_behind_or_beside() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 10.0),
            direction: Vector3::new(0.0, 0.0, 1.0),
        };
        assert!(ray_aabb_intersection(&ray, &unit_box(Point3::origin())).is_none());
        let beside = unit_box(Point3::new(5.0, 0.0, 0.0));
        let forward = Ray {
            direction: Vector3::new(0.0, 0.0, -1.0),
            ..ray
        };
        assert!(ray_aabb_intersection(&forward, &beside).is_none());
    }

    #[test]
    fn test_ray_from_inside_box() {
        let ray = Ray {
            origin: Point3::origin(),
            direction: Vector3::new(1.0, 0.0, 0.0),
        };
        let distance = ray_aabb_intersection(&ray, &unit_box(Point3::origin())).unwrap();
        assert!((distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let size = Size::new(800.0, 600.0);
        let ray = calculate_mouse_ray(
            Point::new(400.0, 300.0),
            size,
            &camera(),
            &Projection::default(),
        )
        .unwrap();
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-3);
        assert!(ray_aabb_intersection(&ray, &unit_box(Point3::origin())).is_some());
    }

    #[test]
    fn test_projection_round_trip_through_picking() {
        let size = Size::new(800.0, 600.0);
        let projection = Projection::default();
        let marker = Point3::new(3.0, -2.0, 0.0);
        let screen = project_to_viewport(&marker, size, &camera(), &projection).unwrap();
        let ray = calculate_mouse_ray(screen, size, &camera(), &projection).unwrap();
        let hit = ray_aabb_intersection(&ray, &unit_box(marker));
        assert!(hit.is_some());
    }

    #[test]
    fn test_point_behind_camera_is_not_projected() {
        let behind = Point3::new(0.0, 0.0, 40.0);
        assert!(
            project_to_viewport(&behind, Size::new(800.0, 600.0), &camera(), &Projection::default())
                .is_none()
        );
    }

    #[test]
    fn test_empty_viewport_has_no_ray() {
        assert!(
            calculate_mouse_ray(
                Point::ORIGIN,
                Size::new(0.0, 0.0),
                &camera(),
                &Projection::default()
            )
            .is_none()
        );
    }
}
