use approx::{assert_abs_diff_eq, assert_relative_eq};
use core::f64::consts::FRAC_PI_2;
use tang_geom::{Capsule, Mat4, Plane, Ray, Triangle, Vec3};

#[test]
fn dot_product() {
    assert_eq!(Vec3::new(1.0, 2.0, 3.0).dot(Vec3::new(4.0, 5.0, 6.0)), 32.0);
    assert_eq!(Vec3::new(1.0f32, 2.0, 3.0).dot(Vec3::new(4.0, 5.0, 6.0)), 32.0);
}

#[test]
fn scale_after_translation_scales_translation() {
    let mut m = Mat4::translation(1.0, 2.0, 3.0);
    m.scale(2.0, 2.0, 2.0);
    let t = m.translation_vec();
    assert_relative_eq!(t.x, 2.0);
    assert_relative_eq!(t.y, 4.0);
    assert_relative_eq!(t.z, 6.0);
}

#[test]
fn quarter_turn_about_z() {
    let m = Mat4::rotation_axis(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);
    let p = m * Vec3::new(1.0, 0.0, 0.0);
    assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-5);

    let m = Mat4::<f32>::rotation_axis(Vec3::z(), core::f32::consts::FRAC_PI_2);
    let p = m * Vec3::x();
    assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-5);
}

#[test]
fn right_triangle_measures() {
    let t = Triangle::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
    );
    assert_relative_eq!(t.area(), 6.0);
    assert_relative_eq!(t.circumcircle_radius(), 2.5, epsilon = 1e-12);
    assert_relative_eq!(t.incircle_radius(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(t.perimeter(), 12.0);
}

#[test]
fn capsule_surface_distance() {
    let c = Capsule::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), 1.0);
    assert_relative_eq!(c.distance(Vec3::new(3.0, 0.0, 2.0)), 2.0);
}

#[test]
fn plane_trace() {
    let p = Plane::from_origin_normal(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0));
    let r = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
    assert_relative_eq!(p.trace(&r), 5.0);
    assert_eq!(p.trace_range(&r, 0.0, f64::INFINITY), Some(5.0));
}
