#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_operators() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(4.0, -1.0);
    assert_eq!(a + b, Point::new(5.0, 1.0));
    assert_eq!(b - a, Point::new(3.0, -3.0));
    assert_eq!(a * 3.0, Point::new(3.0, 6.0));
    assert_eq!(a.dot(b), 2.0);
}

#[test]
fn point_length_and_distance() {
    assert_eq!(Point::new(3.0, 4.0).length(), 5.0);
    assert_eq!(Point::new(1.0, 1.0).distance(Point::new(4.0, 5.0)), 5.0);
}

#[test]
fn point_midpoint() {
    let m = Point::new(0.0, 0.0).midpoint(Point::new(10.0, -4.0));
    assert_eq!(m, Point::new(5.0, -2.0));
}

#[test]
fn point_rotate_quarter_turn_is_clockwise_on_y_down() {
    let r = Point::new(1.0, 0.0).rotate_deg(90.0);
    assert!(point_approx_eq(r, Point::new(0.0, 1.0)));
}

#[test]
fn point_rotate_negative_undoes_positive() {
    let p = Point::new(3.0, -7.0);
    let back = p.rotate_deg(37.0).rotate_deg(-37.0);
    assert!(point_approx_eq(p, back));
}

#[test]
fn point_normalized_zero_is_none() {
    assert!(Point::new(0.0, 0.0).normalized().is_none());
}

#[test]
fn point_normalized_has_unit_length() {
    let n = Point::new(10.0, 0.0).normalized();
    assert_eq!(n, Some(Point::new(1.0, 0.0)));
}

#[test]
fn point_lerp_endpoints() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(10.0, 20.0);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 10.0));
}

#[test]
fn point_serde_roundtrip() {
    let p = Point::new(1.5, -2.5);
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(json, r#"{"x":1.5,"y":-2.5}"#);
    let back: Point = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);
}

#[test]
fn angle_deg_cardinals() {
    let o = Point::new(0.0, 0.0);
    assert!(approx_eq(angle_deg(o, Point::new(1.0, 0.0)), 0.0));
    assert!(approx_eq(angle_deg(o, Point::new(0.0, 1.0)), 90.0));
    assert!(approx_eq(angle_deg(o, Point::new(-1.0, 0.0)), 180.0));
    assert!(approx_eq(angle_deg(o, Point::new(0.0, -1.0)), -90.0));
}

// --- Camera ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
    let p = Point::new(12.0, 34.0);
    assert_eq!(cam.screen_to_world(p), p);
}

#[test]
fn camera_screen_to_world_with_pan_and_zoom() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let w = cam.screen_to_world(Point::new(300.0, 250.0));
    assert!(point_approx_eq(w, Point::new(100.0, 100.0)));
}

#[test]
fn camera_roundtrip() {
    let cam = Camera { pan_x: -37.5, pan_y: 12.25, zoom: 0.75 };
    let world = Point::new(431.0, -88.0);
    let back = cam.screen_to_world(cam.world_to_screen(world));
    assert!(point_approx_eq(world, back));
}

#[test]
fn camera_screen_dist_scales_with_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    assert!(approx_eq(cam.screen_dist_to_world(8.0), 2.0));
}

#[test]
fn camera_pan_by_accumulates() {
    let mut cam = Camera::default();
    cam.pan_by(5.0, -3.0);
    cam.pan_by(1.0, 1.0);
    assert_eq!(cam.pan_x, 6.0);
    assert_eq!(cam.pan_y, -2.0);
}

#[test]
fn camera_zoom_at_keeps_anchor_fixed() {
    let mut cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 1.0 };
    let anchor = Point::new(200.0, 150.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 2.0);
    assert!(approx_eq(cam.zoom, 2.0));
    let after = cam.screen_to_world(anchor);
    assert!(point_approx_eq(before, after));
}

#[test]
fn camera_zoom_at_clamps() {
    let mut cam = Camera::default();
    cam.zoom_at(Point::new(0.0, 0.0), 1000.0);
    assert_eq!(cam.zoom, ZOOM_MAX);
    cam.zoom_at(Point::new(0.0, 0.0), 1e-6);
    assert_eq!(cam.zoom, ZOOM_MIN);
}

#[test]
fn camera_zoom_at_ignores_invalid_factor() {
    let mut cam = Camera::default();
    cam.zoom_at(Point::new(0.0, 0.0), 0.0);
    cam.zoom_at(Point::new(0.0, 0.0), f64::NAN);
    assert_eq!(cam, Camera::default());
}
