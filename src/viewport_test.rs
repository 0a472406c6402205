#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn viewport(lw: f64, lh: f64) -> Viewport {
    match Viewport::new(lw, lh) {
        Ok(v) => v,
        Err(err) => panic!("viewport: {err}"),
    }
}

// --- scale formula ---

#[test]
fn scale_floors_to_hundredths() {
    // min(400/1920, 300/1080) = min(0.2083, 0.2777) -> 0.20
    assert!(approx_eq(compute_scale(1920.0, 1080.0, 400.0, 300.0), 0.20));
}

#[test]
fn scale_uses_tighter_axis() {
    assert!(approx_eq(compute_scale(1920.0, 1080.0, 1920.0, 540.0), 0.5));
    assert!(approx_eq(compute_scale(1920.0, 1080.0, 960.0, 1080.0), 0.5));
}

#[test]
fn scale_can_exceed_one() {
    assert!(approx_eq(compute_scale(100.0, 100.0, 250.0, 300.0), 2.5));
}

#[test]
fn scale_of_empty_physical_is_zero() {
    assert_eq!(compute_scale(1920.0, 1080.0, 0.0, 0.0), 0.0);
}

#[test]
fn scale_of_zero_logical_is_zero() {
    assert_eq!(compute_scale(0.0, 1080.0, 800.0, 600.0), 0.0);
}

// --- Viewport ---

#[test]
fn new_rejects_bad_logical_size() {
    assert!(Viewport::new(0.0, 100.0).is_err());
    assert!(Viewport::new(100.0, f64::NAN).is_err());
}

#[test]
fn new_viewport_has_zero_scale() {
    let v = viewport(1920.0, 1080.0);
    assert_eq!(v.scale(), 0.0);
    assert_eq!(v.physical_size(), (0.0, 0.0));
}

#[test]
fn resize_800x600_then_400x300() {
    let mut v = viewport(1920.0, 1080.0);
    assert!(v.resize(800.0, 600.0));
    assert!(approx_eq(v.scale(), 0.41));
    assert!(v.resize(400.0, 300.0));
    assert!(approx_eq(v.scale(), 0.20));
}

#[test]
fn resize_to_same_scale_reports_unchanged() {
    let mut v = viewport(1000.0, 1000.0);
    v.resize(500.0, 500.0);
    assert!(!v.resize(500.0, 501.0));
}

#[test]
fn set_logical_rescales() {
    let mut v = viewport(1920.0, 1080.0);
    v.resize(960.0, 540.0);
    assert!(approx_eq(v.scale(), 0.5));
    assert_eq!(v.set_logical(960.0, 540.0), Ok(true));
    assert!(approx_eq(v.scale(), 1.0));
    assert_eq!(v.logical_size(), (960.0, 540.0));
}

#[test]
fn set_logical_rejects_invalid_and_keeps_state() {
    let mut v = viewport(1920.0, 1080.0);
    v.resize(960.0, 540.0);
    assert!(v.set_logical(-5.0, 10.0).is_err());
    assert_eq!(v.logical_size(), (1920.0, 1080.0));
    assert!(approx_eq(v.scale(), 0.5));
}

#[test]
fn contains_screen_is_inclusive() {
    let mut v = viewport(100.0, 100.0);
    v.resize(200.0, 100.0);
    assert!(v.contains_screen(Point::new(0.0, 0.0)));
    assert!(v.contains_screen(Point::new(200.0, 100.0)));
    assert!(!v.contains_screen(Point::new(-0.5, 10.0)));
    assert!(!v.contains_screen(Point::new(10.0, 100.5)));
}

#[test]
fn screen_logical_conversions_invert() {
    let mut v = viewport(1920.0, 1080.0);
    v.resize(960.0, 540.0);
    let Some(logical) = v.screen_to_logical(Point::new(100.0, 50.0)) else {
        panic!("non-zero scale should map back");
    };
    assert_eq!(logical, Point::new(200.0, 100.0));
    assert_eq!(v.logical_to_screen(logical), Point::new(100.0, 50.0));
    assert!(approx_eq(v.screen_dist_to_logical(8.0), 16.0));
}

#[test]
fn conversions_with_zero_scale_are_safe() {
    let v = viewport(1920.0, 1080.0);
    assert_eq!(v.screen_to_logical(Point::new(10.0, 10.0)), None);
    assert_eq!(v.screen_dist_to_logical(10.0), 0.0);
}
