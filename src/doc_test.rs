#![allow(clippy::float_cmp)]

use std::f64::consts::FRAC_PI_2;

use serde_json::json;

use super::*;

fn rect(store: &mut ElementStore, x: f64, y: f64, w: f64, h: f64) -> ElementId {
    store.add(ElementSpec::shape(ShapeKind::Rectangle, x, y, w, h))
}

fn z_of(store: &ElementStore, id: &ElementId) -> i64 {
    store.get(id).map(|e| e.z_index).unwrap()
}

// =============================================================
// ShapeKind
// =============================================================

#[test]
fn kind_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&ShapeKind::Image).unwrap(), "\"IMAGE\"");
    assert_eq!(serde_json::to_string(&ShapeKind::Outline).unwrap(), "\"OUTLINE\"");
    let back: ShapeKind = serde_json::from_str("\"TRIANGLE\"").unwrap();
    assert_eq!(back, ShapeKind::Triangle);
}

#[test]
fn kind_rejects_lowercase() {
    assert!(serde_json::from_str::<ShapeKind>("\"image\"").is_err());
}

#[test]
fn triangle_polygon_has_apex_on_top_edge() {
    let poly = ShapeKind::Triangle.local_polygon(100.0, 80.0);
    assert_eq!(poly, vec![Point::new(0.0, -40.0), Point::new(50.0, 40.0), Point::new(-50.0, 40.0)]);
}

#[test]
fn rectangular_kinds_share_corners() {
    for kind in [ShapeKind::Image, ShapeKind::Rectangle, ShapeKind::Outline] {
        assert_eq!(kind.local_polygon(10.0, 4.0), geom::rect_corners(10.0, 4.0).to_vec());
    }
}

// =============================================================
// ElementSpec parsing
// =============================================================

#[test]
fn element_spec_parses_host_payload() {
    let spec = ElementSpec::from_json(r#"{"type":"IMAGE","src":"a.png","pos":[0,0]}"#).unwrap();
    assert_eq!(spec, ElementSpec::asset(ShapeKind::Image, "a.png", 0.0, 0.0));
}

#[test]
fn element_spec_parses_all_fields() {
    let raw = json!({
        "type": "RECTANGLE",
        "pos": [10, 20],
        "size": [30, 40],
        "angle": 0.5,
        "scale": [2, 3],
        "movable": false,
        "zIndex": 7,
    });
    let spec = ElementSpec::from_json(&raw.to_string()).unwrap();
    assert_eq!(spec.kind, ShapeKind::Rectangle);
    assert_eq!(spec.pos, Some([10.0, 20.0]));
    assert_eq!(spec.size, Some([30.0, 40.0]));
    assert_eq!(spec.angle, Some(0.5));
    assert_eq!(spec.scale, Some([2.0, 3.0]));
    assert_eq!(spec.movable, Some(false));
    assert_eq!(spec.z_index, Some(7));
}

#[test]
fn element_spec_defaults_to_image_at_origin() {
    let spec = ElementSpec::from_json("{}").unwrap();
    assert_eq!(spec, ElementSpec::default());
    assert_eq!(spec.kind, ShapeKind::Image);
}

#[test]
fn element_spec_rejects_malformed_json() {
    assert!(matches!(ElementSpec::from_json("{\"pos\": \"here\"}"), Err(EditorError::InvalidSpec(_))));
    assert!(matches!(ElementSpec::from_json("not json"), Err(EditorError::InvalidSpec(_))));
}

// =============================================================
// add
// =============================================================

#[test]
fn add_applies_defaults() {
    let mut store = ElementStore::new();
    let id = store.add(ElementSpec::asset(ShapeKind::Image, "a.png", 5.0, 6.0));
    let el = store.get(&id).unwrap();

    assert_eq!(el.id, id);
    assert_eq!(el.src.as_deref(), Some("a.png"));
    assert!(el.movable);
    assert_eq!(el.pose, Pose { x: 5.0, y: 6.0, ..Pose::default() });
    assert!(!el.has_size());
}

#[test]
fn add_ignores_size_when_asset_backed() {
    let mut store = ElementStore::new();
    let id = store.add(ElementSpec { size: Some([10.0, 10.0]), ..ElementSpec::asset(ShapeKind::Rectangle, "a.png", 0.0, 0.0) });
    assert!(!store.get(&id).unwrap().has_size());
}

#[test]
fn add_treats_empty_src_as_none() {
    let mut store = ElementStore::new();
    let id = store.add(ElementSpec { src: Some(String::new()), ..ElementSpec::shape(ShapeKind::Rectangle, 0.0, 0.0, 10.0, 20.0) });
    let el = store.get(&id).unwrap();
    assert_eq!(el.src, None);
    assert_eq!((el.pose.width, el.pose.height), (10.0, 20.0));
}

#[test]
fn add_normalizes_angle() {
    let mut store = ElementStore::new();
    let id = store.add(ElementSpec { angle: Some(-FRAC_PI_2), ..ElementSpec::default() });
    let angle = store.get(&id).unwrap().pose.angle;
    assert!((angle - 3.0 * FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn add_stacks_in_insertion_order() {
    let mut store = ElementStore::new();
    let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert_eq!(z_of(&store, &a), 1);
    assert_eq!(z_of(&store, &b), 2);
    assert_eq!(store.max_z(), 2);
}

#[test]
fn add_honors_free_explicit_z() {
    let mut store = ElementStore::new();
    let a = store.add(ElementSpec { z_index: Some(10), ..ElementSpec::default() });
    let b = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert_eq!(z_of(&store, &a), 10);
    assert_eq!(z_of(&store, &b), 11);
}

#[test]
fn add_replaces_taken_explicit_z() {
    let mut store = ElementStore::new();
    let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = store.add(ElementSpec { z_index: Some(1), ..ElementSpec::default() });
    assert_eq!(z_of(&store, &a), 1);
    assert_eq!(z_of(&store, &b), 2);
}

#[test]
fn add_above_max_explicit_z_repacks_stack() {
    let mut store = ElementStore::new();
    let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = store.add(ElementSpec { z_index: Some(i64::MAX), ..ElementSpec::default() });
    let c = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert_eq!(z_of(&store, &a), 1);
    assert_eq!(z_of(&store, &b), 2);
    assert_eq!(z_of(&store, &c), 3);
    assert_eq!(store.max_z(), 3);
    let top: Vec<ElementId> = store.topmost_first().iter().map(|e| e.id).collect();
    assert_eq!(top, vec![c, b, a]);
}

// =============================================================
// remove
// =============================================================

#[test]
fn remove_returns_the_element() {
    let mut store = ElementStore::new();
    let id = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert_eq!(store.remove(&id).map(|e| e.id), Some(id));
    assert!(store.is_empty());
    assert!(!store.contains(&id));
}

#[test]
fn remove_unknown_id_keeps_everything() {
    let mut store = ElementStore::new();
    let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert!(store.remove(&Uuid::new_v4()).is_none());
    assert_eq!(store.len(), 2);
    assert!(store.contains(&a) && store.contains(&b));
}

#[test]
fn remove_top_recomputes_max_z() {
    let mut store = ElementStore::new();
    rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    store.remove(&b);
    assert_eq!(store.max_z(), 1);
    let c = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert_eq!(z_of(&store, &c), 2);
}

#[test]
fn remove_last_resets_max_z() {
    let mut store = ElementStore::new();
    let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    store.remove(&a);
    assert_eq!(store.max_z(), 0);
}

// =============================================================
// raise_to_front
// =============================================================

#[test]
fn raise_assigns_max_plus_one() {
    let mut store = ElementStore::new();
    let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert!(store.raise_to_front(&a));
    assert_eq!(z_of(&store, &a), 3);
    assert_ne!(z_of(&store, &a), z_of(&store, &b));
    assert_eq!(store.max_z(), 3);
}

#[test]
fn raise_top_is_noop() {
    let mut store = ElementStore::new();
    rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert!(!store.raise_to_front(&b));
    assert_eq!(z_of(&store, &b), 2);
}

#[test]
fn raise_below_max_explicit_z_repacks_stack() {
    let mut store = ElementStore::new();
    let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = store.add(ElementSpec { z_index: Some(i64::MAX), ..ElementSpec::default() });
    assert!(store.raise_to_front(&a));
    assert_eq!(z_of(&store, &b), 2);
    assert_eq!(z_of(&store, &a), 3);
    assert_eq!(store.max_z(), 3);
}

#[test]
fn raise_unknown_is_noop() {
    let mut store = ElementStore::new();
    rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    assert!(!store.raise_to_front(&Uuid::new_v4()));
    assert_eq!(store.max_z(), 1);
}

// =============================================================
// apply_asset_size
// =============================================================

#[test]
fn asset_size_applies_to_unsized_matches_only() {
    let mut store = ElementStore::new();
    let a1 = store.add(ElementSpec::asset(ShapeKind::Image, "a.png", 0.0, 0.0));
    let a2 = store.add(ElementSpec::asset(ShapeKind::Image, "a.png", 50.0, 0.0));
    let b = store.add(ElementSpec::asset(ShapeKind::Image, "b.png", 0.0, 0.0));

    assert_eq!(store.apply_asset_size("a.png", 64.0, 32.0), 2);
    for id in [a1, a2] {
        let el = store.get(&id).unwrap();
        assert_eq!((el.pose.width, el.pose.height), (64.0, 32.0));
    }
    assert!(!store.get(&b).unwrap().has_size());

    // Already sized elements keep their size.
    assert_eq!(store.apply_asset_size("a.png", 1.0, 1.0), 0);
    assert_eq!(store.get(&a1).unwrap().pose.width, 64.0);
}

#[test]
fn asset_size_after_removal_touches_nothing() {
    let mut store = ElementStore::new();
    let id = store.add(ElementSpec::asset(ShapeKind::Image, "a.png", 0.0, 0.0));
    store.remove(&id);
    assert_eq!(store.apply_asset_size("a.png", 64.0, 32.0), 0);
}

// =============================================================
// Ordering
// =============================================================

#[test]
fn sorted_is_bottom_first_and_topmost_reverses() {
    let mut store = ElementStore::new();
    let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let b = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    let c = rect(&mut store, 0.0, 0.0, 1.0, 1.0);
    store.raise_to_front(&a);

    let order: Vec<ElementId> = store.sorted().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![b, c, a]);
    let order: Vec<ElementId> = store.topmost_first().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![a, c, b]);
}

// =============================================================
// Element geometry
// =============================================================

#[test]
fn center_is_box_midpoint_including_scale() {
    let mut store = ElementStore::new();
    let id = store.add(ElementSpec { scale: Some([2.0, 0.5]), ..ElementSpec::shape(ShapeKind::Rectangle, 10.0, 20.0, 100.0, 80.0) });
    let el = store.get(&id).unwrap();
    assert_eq!(el.extent(), (200.0, 40.0));
    assert_eq!(el.center(), Point::new(110.0, 40.0));
    assert_eq!(el.bounding_box()[2], Point::new(210.0, 60.0));
}

#[test]
fn to_local_undoes_rotation() {
    let mut store = ElementStore::new();
    let id = store.add(ElementSpec { angle: Some(FRAC_PI_2), ..ElementSpec::shape(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 20.0) });
    let el = store.get(&id).unwrap();
    // A quarter turn about (50, 10) sends local (+50, 0) to world (50, 60).
    let local = el.to_local(Point::new(50.0, 60.0));
    assert!((local.x - 50.0).abs() < 1e-9 && local.y.abs() < 1e-9);
}

#[test]
fn world_polygon_rotates_about_center() {
    let mut store = ElementStore::new();
    let id = store.add(ElementSpec { angle: Some(FRAC_PI_2), ..ElementSpec::shape(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 20.0) });
    let poly = store.get(&id).unwrap().world_polygon();
    let b = geom::bounds(&poly).unwrap();
    assert!((b.min.x - 40.0).abs() < 1e-9 && (b.max.x - 60.0).abs() < 1e-9);
    assert!((b.min.y + 40.0).abs() < 1e-9 && (b.max.y - 60.0).abs() < 1e-9);
}
