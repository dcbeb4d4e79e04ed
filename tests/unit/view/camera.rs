use super::*;
use std::f64::consts::PI;

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn default_orientation_is_flat_identity() {
    let v = ViewTransform::default();
    assert!(v.is_flat());
    let p = Point::new(1.5, -2.0);
    assert_eq!(v.project(p, 0.0), p);
    assert_eq!(v.to_affine() * p, p);
}

#[test]
fn zoom_and_center_scale_about_the_frame_middle() {
    let mut v = ViewTransform::default();
    v.set_center(Point::new(1.0, 1.0)).unwrap();
    v.set_zoom(2.0).unwrap();
    assert!(close(v.project(Point::new(2.0, 1.0), 0.0), Point::new(2.0, 0.0)));
    assert!(close(v.to_affine() * Point::new(2.0, 1.0), Point::new(2.0, 0.0)));
}

#[test]
fn invalid_camera_parameters_are_rejected() {
    let mut v = ViewTransform::default();
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(v.set_zoom(bad), Err(KinescopeError::Validation(_))));
        assert!(matches!(
            v.set_distance(bad),
            Err(KinescopeError::Validation(_))
        ));
    }
    assert!(v.set_orientation(f64::NAN, 0.0).is_err());
    assert_eq!(v, ViewTransform::default());
}

#[test]
fn tilting_foreshortens_and_applies_perspective() {
    let mut v = ViewTransform::default();
    v.set_orientation(PI / 2.0, -PI / 2.0).unwrap();
    assert!(!v.is_flat());
    // Looking along the ground plane, y collapses onto the view depth axis.
    let p = v.project(Point::new(1.0, 0.0), 0.0);
    assert!(close(p, Point::new(1.0, 0.0)));
    let q = v.project(Point::new(0.0, 1.0), 0.0);
    assert!(q.x.abs() < 1e-9);
    assert!(q.y.abs() < 1e-9);
    let near = v.project(Point::new(1.0, 0.0), 2.0);
    assert!(near.y > 1.0);
}

#[test]
fn mutations_apply_in_order_and_blend() {
    let a = ViewTransform::default();
    let b = a
        .with_mutations(&[
            ViewMutation::Zoom(3.0),
            ViewMutation::MoveTo(Point::new(2.0, 0.0)),
            ViewMutation::Gamma(0.5),
        ])
        .unwrap();
    assert_eq!(b.zoom(), 3.0);
    assert_eq!(b.gamma(), 0.5);
    assert_eq!(ViewTransform::lerp(&a, &b, 0.0), a);
    assert_eq!(ViewTransform::lerp(&a, &b, 1.0), b);
    assert_eq!(ViewTransform::lerp(&a, &b, 0.5).zoom(), 2.0);
    assert!(a.with_mutations(&[ViewMutation::Distance(-1.0)]).is_err());
}
