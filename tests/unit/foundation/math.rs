use super::*;

#[test]
fn srgb_linear_roundtrip_is_close() {
    for c in [0.0, 0.002, 0.04, 0.2, 0.5, 0.9, 1.0] {
        let back = linear_to_srgb(srgb_to_linear(c));
        assert!((back - c).abs() < 1e-12, "{c} -> {back}");
    }
}

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
}

#[test]
fn sigmoid_is_centered() {
    assert_eq!(sigmoid(0.0), 0.5);
    assert!(sigmoid(10.0) > 0.99);
    assert_eq!(clamp01(1.5), 1.0);
}
