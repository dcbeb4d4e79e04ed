use super::*;

#[test]
fn empty_object_gives_defaults() {
    let cfg = SceneConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, SceneConfig::default());
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.canvas.width, 1280);
    assert_eq!(cfg.background, Color::BLACK);
    assert!((cfg.frame_height() - 8.0).abs() < 1e-3);
}

#[test]
fn background_accepts_hex_and_objects() {
    let cfg = SceneConfig::from_reader(r##"{"background": "#ffffff"}"##.as_bytes()).unwrap();
    assert_eq!(cfg.background, Color::WHITE);
    let cfg = SceneConfig::from_reader(r#"{"background": {"r": 1, "g": 0, "b": 0}}"#.as_bytes())
        .unwrap();
    assert_eq!(cfg.background, Color::rgb(1.0, 0.0, 0.0));
}

#[test]
fn invalid_configs_are_validation_errors() {
    for bad in [
        r#"{"fps": {"num": 0, "den": 1}}"#,
        r#"{"canvas": {"width": 0, "height": 10}}"#,
        r#"{"frame_width": -1.0}"#,
        r#"{"background": "not a color"}"#,
        "[",
    ] {
        assert!(
            matches!(
                SceneConfig::from_reader(bad.as_bytes()),
                Err(KinescopeError::Validation(_))
            ),
            "{bad}"
        );
    }
    assert!(matches!(
        SceneConfig::from_path("/definitely/not/here.json"),
        Err(KinescopeError::Validation(_))
    ));
}

#[test]
fn quality_presets_set_canvas_and_fps() {
    let cfg = SceneConfig::default().with_quality(Quality::High);
    assert_eq!(cfg.canvas.height, 1080);
    assert_eq!(cfg.fps.num, 60);
    assert!((cfg.frame_duration() - 1.0 / 60.0).abs() < 1e-15);
}
