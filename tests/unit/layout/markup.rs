use super::*;

#[test]
fn splits_isolated_parts_and_literal_runs() {
    let segs = split_markup("{{x}}^2+{{y}}^2").unwrap();
    let texts: Vec<(&str, bool)> = segs.iter().map(|s| (s.text.as_str(), s.isolated)).collect();
    assert_eq!(
        texts,
        [("x", true), ("^2+", false), ("y", true), ("^2", false)]
    );
    assert_eq!(split_markup("a=b").unwrap().len(), 1);
    assert!(split_markup("").unwrap().is_empty());
}

#[test]
fn rejects_broken_markers() {
    assert!(matches!(
        split_markup("{{x"),
        Err(KinescopeError::Validation(_))
    ));
    assert!(matches!(
        split_markup("a{{ }}b"),
        Err(KinescopeError::Validation(_))
    ));
}

#[test]
fn box_layout_tags_each_segment() {
    let mut g = SceneGraph::new();
    let root = BoxLayout::default()
        .layout(&mut g, "{{x}}^2 + {{y}}")
        .unwrap();
    assert!(!g.is_attached(root));
    let tags: Vec<&str> = g
        .node(root)
        .unwrap()
        .children()
        .iter()
        .map(|&c| g.node(c).unwrap().tag().unwrap())
        .collect();
    assert_eq!(tags, ["x", "^2 +", "y"]);

    // Whitespace advances without producing a box.
    let run = g.find_by_tag(root, "^2 +").unwrap()[0];
    assert_eq!(g.node(run).unwrap().children().len(), 3);
}

#[test]
fn box_layout_centers_the_row() {
    let mut g = SceneGraph::new();
    let root = BoxLayout::default().layout(&mut g, "abc").unwrap();
    let c = g.center(root).unwrap();
    assert!(c.x.abs() < 1e-12 && c.y.abs() < 1e-12);
    let b = g.bounding_box(root).unwrap().unwrap();
    assert!((b.width() - (2.0 * 0.5 + 0.4)).abs() < 1e-12);

    assert!(BoxLayout::default().layout(&mut g, "").is_err());
}
