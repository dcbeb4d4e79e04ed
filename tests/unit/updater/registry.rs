use super::*;
use crate::foundation::core::{Point, Vec2};
use crate::graph::object::VisualObject;
use std::cell::RefCell;
use std::rc::Rc;

fn scene() -> (SceneGraph, ViewTransform) {
    (SceneGraph::new(), ViewTransform::default())
}

#[test]
fn follower_tracks_its_dependency() {
    let (mut g, mut view) = scene();
    let leader = g.add(VisualObject::dot());
    let follower = g.add(VisualObject::rect(1.0, 1.0));
    let mut reg = UpdaterRegistry::new();
    reg.add_object(follower, [leader], move |ctx| {
        let c = ctx.graph().center(leader)?;
        ctx.target()?.move_to(c + Vec2::new(0.0, 2.0));
        Ok(())
    });

    g.object_mut(leader).unwrap().move_to(Point::new(3.0, 0.0));
    let report = reg.run(0.1, 0.1, &mut g, &mut view).unwrap();
    assert!(report.is_clean());
    let c = g.center(follower).unwrap();
    assert!((c.x - 3.0).abs() < 1e-9 && (c.y - 2.0).abs() < 1e-9);
}

#[test]
fn bindings_run_in_registration_order() {
    let (mut g, mut view) = scene();
    let a = g.add(VisualObject::tracker(0.0));
    let b = g.add(VisualObject::tracker(0.0));
    let mut reg = UpdaterRegistry::new();
    reg.add_object(a, [], |ctx| {
        ctx.target()?.set_value(5.0);
        Ok(())
    });
    reg.add_object(b, [a], move |ctx| {
        let v = ctx.graph().state(a)?.value;
        ctx.target()?.set_value(v * 2.0);
        Ok(())
    });
    reg.run(0.1, 0.1, &mut g, &mut view).unwrap();
    assert_eq!(g.state(b).unwrap().value, 10.0);
}

#[test]
fn failing_callbacks_leave_the_target_untouched() {
    let (mut g, mut view) = scene();
    let id = g.add(VisualObject::tracker(1.0));
    let mut reg = UpdaterRegistry::new();
    let calls = Rc::new(RefCell::new(0));
    let seen = Rc::clone(&calls);
    let bad = reg.add_object(id, [], move |ctx| {
        *seen.borrow_mut() += 1;
        ctx.target()?.set_value(99.0);
        anyhow::bail!("sensor offline")
    });

    let report = reg.run(0.1, 0.1, &mut g, &mut view).unwrap();
    assert_eq!(g.state(id).unwrap().value, 1.0);
    assert_eq!(report.deactivated.len(), 1);
    assert!(report.deactivated[0].1.contains("sensor offline"));
    assert!(!reg.is_active(bad));

    reg.run(0.1, 0.2, &mut g, &mut view).unwrap();
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn destroyed_dependencies_deactivate_the_binding() {
    let (mut g, mut view) = scene();
    let leader = g.add(VisualObject::dot());
    let follower = g.add(VisualObject::dot());
    let mut reg = UpdaterRegistry::new();
    let id = reg.add_object(follower, [leader], |_| Ok(()));
    g.destroy(leader).unwrap();

    let report = reg.run(0.1, 0.1, &mut g, &mut view).unwrap();
    assert_eq!(report.deactivated[0].0, id);
    assert_eq!(reg.active_count(), 0);
}

#[test]
fn removals_apply_on_the_next_run() {
    let (mut g, mut view) = scene();
    let a = g.add(VisualObject::tracker(0.0));
    let mut reg = UpdaterRegistry::new();
    let first = reg.add_object(a, [], |ctx| {
        let v = ctx.graph().state(ctx.graph().root())?.value;
        ctx.target()?.set_value(v + 1.0);
        Ok(())
    });
    reg.add_object(a, [], |ctx| {
        ctx.target()?.shift(Vec2::new(1.0, 0.0));
        Ok(())
    });
    reg.remove(first);
    assert_eq!(reg.len(), 2);
    reg.run(0.1, 0.1, &mut g, &mut view).unwrap();
    assert_eq!(reg.len(), 1);
    assert_eq!(g.state(a).unwrap().value, 0.0);

    reg.clear_target(a);
    reg.run(0.1, 0.2, &mut g, &mut view).unwrap();
    assert!(reg.is_empty());
}

#[test]
fn view_updaters_write_the_camera() {
    let (mut g, mut view) = scene();
    let mut reg = UpdaterRegistry::new();
    reg.add_view(|ctx| {
        let dt = ctx.dt;
        let v = ctx.target_view()?;
        v.set_gamma(v.gamma() + dt)?;
        Ok(())
    });
    reg.add_view(|ctx| {
        ctx.target()?;
        Ok(())
    });
    let report = reg.run(0.5, 0.5, &mut g, &mut view).unwrap();
    assert_eq!(view.gamma(), 0.5);
    assert_eq!(report.committed.len(), 1);
    assert_eq!(report.deactivated.len(), 1);
}

#[test]
fn tags_written_by_updaters_commit_and_roll_back_with_the_state() {
    let (mut g, mut view) = scene();
    let a = g.add(VisualObject::tracker(0.0).with_tag("idle"));
    let b = g.add(VisualObject::tracker(0.0).with_tag("idle"));
    let mut reg = UpdaterRegistry::new();
    reg.add_object(a, [], |ctx| {
        ctx.target()?.tag("live").set_value(1.0);
        Ok(())
    });
    reg.add_object(b, [], |ctx| {
        ctx.target()?.tag("live").set_value(1.0);
        anyhow::bail!("not yet")
    });

    let report = reg.run(0.1, 0.1, &mut g, &mut view).unwrap();
    assert_eq!(report.committed.len(), 1);
    assert_eq!(g.node(a).unwrap().tag(), Some("live"));
    assert_eq!(g.state(a).unwrap().value, 1.0);
    assert_eq!(g.node(b).unwrap().tag(), Some("idle"));
    assert_eq!(g.state(b).unwrap().value, 0.0);
}
