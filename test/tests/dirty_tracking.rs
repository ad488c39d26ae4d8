/// Integration tests for change detection across sync cycles

use glam::Vec3;

use scenesync_client::{SyncScope, SyncSettings};
use scenesync_shared::{Entity, MessageKind, Transform};
use scenesync_test::{
    channel_engine, drain_envelopes, message_kinds, set_scenes, sync_blocking, triangle_mesh,
};

#[test]
fn unchanged_content_is_not_resent() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());

    engine.add_transform(Transform::new("/a"));
    engine.add_mesh(triangle_mesh("/a/mesh"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    assert_eq!(drain_envelopes(&frames).len(), 4);

    assert!(!engine.add_transform(Transform::new("/a")));
    assert!(!engine.add_mesh(triangle_mesh("/a/mesh")));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    assert!(drain_envelopes(&frames).is_empty());
}

#[test]
fn moved_geometry_is_sent_as_a_transform() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.add_mesh(triangle_mesh("/mesh"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    drain_envelopes(&frames);

    let mut moved = triangle_mesh("/mesh");
    moved.transform.position = Vec3::new(0.0, 5.0, 0.0);
    assert!(engine.add_mesh(moved));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let envelopes = drain_envelopes(&frames);
    assert_eq!(
        message_kinds(&envelopes),
        vec![MessageKind::Fence, MessageKind::Set, MessageKind::Fence]
    );
    let bulk = set_scenes(&envelopes)[0];
    match bulk.find_entity("/mesh") {
        Some(Entity::Transform(transform)) => {
            assert_eq!(transform.position, Vec3::new(0.0, 5.0, 0.0))
        }
        other => panic!("expected a transform-only update, got {:?}", other),
    }
}

#[test]
fn changed_geometry_is_sent_on_its_own() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.add_mesh(triangle_mesh("/mesh"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    drain_envelopes(&frames);

    let mut reshaped = triangle_mesh("/mesh");
    reshaped.points[2] = Vec3::new(0.0, 2.0, 0.0);
    assert!(engine.add_mesh(reshaped.clone()));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let envelopes = drain_envelopes(&frames);
    let scenes = set_scenes(&envelopes);
    assert_eq!(scenes.len(), 2);
    assert!(scenes[0].entities.is_empty());
    assert_eq!(scenes[1].entities, vec![Entity::Mesh(reshaped)]);
}

#[test]
fn repeated_adds_within_a_cycle_send_once() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());

    let mut transform = Transform::new("/a");
    assert!(engine.add_transform(transform.clone()));
    assert!(!engine.add_transform(transform.clone()));
    transform.position = Vec3::X;
    assert!(engine.add_transform(transform.clone()));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let envelopes = drain_envelopes(&frames);
    let scenes = set_scenes(&envelopes);
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].entities, vec![Entity::Transform(transform)]);
}

#[test]
fn force_full_resends_everything() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.add_transform(Transform::new("/a"));
    engine.add_transform(Transform::new("/b"));
    engine.add_mesh(triangle_mesh("/c"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    drain_envelopes(&frames);

    engine.touch("/a");
    engine.touch("/b");
    engine.touch("/c");
    assert!(sync_blocking(&mut engine, SyncScope::All, true));

    let envelopes = drain_envelopes(&frames);
    let paths: Vec<&str> = set_scenes(&envelopes)
        .into_iter()
        .flat_map(|scene| scene.entities.iter().map(|entity| entity.path()))
        .collect();
    assert_eq!(paths, vec!["/a", "/b", "/c"]);
}

#[test]
fn entities_are_sent_by_order_then_path() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());

    let mut late = Transform::new("/a");
    late.order = 5;
    engine.add_transform(late);
    engine.add_transform(Transform::new("/c"));
    engine.add_transform(Transform::new("/b"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let envelopes = drain_envelopes(&frames);
    let paths: Vec<&str> = set_scenes(&envelopes)[0]
        .entities
        .iter()
        .map(|entity| entity.path())
        .collect();
    assert_eq!(paths, vec!["/b", "/c", "/a"]);
}
