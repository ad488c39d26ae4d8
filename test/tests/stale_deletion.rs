/// Integration tests for deletions found by the stale sweep

use scenesync_client::{SyncScope, SyncSettings};
use scenesync_shared::{HostHandle, Identifier, Material, MessageKind, Transform, INVALID_ID};
use scenesync_test::{
    channel_engine, deleted_entities, deleted_materials, drain_envelopes, message_kinds,
    sync_blocking, triangle_mesh,
};

fn transform(path: &str, id: i32) -> Transform {
    let mut transform = Transform::new(path);
    transform.id = id;
    transform
}

#[test]
fn missing_entities_are_deleted_on_full_sync() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.add_transform(transform("/keep", 0));
    engine.add_transform(transform("/gone", 1));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    drain_envelopes(&frames);

    engine.touch("/keep");
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let envelopes = drain_envelopes(&frames);
    assert_eq!(
        message_kinds(&envelopes),
        vec![
            MessageKind::Fence,
            MessageKind::Delete,
            MessageKind::Set,
            MessageKind::Fence
        ]
    );
    assert_eq!(deleted_entities(&envelopes), vec![Identifier::new("/gone", 1)]);
    assert!(engine.entities().get("/gone").is_none());
    assert!(engine.entities().get("/keep").is_some());
}

#[test]
fn updated_scope_never_deletes() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.add_transform(transform("/a", 0));
    engine.add_mesh(triangle_mesh("/b"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    drain_envelopes(&frames);

    assert!(sync_blocking(&mut engine, SyncScope::Updated, false));
    assert!(deleted_entities(&drain_envelopes(&frames)).is_empty());
    assert_eq!(engine.entities().len(), 2);
}

#[test]
fn explicit_sweep_applies_to_any_scope() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.add_transform(transform("/a", 0));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    drain_envelopes(&frames);

    engine.erase_stale();
    assert!(sync_blocking(&mut engine, SyncScope::Selected, false));
    assert_eq!(
        deleted_entities(&drain_envelopes(&frames)),
        vec![Identifier::new("/a", 0)]
    );
}

#[test]
fn explicit_sweep_is_not_repeated_by_full_sync() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.add_transform(transform("/a", 0));
    engine.erase_stale();
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let envelopes = drain_envelopes(&frames);
    assert!(deleted_entities(&envelopes).is_empty());
    assert_eq!(engine.entities().len(), 1);
}

#[test]
fn readding_before_sync_cancels_deletion() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.add_transform(transform("/a", 0));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    drain_envelopes(&frames);

    engine.erase_stale();
    engine.add_transform(transform("/a", 0));
    assert!(sync_blocking(&mut engine, SyncScope::Updated, false));

    let envelopes = drain_envelopes(&frames);
    assert!(deleted_entities(&envelopes).is_empty());
    assert!(engine.entities().get("/a").is_some());
}

#[test]
fn missing_materials_are_deleted() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    let kept = engine.add_material(&HostHandle(1), Material::new(INVALID_ID, "kept"));
    let gone = engine.add_material(&HostHandle(2), Material::new(INVALID_ID, "gone"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    drain_envelopes(&frames);

    assert_eq!(
        engine.add_material(&HostHandle(1), Material::new(INVALID_ID, "kept")),
        kept
    );
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    assert_eq!(
        deleted_materials(&drain_envelopes(&frames)),
        vec![Identifier::new("gone", gone)]
    );
}

#[test]
fn forgotten_handles_get_fresh_ids() {
    let (mut engine, _frames) = channel_engine(SyncSettings::default());
    let first = engine.entity_id(&HostHandle(7));
    let other = engine.entity_id(&HostHandle(8));
    engine.erase_stale();

    // queried again before the next sweep, so it survives
    assert_eq!(engine.entity_id(&HostHandle(8)), other);
    engine.erase_stale();

    let again = engine.entity_id(&HostHandle(7));
    assert_ne!(again, first);
    assert!(again > other);
}
