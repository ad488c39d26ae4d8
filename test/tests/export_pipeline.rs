/// Integration tests for the background export: one export at a time,
/// failures keep their changes for the next sync, and messages keep their
/// order

use std::time::Duration;

use glam::Vec3;

use scenesync_client::{SyncEngine, SyncScope, SyncSettings};
use scenesync_shared::{DirtyKind, Entity, FenceKind, FileAsset, Message, MessageKind, Transform};
use scenesync_test::{
    drain_envelopes, message_kinds, set_scenes, sync_blocking, triangle_mesh, FailingConnector,
    FlakyConnector, GatedConnector, TruncatingConnector,
};

const TIMEOUT: Duration = Duration::from_secs(10);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ========== Single flight ==========

#[test]
fn second_sync_is_refused_while_exporting() {
    init_logging();
    let (connector, gate, frames) = GatedConnector::new();
    let mut engine =
        SyncEngine::with_connector(Box::new(connector), 1, SyncSettings::default()).unwrap();

    engine.add_transform(Transform::new("/a"));
    assert!(engine.sync(SyncScope::All, false));
    assert!(engine.is_exporting());
    assert!(!engine.sync(SyncScope::All, false));

    gate.send(()).unwrap();
    assert!(engine.wait(Some(TIMEOUT)));
    assert!(!engine.is_exporting());
    assert!(engine.last_error().is_none());
    assert_eq!(set_scenes(&drain_envelopes(&frames)).len(), 1);
}

#[test]
fn changes_made_during_an_export_go_out_next_time() {
    init_logging();
    let (connector, gate, frames) = GatedConnector::new();
    let mut engine =
        SyncEngine::with_connector(Box::new(connector), 1, SyncSettings::default()).unwrap();

    engine.add_transform(Transform::new("/a"));
    assert!(engine.sync(SyncScope::All, false));

    let mut moved = Transform::new("/a");
    moved.position = Vec3::Y;
    engine.add_transform(moved.clone());
    engine.add_transform(Transform::new("/b"));

    gate.send(()).unwrap();
    assert!(engine.wait(Some(TIMEOUT)));
    let first = drain_envelopes(&frames);
    assert_eq!(
        set_scenes(&first)[0].entities,
        vec![Entity::Transform(Transform::new("/a"))]
    );

    // the export committed the old content of /a, so the new one is still dirty
    assert_eq!(engine.entities().dirty_kind("/a"), Some(DirtyKind::Transform));

    gate.send(()).unwrap();
    assert!(sync_blocking(&mut engine, SyncScope::Updated, false));
    let second = drain_envelopes(&frames);
    assert_eq!(
        set_scenes(&second)[0].entities,
        vec![
            Entity::Transform(moved),
            Entity::Transform(Transform::new("/b"))
        ]
    );
}

// ========== Failures ==========

#[test]
fn failed_export_keeps_everything_dirty() {
    init_logging();
    let connector = FailingConnector::new();
    let mut engine = SyncEngine::with_connector(
        Box::new(connector.clone()),
        1,
        SyncSettings::default(),
    )
    .unwrap();

    engine.add_transform(Transform::new("/a"));
    assert!(!sync_blocking(&mut engine, SyncScope::All, false));
    assert!(engine.last_error().is_some());
    assert_eq!(engine.entities().dirty_kind("/a"), Some(DirtyKind::Payload));

    engine.touch("/a");
    assert!(!sync_blocking(&mut engine, SyncScope::All, false));
    assert_eq!(connector.attempts(), 2);
    assert!(engine.entities().get("/a").is_some());
}

#[test]
fn retry_after_refused_connection_sends_the_same_content() {
    init_logging();
    let (connector, frames) = FlakyConnector::new(1);
    let mut engine =
        SyncEngine::with_connector(Box::new(connector), 1, SyncSettings::default()).unwrap();

    engine.add_transform(Transform::new("/a"));
    engine.add_file_asset(FileAsset::new("notes.txt", b"hello".to_vec()));
    assert!(!sync_blocking(&mut engine, SyncScope::All, false));
    assert!(drain_envelopes(&frames).is_empty());

    engine.touch("/a");
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    assert!(engine.last_error().is_none());

    let envelopes = drain_envelopes(&frames);
    let bulk = set_scenes(&envelopes)[0];
    assert_eq!(bulk.entities, vec![Entity::Transform(Transform::new("/a"))]);
    assert_eq!(bulk.assets.len(), 1);
}

#[test]
fn retry_after_broken_connection_resends_the_whole_batch() {
    init_logging();
    let (connector, frames) = TruncatingConnector::new(2, 1);
    let mut engine =
        SyncEngine::with_connector(Box::new(connector), 1, SyncSettings::default()).unwrap();

    engine.add_transform(Transform::new("/a"));
    engine.add_mesh(triangle_mesh("/a/mesh"));
    assert!(!sync_blocking(&mut engine, SyncScope::All, false));
    let partial = drain_envelopes(&frames);
    assert_eq!(partial.len(), 2);

    engine.touch("/a");
    engine.touch("/a/mesh");
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    let envelopes = drain_envelopes(&frames);
    assert_eq!(
        message_kinds(&envelopes),
        vec![
            MessageKind::Fence,
            MessageKind::Set,
            MessageKind::Set,
            MessageKind::Fence
        ]
    );
    assert_eq!(set_scenes(&envelopes)[1].entities[0].path(), "/a/mesh");
}

// ========== Ordering ==========

#[test]
fn message_ids_increase_across_exports() {
    init_logging();
    let (connector, frames) = FlakyConnector::new(0);
    let mut engine =
        SyncEngine::with_connector(Box::new(connector), 9, SyncSettings::default()).unwrap();

    engine.add_transform(Transform::new("/a"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    let mut moved = Transform::new("/a");
    moved.position = Vec3::X;
    engine.add_transform(moved);
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let envelopes = drain_envelopes(&frames);
    assert_eq!(envelopes.len(), 6);
    for (index, envelope) in envelopes.iter().enumerate() {
        assert_eq!(envelope.header.session_id, 9);
        assert_eq!(envelope.header.message_id, index as u32);
    }
    assert_eq!(envelopes[0].message, Message::Fence(FenceKind::SceneBegin));
    assert_eq!(envelopes[3].message, Message::Fence(FenceKind::SceneBegin));
}

#[test]
fn nothing_is_sent_for_an_empty_cycle() {
    init_logging();
    let (connector, frames) = FlakyConnector::new(0);
    let mut engine =
        SyncEngine::with_connector(Box::new(connector), 1, SyncSettings::default()).unwrap();

    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    assert!(drain_envelopes(&frames).is_empty());
    assert!(engine.last_error().is_none());
}
