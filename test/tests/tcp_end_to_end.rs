/// End-to-end tests: a SyncEngine exporting to a Server over real TCP
/// sockets on the loopback interface

use std::{
    io::Write,
    net::{SocketAddr, TcpListener, TcpStream},
    time::Duration,
};

use glam::Vec3;

use scenesync_client::{ClientConfig, SyncEngine, SyncScope, SyncSettings};
use scenesync_server::{Server, ServerConfig, ServerEvent};
use scenesync_shared::{
    write_frame, Entity, Envelope, FenceKind, Message, MessageHeader, Transform,
};
use scenesync_test::{sync_blocking, triangle_mesh, SceneBuilder};

const TIMEOUT: Duration = Duration::from_secs(10);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn local_server(max_frame_size: Option<u64>) -> Server {
    let mut config = ServerConfig {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        ..Default::default()
    };
    if let Some(max_frame_size) = max_frame_size {
        config.max_frame_size = max_frame_size;
    }
    Server::listen(config).unwrap()
}

fn engine_for(server: &Server, session_id: u32) -> SyncEngine {
    let config = ClientConfig {
        server_address: server.local_addr(),
        timeout: TIMEOUT,
        session_id: Some(session_id),
    };
    SyncEngine::new(&config, SyncSettings::default()).unwrap()
}

/// Collects events until `connections` connections have closed
fn collect_connections(server: &mut Server, connections: usize) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    let mut closed = 0;
    while closed < connections {
        let (_, event) = server
            .receive_timeout(TIMEOUT)
            .expect("server should deliver an event");
        if event == ServerEvent::Disconnected {
            closed += 1;
        }
        events.push(event);
    }
    events
}

fn frame(message_id: u32, message: Message) -> Vec<u8> {
    Envelope::new(MessageHeader::new(5, message_id), message).to_bytes()
}

// ========== Engine to server ==========

#[test]
fn exported_scene_reaches_the_server() {
    init_logging();
    let mut server = local_server(None);
    let mut engine = engine_for(&server, 77);

    let mut root = Transform::new("/root");
    root.position = Vec3::new(1.0, 2.0, 3.0);
    engine.add_transform(root.clone());
    engine.add_mesh(triangle_mesh("/root/mesh"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let events = collect_connections(&mut server, 1);
    assert_eq!(events[0], ServerEvent::Connected);
    assert_eq!(events[1], ServerEvent::SceneBegin { session_id: 77 });
    match &events[2] {
        ServerEvent::SceneUpdated { scene, .. } => {
            assert_eq!(scene.entities, vec![Entity::Transform(root)])
        }
        other => panic!("expected the bulk scene, got {:?}", other),
    }
    match &events[3] {
        ServerEvent::SceneUpdated { scene, .. } => {
            assert_eq!(scene.entities[0].path(), "/root/mesh")
        }
        other => panic!("expected the mesh, got {:?}", other),
    }
    assert_eq!(
        events[4],
        ServerEvent::SceneEnd {
            session_id: 77,
            messages: 2
        }
    );
    assert_eq!(events[5], ServerEvent::Disconnected);
}

#[test]
fn every_export_uses_its_own_connection() {
    init_logging();
    let mut server = local_server(None);
    let mut engine = engine_for(&server, 3);

    engine.add_transform(Transform::new("/a"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));
    engine.touch("/a");
    engine.add_transform(Transform::new("/b"));
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let events = collect_connections(&mut server, 2);
    let ends = events
        .iter()
        .filter(|event| matches!(event, ServerEvent::SceneEnd { .. }))
        .count();
    assert_eq!(ends, 2);
}

#[test]
fn refused_connection_is_reported_and_retried() {
    init_logging();
    // grab a free port, then close it again
    let address: SocketAddr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let config = ClientConfig {
        server_address: address,
        timeout: Duration::from_secs(2),
        session_id: Some(1),
    };
    let mut engine = SyncEngine::new(&config, SyncSettings::default()).unwrap();

    engine.add_transform(Transform::new("/a"));
    assert!(!sync_blocking(&mut engine, SyncScope::Updated, false));
    assert!(engine.last_error().is_some());
    assert!(engine.entities().dirty_kind("/a").is_some());
}

// ========== Raw frames ==========

#[test]
fn corrupt_scene_does_not_end_the_connection() {
    init_logging();
    let mut server = local_server(None);

    let scene = SceneBuilder::new("raw")
        .transform("/a", Vec3::ONE)
        .mesh("/b")
        .build();
    let mut corrupt = frame(1, Message::Set(scene.clone()));
    let last = corrupt.len() - 1;
    corrupt[last - 3] ^= 0x20;

    let mut stream = TcpStream::connect(server.local_addr()).unwrap();
    write_frame(&mut stream, &frame(0, Message::Fence(FenceKind::SceneBegin))).unwrap();
    write_frame(&mut stream, &corrupt).unwrap();
    write_frame(&mut stream, &frame(2, Message::Set(scene.clone()))).unwrap();
    write_frame(&mut stream, &frame(3, Message::Fence(FenceKind::SceneEnd))).unwrap();
    stream.flush().unwrap();
    drop(stream);

    let events = collect_connections(&mut server, 1);
    assert!(matches!(
        &events[2],
        ServerEvent::MessageDropped { reason } if reason.is_corrupt_scene()
    ));
    assert_eq!(
        events[3],
        ServerEvent::SceneUpdated {
            session_id: 5,
            scene
        }
    );
    assert_eq!(
        events[4],
        ServerEvent::SceneEnd {
            session_id: 5,
            messages: 1
        }
    );
}

#[test]
fn oversized_frame_closes_the_connection() {
    init_logging();
    let mut server = local_server(Some(64));

    let big = SceneBuilder::new("big")
        .mesh("/a")
        .mesh("/b")
        .mesh("/c")
        .build();

    let mut stream = TcpStream::connect(server.local_addr()).unwrap();
    write_frame(&mut stream, &frame(0, Message::Fence(FenceKind::SceneBegin))).unwrap();
    // the server may already have closed its side by the time this lands
    let _ = write_frame(&mut stream, &frame(1, Message::Set(big)));
    let _ = stream.flush();

    let events = collect_connections(&mut server, 1);
    assert_eq!(
        events,
        vec![
            ServerEvent::Connected,
            ServerEvent::SceneBegin { session_id: 5 },
            ServerEvent::Disconnected
        ]
    );
}
