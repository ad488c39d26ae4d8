use scenesync_shared::{DeleteMessage, GetMessage, MessageError, Scene};

/// Something a connection delivered, in arrival order per connection
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Connected,
    Disconnected,
    SceneBegin {
        session_id: u32,
    },
    SceneUpdated {
        session_id: u32,
        scene: Scene,
    },
    Deleted {
        session_id: u32,
        delete: DeleteMessage,
    },
    /// Closes the batch opened by the last SceneBegin
    SceneEnd {
        session_id: u32,
        /// Set and Delete messages received inside the batch
        messages: usize,
    },
    GetRequested {
        session_id: u32,
        request: GetMessage,
    },
    /// A frame could not be decoded. The connection stays open.
    MessageDropped {
        reason: MessageError,
    },
}

impl ServerEvent {
    pub fn session_id(&self) -> Option<u32> {
        match self {
            ServerEvent::SceneBegin { session_id }
            | ServerEvent::SceneUpdated { session_id, .. }
            | ServerEvent::Deleted { session_id, .. }
            | ServerEvent::SceneEnd { session_id, .. }
            | ServerEvent::GetRequested { session_id, .. } => Some(*session_id),
            ServerEvent::Connected
            | ServerEvent::Disconnected
            | ServerEvent::MessageDropped { .. } => None,
        }
    }
}
