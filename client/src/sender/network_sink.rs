use log::debug;

use scenesync_shared::{Envelope, FenceKind, Message, MessageHeader};

use super::{
    exporter::{ExportReport, ExportSink},
    snapshot::SceneSnapshot,
};
use crate::{
    error::SyncError,
    transport::{Connector, FrameSender},
};

/// Sends each snapshot as a fenced message sequence over a fresh connection:
/// SceneBegin, Delete (if anything was deleted), the bulk Set, one Set per
/// geometry, SceneEnd.
pub struct NetworkSink {
    connector: Box<dyn Connector>,
    session_id: u32,
    next_message_id: u32,
}

impl NetworkSink {
    pub fn new(connector: Box<dyn Connector>, session_id: u32) -> Self {
        Self {
            connector,
            session_id,
            next_message_id: 0,
        }
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    fn send(
        &mut self,
        connection: &mut dyn FrameSender,
        message: Message,
        report: &mut ExportReport,
    ) -> Result<(), SyncError> {
        let header = MessageHeader::new(self.session_id, self.next_message_id);
        self.next_message_id = self.next_message_id.wrapping_add(1);

        let bytes = Envelope::new(header, message).to_bytes();
        connection.send_frame(&bytes)?;

        report.messages_sent += 1;
        report.bytes_sent += bytes.len() as u64;
        Ok(())
    }
}

impl ExportSink for NetworkSink {
    fn name(&self) -> &'static str {
        "sender"
    }

    fn export(&mut self, mut snapshot: SceneSnapshot) -> Result<ExportReport, SyncError> {
        let mut report = ExportReport::default();
        if snapshot.is_empty() {
            debug!("NetworkSink: nothing to send");
            return Ok(report);
        }
        snapshot.sort_entities();

        let mut connection = self.connector.connect()?;
        let connection = connection.as_mut();

        self.send(connection, Message::Fence(FenceKind::SceneBegin), &mut report)?;
        if let Some(delete) = snapshot.delete_message() {
            self.send(connection, Message::Delete(delete), &mut report)?;
        }
        self.send(connection, Message::Set(snapshot.bulk_scene()), &mut report)?;
        for scene in snapshot.geometry_scenes() {
            self.send(connection, Message::Set(scene), &mut report)?;
        }
        self.send(connection, Message::Fence(FenceKind::SceneEnd), &mut report)?;

        connection.flush()?;
        Ok(report)
    }
}
