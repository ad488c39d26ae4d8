use std::{
    collections::VecDeque,
    marker::PhantomData,
    thread::{self, JoinHandle},
    time::Duration,
};

use flume::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{info, warn};

use super::snapshot::SceneSnapshot;
use crate::error::SyncError;

/// Destination of an export, run on the exporter's worker thread
pub trait ExportSink: Send + 'static {
    /// Short name used for the worker thread and in logs
    fn name(&self) -> &'static str;

    fn export(&mut self, snapshot: SceneSnapshot) -> Result<ExportReport, SyncError>;

    /// Called once when the exporter shuts down
    fn finish(&mut self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub messages_sent: usize,
    pub bytes_sent: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportOutcome {
    pub export_id: u64,
    pub result: Result<ExportReport, SyncError>,
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportState {
    Idle,
    /// The snapshot is being taken on the calling thread
    Preparing,
    /// The worker owns the snapshot
    Sending,
    /// Finished, outcome not taken yet
    Succeeded,
    Failed,
}

enum Job {
    Export {
        export_id: u64,
        snapshot: SceneSnapshot,
    },
    Shutdown,
}

/// Runs exports on a dedicated worker thread, at most one at a time
pub struct AsyncExporter<S: ExportSink> {
    jobs: Sender<Job>,
    outcomes: Receiver<ExportOutcome>,
    worker: Option<JoinHandle<Result<(), SyncError>>>,
    state: ExportState,
    next_export_id: u64,
    in_flight: Option<u64>,
    finished: VecDeque<ExportOutcome>,
    last_error: Option<SyncError>,
    phantom_sink: PhantomData<S>,
}

impl<S: ExportSink> AsyncExporter<S> {
    pub fn new(sink: S) -> Result<Self, SyncError> {
        let (job_sender, job_receiver) = flume::bounded(1);
        let (outcome_sender, outcome_receiver) = flume::unbounded();

        let worker = thread::Builder::new()
            .name(format!("scenesync-{}", sink.name()))
            .spawn(move || run_worker(sink, job_receiver, outcome_sender))
            .map_err(|_| SyncError::WorkerUnavailable)?;

        Ok(Self {
            jobs: job_sender,
            outcomes: outcome_receiver,
            worker: Some(worker),
            state: ExportState::Idle,
            next_export_id: 0,
            in_flight: None,
            finished: VecDeque::new(),
            last_error: None,
            phantom_sink: PhantomData,
        })
    }

    /// Starts exporting `snapshot`. Returns false without doing anything if
    /// an export is still in flight.
    pub fn kick(&mut self, snapshot: SceneSnapshot) -> bool {
        self.kick_with(move || snapshot)
    }

    /// Like `kick`, but `on_prepare` only runs when the export actually
    /// starts. It runs on the calling thread.
    pub fn kick_with<F: FnOnce() -> SceneSnapshot>(&mut self, on_prepare: F) -> bool {
        if self.is_exporting() {
            return false;
        }

        self.state = ExportState::Preparing;
        let snapshot = on_prepare();

        let export_id = self.next_export_id;
        self.next_export_id += 1;

        match self.jobs.send(Job::Export {
            export_id,
            snapshot,
        }) {
            Ok(()) => {
                self.in_flight = Some(export_id);
                self.state = ExportState::Sending;
                true
            }
            Err(_) => {
                self.complete(ExportOutcome {
                    export_id,
                    result: Err(SyncError::WorkerUnavailable),
                });
                false
            }
        }
    }

    pub fn is_exporting(&mut self) -> bool {
        self.refresh();
        self.in_flight.is_some()
    }

    pub fn state(&mut self) -> ExportState {
        self.refresh();
        self.state
    }

    /// Id of the export in flight
    pub fn current_export_id(&self) -> Option<u64> {
        self.in_flight
    }

    /// Blocks until no export is in flight. Returns false if `timeout`
    /// elapsed first.
    pub fn wait(&mut self, timeout: Option<Duration>) -> bool {
        self.refresh();
        while let Some(export_id) = self.in_flight {
            let lost = ExportOutcome {
                export_id,
                result: Err(SyncError::WorkerUnavailable),
            };
            let outcome = match timeout {
                Some(timeout) => match self.outcomes.recv_timeout(timeout) {
                    Ok(outcome) => outcome,
                    Err(RecvTimeoutError::Timeout) => return false,
                    Err(RecvTimeoutError::Disconnected) => lost,
                },
                None => self.outcomes.recv().unwrap_or(lost),
            };
            self.complete(outcome);
        }
        true
    }

    /// Takes the oldest finished outcome. Once every outcome is taken the
    /// exporter is Idle again.
    pub fn take_outcome(&mut self) -> Option<ExportOutcome> {
        self.refresh();
        let outcome = self.finished.pop_front();
        if self.finished.is_empty() && self.in_flight.is_none() {
            self.state = ExportState::Idle;
        }
        outcome
    }

    pub fn last_error(&self) -> Option<&SyncError> {
        self.last_error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(|err| err.to_string())
    }

    /// Lets the export in flight finish, then stops the worker and finishes
    /// the sink. Later kicks fail.
    pub fn close(&mut self) -> Result<(), SyncError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        // the worker may already be gone; join reports how it ended
        let _ = self.jobs.send(Job::Shutdown);
        let result = worker.join().map_err(|_| SyncError::WorkerUnavailable)?;
        self.refresh();
        result
    }

    fn refresh(&mut self) {
        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) => self.complete(outcome),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    if let Some(export_id) = self.in_flight {
                        self.complete(ExportOutcome {
                            export_id,
                            result: Err(SyncError::WorkerUnavailable),
                        });
                    }
                    return;
                }
            }
        }
    }

    fn complete(&mut self, outcome: ExportOutcome) {
        if self.in_flight == Some(outcome.export_id) {
            self.in_flight = None;
        }
        match &outcome.result {
            Ok(_) => self.state = ExportState::Succeeded,
            Err(err) => {
                self.last_error = Some(err.clone());
                self.state = ExportState::Failed;
            }
        }
        self.finished.push_back(outcome);
    }
}

impl<S: ExportSink> Drop for AsyncExporter<S> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("AsyncExporter: shutdown failed: {}", err);
        }
    }
}

fn run_worker<S: ExportSink>(
    mut sink: S,
    jobs: Receiver<Job>,
    outcomes: Sender<ExportOutcome>,
) -> Result<(), SyncError> {
    while let Ok(job) = jobs.recv() {
        let (export_id, snapshot) = match job {
            Job::Export {
                export_id,
                snapshot,
            } => (export_id, snapshot),
            Job::Shutdown => break,
        };

        let result = sink.export(snapshot);
        match &result {
            Ok(report) => info!(
                "{}: export {} done, {} messages, {} bytes",
                sink.name(),
                export_id,
                report.messages_sent,
                report.bytes_sent
            ),
            Err(err) => warn!("{}: export {} failed: {}", sink.name(), export_id, err),
        }

        if outcomes.send(ExportOutcome { export_id, result }).is_err() {
            break;
        }
    }
    sink.finish()
}
