/// Session lifecycle control and shared session state
mod receiver;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::error;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::models::SensorKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session is already running")]
    AlreadyRunning,
}

/// Shared state of the single telemetry session.
///
/// Written by the receive loop, read by the command surface. Each field is
/// individually atomic; fields are deliberately not updated as a group, so a
/// concurrent reader may observe an old message count next to newer averages.
/// That weak per-field consistency is the intended model.
#[derive(Debug, Default)]
pub struct SessionState {
    connected: AtomicBool,
    stop_requested: AtomicBool,
    exit_requested: AtomicBool,
    message_count: AtomicU64,
    // Last computed averages, stored as f64 bit patterns
    avg_temperature: AtomicU64,
    avg_humidity: AtomicU64,
    avg_pressure: AtomicU64,
}

impl SessionState {
    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Increment the received-message counter, returning the new count.
    pub(crate) fn increment_message_count(&self) -> u64 {
        self.message_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn average(&self, kind: SensorKind) -> f64 {
        f64::from_bits(self.average_cell(kind).load(Ordering::SeqCst))
    }

    pub(crate) fn set_average(&self, kind: SensorKind, value: f64) {
        self.average_cell(kind).store(value.to_bits(), Ordering::SeqCst);
    }

    fn average_cell(&self, kind: SensorKind) -> &AtomicU64 {
        match kind {
            SensorKind::Temperature => &self.avg_temperature,
            SensorKind::Humidity => &self.avg_humidity,
            SensorKind::Pressure => &self.avg_pressure,
        }
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::SeqCst)
    }

    fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    fn clear_stop(&self) {
        self.stop_requested.store(false, Ordering::SeqCst);
    }

    fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::SeqCst);
    }

    /// Zero the connection flag, message counter, and averages so a new
    /// session starts from a clean slate. The request flags are managed by
    /// the controller, not here.
    pub(crate) fn reset(&self) {
        self.set_connected(false);
        self.message_count.store(0, Ordering::SeqCst);
        for kind in SensorKind::ALL {
            self.set_average(kind, 0.0);
        }
    }
}

/// Owns the background receive task and mediates all lifecycle transitions.
///
/// At most one receive task exists at a time. The controller is passed
/// explicitly to the command loop; there is no global instance.
pub struct SessionController {
    host: String,
    port: u16,
    state: Arc<SessionState>,
    task: Option<JoinHandle<()>>,
}

impl SessionController {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            state: Arc::new(SessionState::default()),
            task: None,
        }
    }

    /// Spawn the receive loop. Fails with `AlreadyRunning` while a live task
    /// exists; a task that already finished on its own (connect failure, read
    /// fault) counts as idle, so a later `start` works again.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if let Some(task) = &self.task {
            if !task.is_finished() {
                return Err(SessionError::AlreadyRunning);
            }
            self.task = None;
        }

        let state = Arc::clone(&self.state);
        let host = self.host.clone();
        let port = self.port;
        self.task = Some(tokio::spawn(async move {
            receiver::run(state, host, port).await;
        }));
        Ok(())
    }

    /// Request an orderly stop and wait for the receive loop to finish.
    /// Safe no-op when no session is active. The stop flag is cleared after
    /// the join so the controller is ready for another `start`.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        self.state.request_stop();
        if let Err(e) = task.await {
            error!("Receive task failed during stop: {}", e);
        }
        self.state.clear_stop();
    }

    /// Terminal shutdown: request exit and wait for any active receive loop.
    /// The exit flag stays set; the controller does not return to idle.
    pub async fn exit(&mut self) {
        self.state.request_exit();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Receive task failed during exit: {}", e);
            }
        }
    }

    /// Last computed average per tracked sensor kind. Never blocks.
    pub fn info(&self) -> [(SensorKind, f64); 3] {
        SensorKind::ALL.map(|kind| (kind, self.state.average(kind)))
    }

    /// Connection flag and received-message count. Never blocks.
    pub fn statistics(&self) -> (bool, u64) {
        (self.state.connected(), self.state.message_count())
    }
}
