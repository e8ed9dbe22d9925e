/// Background receive loop: socket bytes -> decoded messages -> averages
use std::sync::Arc;

use log::{debug, error, info, warn};
use time::OffsetDateTime;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Duration};

use crate::models::{SensorKind, TelemetryMessage};
use crate::protocol;
use crate::session::SessionState;
use crate::stats::{self, SensorHistory};
use crate::utils::{format_datetime, ticks_to_duration};

const READ_BUFFER_SIZE: usize = 1024;
const IDLE_RETRY: Duration = Duration::from_secs(2);

/// Run one telemetry session against the emitter at `(host, port)`.
///
/// Connects, then reads until a stop or exit request is observed. Each read
/// is bounded by the idle-retry interval so the request flags are polled at
/// least that often even when the emitter goes quiet. A zero-byte read means
/// no data: wait out the idle-retry delay and try again. A malformed message
/// is discarded with a warning; only a read fault or a request flag ends the
/// session. Teardown zeroes the shared state so the controller can start a
/// fresh session.
pub(crate) async fn run(state: Arc<SessionState>, host: String, port: u16) {
    let mut stream = match TcpStream::connect((host.as_str(), port)).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to connect to {}:{}: {}", host, port, e);
            return;
        }
    };

    state.set_connected(true);
    info!(
        "Connected to {}:{} at {}",
        host,
        port,
        format_datetime(&OffsetDateTime::now_utc())
    );
    info!("Reading messages");

    let mut history = SensorHistory::new();
    let mut skip = 0usize;
    let mut buf = [0u8; READ_BUFFER_SIZE];

    while !state.stop_requested() && !state.exit_requested() {
        let received = match timeout(IDLE_RETRY, stream.read(&mut buf)).await {
            // No data within the poll interval; re-check the request flags
            Err(_) => continue,
            Ok(Err(e)) => {
                error!("Read failed, ending session: {}", e);
                break;
            }
            Ok(Ok(received)) => received,
        };

        if received == 0 {
            debug!("Empty read, retrying in {:?}", IDLE_RETRY);
            sleep(IDLE_RETRY).await;
            continue;
        }

        let message = match protocol::decode(&buf, received) {
            Ok(message) => message,
            Err(e) => {
                warn!("Discarding malformed message: {}", e);
                continue;
            }
        };

        for sample in &message.samples {
            stats::record(&mut history, sample.kind, sample.value);
        }

        let message_count = state.increment_message_count();
        skip = stats::advance_skip(message_count, skip);
        for kind in SensorKind::ALL {
            state.set_average(kind, stats::average(&history, kind, skip));
        }

        report_message(&message, &history);
    }

    info!("Closing session with {}:{}", host, port);
    if let Err(e) = stream.shutdown().await {
        debug!("Socket shutdown failed: {}", e);
    }
    drop(stream);

    state.reset();
    info!("Session closed");
}

/// Print the per-message report: header fields plus the latest observed
/// value of every sensor kind seen so far this session.
fn report_message(message: &TelemetryMessage, history: &SensorHistory) {
    let mut latest = Vec::new();
    for kind in SensorKind::ALL {
        if let Some(value) = history.get(&kind).and_then(|values| values.last()) {
            latest.push(format!("{} => value = {:.2};", kind.display_name(), value));
        }
    }

    println!(
        "\nNew message:\nSize = {} bytes;\nEmitter id = {};\nSensor time = {};\n{}",
        message.declared_len,
        message.emitter_id,
        ticks_to_duration(message.timestamp_ticks),
        latest.join("\n")
    );
}
