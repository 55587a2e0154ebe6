// src/bridge/worker.rs

//! Implements the resilient streaming client.
//!
//! The worker owns the entire TCP socket lifecycle: connect with a bounded
//! timeout, subscribe to every bound property, feed received bytes through
//! the line decoder into the dispatch pipeline, and reconnect with a fixed
//! delay whenever the peer goes away. Every phase stays responsive to the
//! shutdown signal and the control channel.

use crate::bridge::control::ControlCommand;
use crate::config::Config;
use crate::core::protocol::parse_line;
use crate::core::sensor::{SensorWriter, reset_sensors};
use crate::core::{BridgeError, LineFrameCodec, PropertyTable};
use bytes::BytesMut;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio_util::codec::Decoder;
use tracing::{debug, info, trace, warn};

/// Initial capacity of the receive buffer. One read rarely carries more
/// than a handful of property lines.
const READ_BUF_CAPACITY: usize = 4096;

/// Socket lifecycle state, owned exclusively by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    Disconnected,
    Connecting,
    Subscribed,
    Faulted,
}

/// Why the read loop handed control back to the outer session loop.
enum StreamEnd {
    /// Stop requested or shutdown signalled; leave the session loop.
    Terminate,
    /// The connection is gone; reconnect after the configured delay.
    Disconnected,
}

/// The session worker: connection manager and dispatch loop in one task.
pub struct SessionWorker {
    config: Arc<Config>,
    table: Arc<PropertyTable>,
    writer: SensorWriter,
    state: ConnectionState,
    parse_errors: u64,
    control_closed: bool,
}

impl SessionWorker {
    pub fn new(config: Arc<Config>, table: Arc<PropertyTable>) -> Self {
        Self {
            config,
            table,
            writer: SensorWriter::new(),
            state: ConnectionState::Disconnected,
            parse_errors: 0,
            control_closed: false,
        }
    }

    /// The main session loop. Runs until a stop command or shutdown signal
    /// arrives; connectivity failures never end it.
    pub async fn run(
        mut self,
        mut shutdown_rx: broadcast::Receiver<()>,
        mut control_rx: mpsc::Receiver<ControlCommand>,
    ) {
        info!("Session worker started.");
        loop {
            let control_open = !self.control_closed;
            let connected = tokio::select! {
                biased;

                _ = shutdown_rx.recv() => {
                    info!("Session worker shutting down.");
                    return;
                }
                cmd = control_rx.recv(), if control_open => {
                    if self.handle_control(cmd).await {
                        return;
                    }
                    continue;
                }
                connected = self.connect_and_subscribe() => connected,
            };

            let Some(stream) = connected else {
                if self.wait_reconnect(&mut shutdown_rx, &mut control_rx).await {
                    return;
                }
                continue;
            };

            match self
                .stream_updates(stream, &mut shutdown_rx, &mut control_rx)
                .await
            {
                StreamEnd::Terminate => return,
                StreamEnd::Disconnected => {
                    if self.wait_reconnect(&mut shutdown_rx, &mut control_rx).await {
                        return;
                    }
                }
            }
        }
    }

    /// Opens a connection to the property server within the configured
    /// timeout and sends one subscribe command per bound property. Any
    /// failure is logged and reported as `None`; it is never fatal.
    async fn connect_and_subscribe(&mut self) -> Option<TcpStream> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        self.set_state(ConnectionState::Connecting);

        let connect = TcpStream::connect(&addr);
        let mut stream = match tokio::time::timeout(self.config.connect_timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                warn!("Connection to {addr} failed: {e}");
                self.set_state(ConnectionState::Disconnected);
                return None;
            }
            Err(_) => {
                warn!(
                    "Connection attempt to {addr} timed out after {:?}.",
                    self.config.connect_timeout
                );
                self.set_state(ConnectionState::Disconnected);
                return None;
            }
        };
        info!("Connected to property server at {addr}.");

        let table = self.table.clone();
        for name in table.names() {
            let command = format!("subscribe {name}\n");
            if let Err(e) = stream.write_all(command.as_bytes()).await {
                warn!("Failed to subscribe to {name}: {e}");
                self.set_state(ConnectionState::Disconnected);
                return None;
            }
            info!("Subscribed to property: {name}");
        }

        self.set_state(ConnectionState::Subscribed);
        Some(stream)
    }

    /// The read/dispatch loop over one live connection. A read timeout is
    /// an expected no-data tick and neither reconnects nor resets; zero
    /// bytes means the peer closed; everything else is a socket fault.
    async fn stream_updates(
        &mut self,
        mut stream: TcpStream,
        shutdown_rx: &mut broadcast::Receiver<()>,
        control_rx: &mut mpsc::Receiver<ControlCommand>,
    ) -> StreamEnd {
        let mut codec = LineFrameCodec;
        let mut buf = BytesMut::with_capacity(READ_BUF_CAPACITY);

        loop {
            let control_open = !self.control_closed;
            tokio::select! {
                biased;

                _ = shutdown_rx.recv() => {
                    info!("Session worker shutting down.");
                    return StreamEnd::Terminate;
                }
                cmd = control_rx.recv(), if control_open => {
                    if self.handle_control(cmd).await {
                        return StreamEnd::Terminate;
                    }
                }
                read = tokio::time::timeout(self.config.read_timeout, stream.read_buf(&mut buf)) => {
                    match read {
                        // No data this tick. Deliberately not a reconnect:
                        // brief stream pauses must not cause value flicker.
                        Err(_elapsed) => continue,
                        Ok(Ok(0)) => {
                            info!("Connection closed by server. Retrying...");
                            self.set_state(ConnectionState::Disconnected);
                            return StreamEnd::Disconnected;
                        }
                        Ok(Ok(_)) => {
                            if let Err(e) = self.drain_lines(&mut codec, &mut buf).await {
                                warn!("Protocol error on property stream: {e}. Reconnecting...");
                                self.set_state(ConnectionState::Faulted);
                                return StreamEnd::Disconnected;
                            }
                        }
                        Ok(Err(e)) => {
                            warn!("Socket error on property stream: {e}. Reconnecting...");
                            self.set_state(ConnectionState::Faulted);
                            return StreamEnd::Disconnected;
                        }
                    }
                }
            }
        }
    }

    /// Extracts every complete line currently buffered and dispatches it.
    /// At most one partial line remains buffered afterwards.
    async fn drain_lines(
        &mut self,
        codec: &mut LineFrameCodec,
        buf: &mut BytesMut,
    ) -> Result<(), BridgeError> {
        while let Some(line) = codec.decode(buf)? {
            self.dispatch_line(&line).await;
        }
        Ok(())
    }

    /// Parses one line and writes the value to its bound sensor file.
    /// Unparseable lines, unknown properties, and null values produce no
    /// write; a bad numeric value is logged and counted but never fatal.
    async fn dispatch_line(&mut self, line: &str) {
        let Some(update) = parse_line(line) else {
            return;
        };
        let Some(path) = self.table.resolve(&update.name) else {
            return;
        };
        if update.is_null() {
            trace!("Property {} has no current value. Skipping.", update.name);
            return;
        }
        match update.numeric_value() {
            Ok(value) => {
                if let Err(e) = self.writer.write_value(path, value).await {
                    warn!("Failed to write sensor file {}: {e}", path.display());
                }
            }
            Err(e) => {
                self.parse_errors += 1;
                if self.config.log_parse_errors {
                    warn!("Dropping update for {}: {e} (total: {})", update.name, self.parse_errors);
                }
            }
        }
    }

    /// Waits the fixed reconnect delay, still honoring shutdown and control
    /// traffic. A reset command cuts the wait short, which only means the
    /// next connect attempt comes sooner. Returns true to leave the session
    /// loop.
    async fn wait_reconnect(
        &mut self,
        shutdown_rx: &mut broadcast::Receiver<()>,
        control_rx: &mut mpsc::Receiver<ControlCommand>,
    ) -> bool {
        let delay = self.config.reconnect_delay;
        debug!("Waiting {delay:?} before reconnecting.");
        let control_open = !self.control_closed;
        tokio::select! {
            biased;

            _ = shutdown_rx.recv() => {
                info!("Session worker shutting down during reconnect delay.");
                true
            }
            cmd = control_rx.recv(), if control_open => self.handle_control(cmd).await,
            _ = tokio::time::sleep(delay) => false,
        }
    }

    /// Applies one control command. Returns true when the session loop must
    /// terminate.
    async fn handle_control(&mut self, cmd: Option<ControlCommand>) -> bool {
        match cmd {
            Some(ControlCommand::Stop) => {
                info!("Stop requested.");
                true
            }
            Some(ControlCommand::Reset) => {
                info!("Reset requested.");
                if let Err(e) = reset_sensors(&self.config.sensor_dir, &self.table).await {
                    warn!("Sensor reset failed: {e}");
                }
                // The files now read the sentinel; the next update must not
                // be suppressed even if its value was seen before the reset.
                self.writer.invalidate();
                false
            }
            None => {
                debug!("Control channel closed.");
                self.control_closed = true;
                false
            }
        }
    }

    fn set_state(&mut self, next: ConnectionState) {
        if self.state != next {
            debug!("Connection state: {:?} -> {next:?}", self.state);
            self.state = next;
        }
    }
}
