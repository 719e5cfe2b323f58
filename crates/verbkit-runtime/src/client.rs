//! TCP service connector with bounded retries.
//!
//! Calls are exchanged as newline-delimited JSON: one request object per
//! line out, one [`CallResponse`] object per line back.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use verbkit_core::ports::{
    CallResponse, ConnectTarget, ConnectionError, ServiceClient, ServiceConnector,
};

/// Per-attempt connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between connection attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Procedure used to authenticate when credentials are supplied.
pub const LOGIN_PROCEDURE: &str = "@Login";

#[derive(Debug, Error)]
enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("connection closed by peer")]
    Closed,
}

impl From<FrameError> for ConnectionError {
    fn from(err: FrameError) -> Self {
        Self::Protocol(err.to_string())
    }
}

#[derive(Serialize)]
struct CallRequest<'a> {
    id: u64,
    procedure: &'a str,
    params: &'a [Value],
}

/// Opens [`TcpServiceClient`] connections.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    timeout: Duration,
    retry_delay: Duration,
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CONNECT_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn try_connect(&self, address: &str) -> std::io::Result<TcpStream> {
        let addrs: Vec<SocketAddr> = address.to_socket_addrs()?.collect();
        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved")
        }))
    }
}

impl ServiceConnector for TcpConnector {
    fn connect(
        &self,
        target: &ConnectTarget,
        retries: u32,
    ) -> Result<Box<dyn ServiceClient>, ConnectionError> {
        let address = target.address();
        let attempts = retries.saturating_add(1);
        let mut reason = String::new();
        for attempt in 1..=attempts {
            match self.try_connect(&address) {
                Ok(stream) => {
                    info!(%address, attempt, "Connected");
                    let mut client = TcpServiceClient::new(stream)?;
                    client.login(target)?;
                    return Ok(Box::new(client));
                }
                Err(e) => {
                    warn!(%address, attempt, attempts, "Connection attempt failed: {}", e);
                    reason = e.to_string();
                    if attempt < attempts {
                        thread::sleep(self.retry_delay);
                    }
                }
            }
        }
        Err(ConnectionError::Unreachable {
            target: address,
            attempts,
            reason,
        })
    }
}

/// An open newline-delimited JSON connection.
pub struct TcpServiceClient {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    next_id: u64,
    closed: bool,
}

impl TcpServiceClient {
    pub fn new(stream: TcpStream) -> Result<Self, ConnectionError> {
        let writer = stream
            .try_clone()
            .map_err(|e| ConnectionError::Protocol(e.to_string()))?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            next_id: 1,
            closed: false,
        })
    }

    fn login(&mut self, target: &ConnectTarget) -> Result<(), ConnectionError> {
        let Some(username) = &target.username else {
            return Ok(());
        };
        let params = [
            Value::String(username.clone()),
            Value::String(target.password.clone().unwrap_or_default()),
        ];
        let response = self.call(LOGIN_PROCEDURE, &params)?;
        if response.is_success() {
            Ok(())
        } else {
            Err(ConnectionError::Protocol(format!(
                "login rejected for \"{username}\": {}",
                response.status_string.unwrap_or_default()
            )))
        }
    }

    fn exchange(&mut self, request: &CallRequest<'_>) -> Result<CallResponse, FrameError> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;

        let mut reply = String::new();
        if self.reader.read_line(&mut reply)? == 0 {
            return Err(FrameError::Closed);
        }
        Ok(serde_json::from_str(reply.trim_end())?)
    }
}

impl ServiceClient for TcpServiceClient {
    fn call(&mut self, procedure: &str, params: &[Value]) -> Result<CallResponse, ConnectionError> {
        if self.closed {
            return Err(ConnectionError::NotConnected);
        }
        let id = self.next_id;
        self.next_id += 1;
        debug!(id, procedure, "Calling procedure");
        Ok(self.exchange(&CallRequest {
            id,
            procedure,
            params,
        })?)
    }

    fn close(&mut self) -> Result<(), ConnectionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.writer.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != std::io::ErrorKind::NotConnected => {
                Err(ConnectionError::Close(e.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl Drop for TcpServiceClient {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!("Failed to close connection on drop: {}", e);
        }
    }
}
