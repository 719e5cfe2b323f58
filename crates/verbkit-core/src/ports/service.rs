//! Remote service connection port.
//!
//! The framework only needs to open a connection, issue calls, and close it.
//! The wire protocol belongs to the adapter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConnectionError;

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// Attach credentials; empty strings count as absent.
    #[must_use]
    pub fn with_credentials(mut self, username: Option<&str>, password: Option<&str>) -> Self {
        self.username = username.filter(|u| !u.is_empty()).map(str::to_string);
        self.password = password.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    /// `host:port` form used in messages and socket resolution.
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Result of a remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
    /// Service status code; [`CallResponse::SUCCESS`] means the call succeeded.
    pub status: i32,
    /// Human-readable status, if the service supplied one.
    #[serde(default)]
    pub status_string: Option<String>,
    /// Result payloads in service order.
    #[serde(default)]
    pub results: Vec<Value>,
}

impl CallResponse {
    pub const SUCCESS: i32 = 1;

    pub const fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }

    /// A successful response carrying `results`.
    pub const fn success(results: Vec<Value>) -> Self {
        Self {
            status: Self::SUCCESS,
            status_string: None,
            results,
        }
    }
}

/// Opens connections to the remote service.
#[cfg_attr(test, mockall::automock)]
pub trait ServiceConnector {
    /// Connect, retrying up to `retries` additional times before giving up.
    fn connect(
        &self,
        target: &ConnectTarget,
        retries: u32,
    ) -> Result<Box<dyn ServiceClient>, ConnectionError>;
}

/// An open connection.
pub trait ServiceClient {
    /// Invoke a named procedure with positional parameters.
    fn call(&mut self, procedure: &str, params: &[Value]) -> Result<CallResponse, ConnectionError>;

    /// Close the connection. Closing twice is not an error.
    fn close(&mut self) -> Result<(), ConnectionError>;
}
