//! Connectivity precheck against the vendor download host.
//!
//! A TCP connect to the HTTPS port stands in for ICMP ping, which needs
//! raw-socket privilege on most systems.

use crate::config::SupportConfig;
use crate::error::SupportError;
use std::time::Duration;
use tokio::net::TcpStream;

/// A reachability check run once before any page is loaded.
pub trait ConnectivityProbe: Send + Sync {
    /// Succeeds when the vendor host answers within the probe timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unreachable`] otherwise.
    fn check(&self) -> impl std::future::Future<Output = Result<(), SupportError>> + Send;
}

/// Probe that opens (and immediately drops) a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    /// Create a probe for `host:port`.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Create a probe from the support configuration.
    pub fn from_config(config: &SupportConfig) -> Self {
        Self::new(
            config.probe_host.clone(),
            config.probe_port,
            config.probe_timeout(),
        )
    }
}

impl ConnectivityProbe for TcpProbe {
    async fn check(&self) -> Result<(), SupportError> {
        let target = format!("{}:{}", self.host, self.port);
        tracing::debug!(%target, "probing connectivity");

        match tokio::time::timeout(self.timeout, TcpStream::connect(target.as_str())).await {
            Ok(Ok(_stream)) => {
                tracing::info!("Internet Check passed");
                Ok(())
            }
            Ok(Err(e)) => Err(SupportError::Unreachable(format!("{target}: {e}"))),
            Err(_) => Err(SupportError::Unreachable(format!(
                "{target}: no answer within {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
