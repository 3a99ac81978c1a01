use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_IP_ADDRESS: &str = "192.168.1.1";
pub const DEFAULT_TCP_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);
pub const DEFAULT_RETRIES: u32 = 5;
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);
/// Minimum gap between the end of one request and the start of the next.
pub const DEFAULT_REQUEST_SPACING: Duration = Duration::from_secs(3);

/// Bridge connection settings, deserializable from the framework's
/// configuration keys (`ipAddress`, `tcpPort`, `timeoutMsecs`, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    #[serde(default = "default_ip_address")]
    pub ip_address: String,
    #[serde(default = "default_tcp_port")]
    pub tcp_port: u16,
    #[serde(
        rename = "timeoutMsecs",
        default = "default_timeout",
        deserialize_with = "millis"
    )]
    pub timeout: Duration,
    /// Consecutive failed polls a caller tolerates before reporting the bridge offline.
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(
        rename = "refreshMsecs",
        default = "default_refresh_interval",
        deserialize_with = "millis"
    )]
    pub refresh_interval: Duration,
    #[serde(
        rename = "spacingMsecs",
        default = "default_request_spacing",
        deserialize_with = "millis"
    )]
    pub request_spacing: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            ip_address: default_ip_address(),
            tcp_port: DEFAULT_TCP_PORT,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_spacing: DEFAULT_REQUEST_SPACING,
        }
    }
}

impl BridgeConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/api/v1", self.ip_address, self.tcp_port)
    }
}

fn default_ip_address() -> String {
    DEFAULT_IP_ADDRESS.to_string()
}

fn default_tcp_port() -> u16 {
    DEFAULT_TCP_PORT
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

fn default_request_spacing() -> Duration {
    DEFAULT_REQUEST_SPACING
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
