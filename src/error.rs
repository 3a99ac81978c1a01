use std::fmt;

#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    Decode(serde_json::Error),
    UnknownValue { kind: &'static str, value: String },
    NotAllowed { field: &'static str, value: i64, allowed: Vec<i64> },
    ZoneUnavailable { system_id: u32, zone_id: u32 },
    UnsupportedCommand { channel: &'static str },
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::UnknownValue { kind, value } => write!(f, "unknown {kind}: {value}"),
            Error::NotAllowed { field, value, allowed } => {
                write!(f, "{field} {value} not allowed (allowed: {allowed:?})")
            }
            Error::ZoneUnavailable { system_id, zone_id } => {
                write!(f, "no zone values for system {system_id} zone {zone_id}")
            }
            Error::UnsupportedCommand { channel } => {
                write!(f, "unsupported command type for {channel}")
            }
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
