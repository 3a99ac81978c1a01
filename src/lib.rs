mod cache;
mod client;
mod command;
mod config;
mod diff;
mod error;
pub mod errors;
mod logger;
pub mod mapping;
pub mod protocol;
mod transport;
mod types;

pub use cache::{Snapshot, zone_key};
pub use client::{AirZoneClient, AirZoneClientBuilder};
pub use command::{ZoneChannel, translate};
pub use config::*;
pub use error::{Error, Result};
pub use errors::{English, Localization, describe, format_errors, localization_key};
pub use logger::MessageLogMode;
pub use mapping::*;
pub use types::*;
