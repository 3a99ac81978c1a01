use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::mapping::*;

/// Addressing pair a command is aimed at. Zone id 0 targets every zone of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneTarget {
    pub system_id: u32,
    pub zone_id: u32,
}

impl ZoneTarget {
    pub const ALL_ZONES: u32 = 0;

    pub fn zone(system_id: u32, zone_id: u32) -> Self {
        Self { system_id, zone_id }
    }

    pub fn all_zones(system_id: u32) -> Self {
        Self {
            system_id,
            zone_id: Self::ALL_ZONES,
        }
    }

    pub fn is_all_zones(&self) -> bool {
        self.zone_id == Self::ALL_ZONES
    }
}

impl fmt::Display for ZoneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all_zones() {
            write!(f, "system {} (all zones)", self.system_id)
        } else {
            write!(f, "system {} zone {}", self.system_id, self.zone_id)
        }
    }
}

/// A channel command as handed over by the framework layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    OnOff(bool),
    Decimal(f64),
    Text(String),
}

impl Command {
    pub fn text(s: impl Into<String>) -> Self {
        Command::Text(s.into())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::OnOff(true) => f.write_str("ON"),
            Command::OnOff(false) => f.write_str("OFF"),
            Command::Decimal(v) => write!(f, "{v}"),
            Command::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Command {
    fn from(v: bool) -> Self {
        Command::OnOff(v)
    }
}

impl From<f64> for Command {
    fn from(v: f64) -> Self {
        Command::Decimal(v)
    }
}

impl From<&str> for Command {
    fn from(v: &str) -> Self {
        Command::Text(v.to_string())
    }
}

/// One entry of a zone or system error list. The bridge fills exactly one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
}

/// Last-known state of one zone, as returned by the bridge.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Zone {
    #[serde(rename = "systemID")]
    pub system_id: u32,
    #[serde(rename = "zoneID")]
    pub zone_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "thermos_type", default)]
    pub thermostat_type: i64,
    #[serde(rename = "thermos_firmware", default)]
    pub thermostat_firmware: String,
    #[serde(rename = "thermos_radio", default)]
    pub thermostat_radio: i64,
    #[serde(default, deserialize_with = "int_bool")]
    pub on: bool,
    #[serde(rename = "double_sp", default, deserialize_with = "int_bool")]
    pub double_setpoint: bool,
    #[serde(rename = "coolsetpoint", default)]
    pub cool_setpoint: f64,
    #[serde(rename = "coolmaxtemp", default)]
    pub cool_max_temp: Option<f64>,
    #[serde(rename = "coolmintemp", default)]
    pub cool_min_temp: Option<f64>,
    #[serde(rename = "heatsetpoint", default)]
    pub heat_setpoint: f64,
    #[serde(rename = "heatmaxtemp", default)]
    pub heat_max_temp: Option<f64>,
    #[serde(rename = "heatmintemp", default)]
    pub heat_min_temp: Option<f64>,
    #[serde(rename = "maxTemp", default)]
    pub max_temp: Option<f64>,
    #[serde(rename = "minTemp", default)]
    pub min_temp: Option<f64>,
    #[serde(default)]
    pub setpoint: f64,
    #[serde(rename = "roomTemp", default)]
    pub room_temp: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(rename = "sleep", default)]
    pub sleep_minutes: i64,
    #[serde(rename = "temp_step", default)]
    pub temp_step: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub modes: Vec<i64>,
    #[serde(default)]
    pub mode: i64,
    /// Highest allowed fan speed; every speed in `0..=speeds` is accepted.
    #[serde(default, deserialize_with = "speeds_max")]
    pub speeds: i64,
    #[serde(default)]
    pub speed: i64,
    #[serde(rename = "coldStage", default)]
    pub cold_stage: i64,
    #[serde(rename = "heatStage", default)]
    pub heat_stage: i64,
    #[serde(rename = "coldStages", default)]
    pub cold_stages: i64,
    #[serde(rename = "heatStages", default)]
    pub heat_stages: i64,
    #[serde(default)]
    pub units: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<ErrorEntry>,
    #[serde(default, deserialize_with = "opt_int_bool")]
    pub air_demand: Option<bool>,
    #[serde(default, deserialize_with = "opt_int_bool")]
    pub floor_demand: Option<bool>,
    #[serde(default, deserialize_with = "opt_int_bool")]
    pub cold_demand: Option<bool>,
    #[serde(default, deserialize_with = "opt_int_bool")]
    pub heat_demand: Option<bool>,
    #[serde(rename = "aq_mode", default)]
    pub air_quality_mode: Option<i64>,
    #[serde(rename = "aq_quality", default)]
    pub air_quality: Option<i64>,
    #[serde(rename = "aq_thrlow", default)]
    pub air_quality_threshold_low: Option<f64>,
    #[serde(rename = "aq_thrhigh", default)]
    pub air_quality_threshold_high: Option<f64>,
    #[serde(rename = "master_zoneID", default)]
    pub master_zone_id: Option<u32>,
    #[serde(rename = "slats_vswing", default, deserialize_with = "opt_int_bool")]
    pub slats_vertical_swing: Option<bool>,
    #[serde(rename = "slats_hswing", default, deserialize_with = "opt_int_bool")]
    pub slats_horizontal_swing: Option<bool>,
    #[serde(rename = "slats_vertical", default)]
    pub slats_vertical_position: Option<i64>,
    #[serde(rename = "slats_horizontal", default)]
    pub slats_horizontal_position: Option<i64>,
    #[serde(default)]
    pub eco_adapt: Option<String>,
    #[serde(rename = "antifreeze", default, deserialize_with = "opt_int_bool")]
    pub anti_freeze: Option<bool>,
}

impl Zone {
    pub fn target(&self) -> ZoneTarget {
        ZoneTarget::zone(self.system_id, self.zone_id)
    }

    /// Whether this zone governs the system-wide mode.
    ///
    /// Firmware without `master_zoneID` is handled by treating any zone that
    /// advertises modes as the master.
    pub fn is_master(&self) -> bool {
        match self.master_zone_id {
            Some(master) => master == self.zone_id,
            None => !self.modes.is_empty(),
        }
    }

    pub fn mode(&self) -> Option<HvacMode> {
        HvacMode::from_code(self.mode)
    }

    /// Allowed modes that map to a known name. Reserved codes are skipped.
    pub fn allowed_modes(&self) -> Vec<HvacMode> {
        self.modes.iter().filter_map(|c| HvacMode::from_code(*c)).collect()
    }

    pub fn allows_mode(&self, code: i64) -> bool {
        let mut allowed = self.modes.clone();
        allowed.sort_unstable();
        allowed.binary_search(&code).is_ok()
    }

    pub fn allowed_speeds(&self) -> std::ops::RangeInclusive<i64> {
        0..=self.speeds
    }

    pub fn sleep(&self) -> Option<SleepTimer> {
        SleepTimer::from_minutes(self.sleep_minutes)
    }

    pub fn cold_stage(&self) -> Option<Stage> {
        Stage::from_code(self.cold_stage)
    }

    pub fn heat_stage(&self) -> Option<Stage> {
        Stage::from_code(self.heat_stage)
    }

    pub fn units(&self) -> Option<TemperatureUnit> {
        TemperatureUnit::from_code(self.units)
    }

    pub fn thermostat_type(&self) -> Option<ThermostatType> {
        ThermostatType::from_code(self.thermostat_type)
    }

    pub fn thermostat_radio(&self) -> Option<ThermostatRadio> {
        ThermostatRadio::from_code(self.thermostat_radio)
    }

    pub fn air_quality_mode(&self) -> Option<AirQualityMode> {
        self.air_quality_mode.and_then(AirQualityMode::from_code)
    }

    pub fn air_quality(&self) -> Option<AirQuality> {
        self.air_quality.and_then(AirQuality::from_code)
    }

    pub fn eco_adapt(&self) -> Option<EcoAdapt> {
        self.eco_adapt.as_deref().and_then(EcoAdapt::from_wire)
    }
}

/// Metadata of one HVAC system.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SystemInfo {
    #[serde(rename = "systemID")]
    pub system_id: u32,
    #[serde(rename = "mc_connected", default, deserialize_with = "int_bool")]
    pub meter_connected: bool,
    #[serde(default)]
    pub power: Option<f64>,
    #[serde(rename = "system_firmware", default)]
    pub firmware: String,
    #[serde(rename = "system_type", default)]
    pub system_type: i64,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<ErrorEntry>,
}

impl SystemInfo {
    pub fn system_type(&self) -> Option<SystemType> {
        SystemType::from_code(self.system_type)
    }
}

/// Network and firmware details of the bridge itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerProperties {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub wifi_channel: i64,
    #[serde(default)]
    pub wifi_quality: i64,
    #[serde(default)]
    pub wifi_rssi: i64,
    #[serde(rename = "interface", default)]
    pub interface: String,
    #[serde(rename = "ws_firmware", default)]
    pub firmware: String,
    #[serde(rename = "ws_type", default)]
    pub hardware_type: String,
}

/// Change notifications produced by comparing consecutive polls.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ZoneChanged {
        system_id: u32,
        zone_id: u32,
        field: String,
        value: Value,
    },
    ZoneRemoved {
        system_id: u32,
        zone_id: u32,
    },
    SystemChanged {
        system_id: u32,
        field: String,
        value: Value,
    },
    SystemRemoved {
        system_id: u32,
    },
}

fn value_as_bool<E: serde::de::Error>(value: Value) -> Result<Option<bool>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b)),
        Value::Number(n) => match n.as_f64() {
            Some(f) => Ok(Some(f != 0.0)),
            None => Err(E::custom(format!("invalid flag: {n}"))),
        },
        other => Err(E::custom(format!("expected 0/1 flag, got {other}"))),
    }
}

fn int_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    value_as_bool(Value::deserialize(deserializer)?).map(|b| b.unwrap_or(false))
}

fn opt_int_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    value_as_bool(Value::deserialize(deserializer)?)
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Newer firmware reports the highest speed, older firmware the list of speeds.
fn speeds_max<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("invalid speed count: {n}"))),
        Value::Array(items) => Ok(items.iter().filter_map(Value::as_i64).max().unwrap_or(0)),
        other => Err(D::Error::custom(format!("expected speed count, got {other}"))),
    }
}
