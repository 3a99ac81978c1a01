use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::types::{ServerProperties, SystemInfo, Zone, ZoneTarget};
use crate::{Command, Result};

pub const HVAC_RESOURCE: &str = "hvac";
pub const WEBSERVER_RESOURCE: &str = "webserver";
pub const VERSION_RESOURCE: &str = "version";

/// System id the bridge interprets as "every system" on the hvac resource.
pub const ALL_SYSTEMS_ID: u32 = 127;

pub fn zones_query() -> Value {
    json!({ "systemID": 0, "zoneID": 0 })
}

pub fn systems_query() -> Value {
    json!({ "systemID": ALL_SYSTEMS_ID })
}

#[derive(Debug, Deserialize)]
struct ZonesResponse {
    #[serde(default)]
    systems: Vec<ZonesOfSystem>,
}

#[derive(Debug, Deserialize)]
struct ZonesOfSystem {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SystemsResponse {
    #[serde(default)]
    systems: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}

/// Some firmware emits a non-JSON first line ending in `,` ahead of the body.
/// Only that first line is dropped; a line holding nothing but the comma stays.
pub fn strip_prefix_noise(body: &str) -> &str {
    match body.split_once('\n') {
        Some((first, rest)) if first.len() > 1 && first.ends_with(',') && !first.contains('\r') => {
            rest
        }
        _ => body,
    }
}

/// Zone objects of every system in an "all zones" response, still as JSON.
pub(crate) fn decode_zone_values(body: &str) -> Result<Vec<Value>> {
    let parsed: ZonesResponse = serde_json::from_str(strip_prefix_noise(body))?;
    Ok(parsed.systems.into_iter().flat_map(|s| s.data).collect())
}

pub(crate) fn decode_system_values(body: &str) -> Result<Vec<Value>> {
    let parsed: SystemsResponse = serde_json::from_str(strip_prefix_noise(body))?;
    Ok(parsed.systems.unwrap_or_default())
}

pub fn decode_zones_response(body: &str) -> Result<Vec<Zone>> {
    decode_zone_values(body)?
        .into_iter()
        .map(|v| Ok(serde_json::from_value(v)?))
        .collect()
}

pub fn decode_systems_response(body: &str) -> Result<Vec<SystemInfo>> {
    decode_system_values(body)?
        .into_iter()
        .map(|v| Ok(serde_json::from_value(v)?))
        .collect()
}

pub fn decode_server_properties(body: &str) -> Result<ServerProperties> {
    Ok(serde_json::from_str(strip_prefix_noise(body))?)
}

pub fn decode_api_version(body: &str) -> Result<String> {
    let parsed: VersionResponse = serde_json::from_str(body)?;
    Ok(parsed.version)
}

/// Wire representation of a command value: flags as `0`/`1`, numbers as
/// doubles, anything else as its string form.
pub fn command_value(command: &Command) -> Value {
    match command {
        Command::OnOff(on) => json!(if *on { 1 } else { 0 }),
        Command::Decimal(v) => json!(*v),
        Command::Text(s) => json!(s),
    }
}

pub fn put_payload(target: ZoneTarget, field: &str, command: &Command) -> Value {
    let mut body = Map::new();
    body.insert("systemID".to_string(), json!(target.system_id));
    body.insert("zoneID".to_string(), json!(target.zone_id));
    body.insert(field.to_string(), command_value(command));
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONES_BODY: &str = r#"{"systems":[{"data":[
        {"systemID":1,"zoneID":1,"name":"Salon","on":1,"modes":[1,2,3,7],"mode":3,"setpoint":21.5,"roomTemp":20.1},
        {"systemID":1,"zoneID":2,"name":"Chambre","on":0,"setpoint":19.0}
    ]}]}"#;

    #[test]
    fn queries_match_bridge_contract() {
        assert_eq!(zones_query().to_string(), r#"{"systemID":0,"zoneID":0}"#);
        assert_eq!(systems_query().to_string(), r#"{"systemID":127}"#);
    }

    #[test]
    fn strips_leading_noise_line() {
        let noisy = format!("garbage line,\n{ZONES_BODY}");
        assert_eq!(strip_prefix_noise(&noisy), ZONES_BODY);
        let clean = decode_zones_response(ZONES_BODY).unwrap();
        let stripped = decode_zones_response(&noisy).unwrap();
        assert_eq!(clean, stripped);
    }

    #[test]
    fn leaves_clean_bodies_alone() {
        assert_eq!(strip_prefix_noise(ZONES_BODY), ZONES_BODY);
        assert_eq!(strip_prefix_noise(",\n{}"), ",\n{}");
        assert_eq!(strip_prefix_noise("{\n\"a\": 1}"), "{\n\"a\": 1}");
    }

    #[test]
    fn decodes_zones_across_systems() {
        let body = r#"{"systems":[{"data":[{"systemID":1,"zoneID":1}]},{"data":[{"systemID":2,"zoneID":5}]}]}"#;
        let zones = decode_zones_response(body).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!((zones[1].system_id, zones[1].zone_id), (2, 5));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_zones_response("not json").is_err());
        assert!(decode_systems_response("{\"systems\": 3}").is_err());
    }

    #[test]
    fn decodes_systems() {
        let body = r#"{"systems":[{"systemID":1,"mc_connected":1,"power":1200.5,"system_firmware":"3.31",
            "system_type":1,"manufacturer":"Daikin","errors":[{"system":"Error C09"}]}]}"#;
        let systems = decode_systems_response(body).unwrap();
        assert_eq!(systems.len(), 1);
        let s = &systems[0];
        assert!(s.meter_connected);
        assert_eq!(s.power, Some(1200.5));
        assert_eq!(s.errors[0].system.as_deref(), Some("Error C09"));
        assert!(decode_systems_response("{}").unwrap().is_empty());
    }

    #[test]
    fn decodes_version_and_webserver() {
        assert_eq!(decode_api_version(r#"{"version":"1.62"}"#).unwrap(), "1.62");
        let props = decode_server_properties(
            r#"{"mac":"AA:BB","wifi_channel":6,"wifi_quality":4,"wifi_rssi":-52,
                "interface":"wifi","ws_firmware":"3.44","ws_type":"ws_az"}"#,
        )
        .unwrap();
        assert_eq!(props.interface, "wifi");
        assert_eq!(props.wifi_rssi, -52);
        assert_eq!(props.hardware_type, "ws_az");
    }

    #[test]
    fn put_payload_carries_target_and_one_field() {
        let body = put_payload(ZoneTarget::all_zones(2), "mode", &Command::Decimal(3.0));
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(body["systemID"], 2);
        assert_eq!(body["zoneID"], 0);
        assert_eq!(body["mode"].as_f64(), Some(3.0));
    }

    #[test]
    fn command_values_are_coerced() {
        assert_eq!(command_value(&Command::OnOff(true)), json!(1));
        assert_eq!(command_value(&Command::OnOff(false)), json!(0));
        assert!(command_value(&Command::Decimal(21.5)).is_f64());
        assert_eq!(command_value(&Command::text("a_p")), json!("a_p"));
    }
}
