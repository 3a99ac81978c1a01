use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::cache::{Snapshot, zone_key};
use crate::types::Event;

pub(crate) fn diff_json(
    previous: &Value,
    current: &Value,
    path_prefix: &str,
    changes: &mut Vec<(String, Value, Value)>,
) {
    match (previous, current) {
        (Value::Object(prev_map), Value::Object(curr_map)) => {
            for (key, curr_val) in curr_map {
                let path = if path_prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{path_prefix}.{key}")
                };
                match prev_map.get(key) {
                    Some(prev_val) => diff_json(prev_val, curr_val, &path, changes),
                    None => {
                        if curr_val.is_object() {
                            diff_json(&Value::Object(Map::new()), curr_val, &path, changes);
                        } else {
                            changes.push((path, Value::Null, curr_val.clone()));
                        }
                    }
                }
            }
        }
        (prev, curr) if prev != curr => {
            changes.push((path_prefix.to_string(), prev.clone(), curr.clone()));
        }
        _ => {}
    }
}

fn changed_fields(previous: Option<&Value>, current: &Value) -> Vec<(String, Value)> {
    let empty = Value::Object(Map::new());
    let mut changes = Vec::new();
    diff_json(previous.unwrap_or(&empty), current, "", &mut changes);
    changes
        .into_iter()
        .map(|(path, _old, new)| (path, new))
        .collect()
}

/// Events describing how `next` differs from `previous`. Without a previous
/// snapshot every field of every zone and system is reported.
pub(crate) fn snapshot_events(previous: Option<&Snapshot>, next: &Snapshot) -> Vec<Event> {
    let empty = BTreeMap::new();
    let prev_zones = previous.map(|p| &p.zone_json).unwrap_or(&empty);
    let prev_systems = previous.map(|p| &p.system_json).unwrap_or(&empty);
    let mut events = Vec::new();

    for (key, zone) in &next.zones {
        let Some(json) = next.zone_json.get(key) else {
            continue;
        };
        for (field, value) in changed_fields(prev_zones.get(key), json) {
            events.push(Event::ZoneChanged {
                system_id: zone.system_id,
                zone_id: zone.zone_id,
                field,
                value,
            });
        }
    }
    if let Some(prev) = previous {
        for zone in prev.zones.values() {
            if !next.zones.contains_key(&zone_key(zone.system_id, zone.zone_id)) {
                events.push(Event::ZoneRemoved {
                    system_id: zone.system_id,
                    zone_id: zone.zone_id,
                });
            }
        }
    }

    for (system_id, json) in &next.system_json {
        for (field, value) in changed_fields(prev_systems.get(system_id), json) {
            events.push(Event::SystemChanged {
                system_id: *system_id,
                field,
                value,
            });
        }
    }
    if let Some(prev) = previous {
        for system_id in prev.systems.keys() {
            if !next.systems.contains_key(system_id) {
                events.push(Event::SystemRemoved {
                    system_id: *system_id,
                });
            }
        }
    }

    events
}
