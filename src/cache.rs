use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::types::{SystemInfo, Zone};
use crate::Result;

/// Map key for a zone. Both ids range 1..=32 on the bridge, so the key stays
/// unique and reads back as `SSSZZZ`.
pub fn zone_key(system_id: u32, zone_id: u32) -> u32 {
    1000 * system_id + zone_id
}

/// Everything one successful poll returned. Never mutated once built.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub zones: BTreeMap<u32, Zone>,
    pub systems: BTreeMap<u32, SystemInfo>,
    pub(crate) zone_json: BTreeMap<u32, Value>,
    pub(crate) system_json: BTreeMap<u32, Value>,
}

impl Snapshot {
    /// Builds a snapshot from decoded zone and system objects. A later entry
    /// for the same id replaces an earlier one.
    pub(crate) fn from_json(zones: Vec<Value>, systems: Vec<Value>) -> Result<Self> {
        let mut snapshot = Snapshot::default();
        for json in zones {
            let zone: Zone = serde_json::from_value(json.clone())?;
            let key = zone_key(zone.system_id, zone.zone_id);
            snapshot.zones.insert(key, zone);
            snapshot.zone_json.insert(key, json);
        }
        for json in systems {
            let system: SystemInfo = serde_json::from_value(json.clone())?;
            snapshot.system_json.insert(system.system_id, json);
            snapshot.systems.insert(system.system_id, system);
        }
        Ok(snapshot)
    }

    pub fn zone(&self, system_id: u32, zone_id: u32) -> Option<&Zone> {
        self.zones.get(&zone_key(system_id, zone_id))
    }

    pub fn system(&self, system_id: u32) -> Option<&SystemInfo> {
        self.systems.get(&system_id)
    }

    pub fn zones_of(&self, system_id: u32) -> impl Iterator<Item = &Zone> {
        self.zones.values().filter(move |z| z.system_id == system_id)
    }

    /// The zone that governs the system's mode.
    ///
    /// A zone naming itself in `master_zoneID` wins. Failing that, the lowest
    /// numbered zone that advertises modes is picked, since older firmware
    /// does not report the field and may list modes on several zones.
    pub fn master_zone(&self, system_id: u32) -> Option<&Zone> {
        self.zones_of(system_id)
            .find(|z| z.master_zone_id == Some(z.zone_id))
            .or_else(|| {
                self.zones_of(system_id)
                    .find(|z| z.master_zone_id.is_none() && !z.modes.is_empty())
            })
    }
}

/// Latest snapshot, swapped wholesale so readers never see a partial update.
#[derive(Default)]
pub(crate) struct SnapshotCache {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotCache {
    pub fn get(&self) -> Option<Arc<Snapshot>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Installs `next` and hands back the snapshot it replaced.
    pub fn replace(&self, next: Snapshot) -> Option<Arc<Snapshot>> {
        let next = Some(Arc::new(next));
        match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
    }

    pub fn is_populated(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_encoding() {
        assert_eq!(zone_key(1, 3), 1003);
        assert_eq!(zone_key(32, 32), 32032);
        assert_ne!(zone_key(1, 32), zone_key(2, 0));
    }

    #[test]
    fn lookup_by_system_and_zone() {
        let snap = Snapshot::from_json(
            vec![
                json!({"systemID": 1, "zoneID": 1, "name": "a"}),
                json!({"systemID": 2, "zoneID": 1, "name": "b"}),
            ],
            vec![json!({"systemID": 2, "manufacturer": "Fujitsu"})],
        )
        .unwrap();
        assert_eq!(snap.zone(2, 1).unwrap().name, "b");
        assert!(snap.zone(3, 1).is_none());
        assert_eq!(snap.system(2).unwrap().manufacturer, "Fujitsu");
        assert!(snap.system(1).is_none());
    }

    #[test]
    fn explicit_master_beats_legacy_candidates() {
        let snap = Snapshot::from_json(
            vec![
                json!({"systemID": 1, "zoneID": 1, "master_zoneID": 3, "modes": [1, 2]}),
                json!({"systemID": 1, "zoneID": 3, "master_zoneID": 3}),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(snap.master_zone(1).unwrap().zone_id, 3);
    }

    #[test]
    fn legacy_master_picks_lowest_zone() {
        let snap = Snapshot::from_json(
            vec![
                json!({"systemID": 1, "zoneID": 4, "modes": [1, 7]}),
                json!({"systemID": 1, "zoneID": 2, "modes": [1, 3]}),
                json!({"systemID": 1, "zoneID": 1}),
                json!({"systemID": 2, "zoneID": 1, "modes": [1]}),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(snap.master_zone(1).unwrap().zone_id, 2);
        assert_eq!(snap.master_zone(2).unwrap().zone_id, 1);
        assert!(snap.master_zone(3).is_none());
    }

    #[test]
    fn no_master_when_nothing_qualifies() {
        let snap = Snapshot::from_json(
            vec![json!({"systemID": 1, "zoneID": 1, "master_zoneID": 2})],
            vec![],
        )
        .unwrap();
        assert!(snap.master_zone(1).is_none());
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let cache = SnapshotCache::default();
        assert!(!cache.is_populated());
        let first = Snapshot::from_json(vec![json!({"systemID": 1, "zoneID": 1})], vec![]).unwrap();
        assert!(cache.replace(first).is_none());

        let held = cache.get().unwrap();
        let second = Snapshot::from_json(vec![json!({"systemID": 1, "zoneID": 2})], vec![]).unwrap();
        let old = cache.replace(second).unwrap();
        assert!(Arc::ptr_eq(&held, &old));
        assert!(held.zone(1, 1).is_some());
        assert!(cache.get().unwrap().zone(1, 1).is_none());
    }
}
