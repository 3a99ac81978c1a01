use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::cache::{Snapshot, SnapshotCache};
use crate::command::{ZoneChannel, translate};
use crate::config::BridgeConfig;
use crate::diff::snapshot_events;
use crate::logger::{MessageLogMode, MessageLogger};
use crate::mapping::{AirQualityMode, EcoAdapt, HvacMode, SleepTimer, Stage};
use crate::protocol::{
    HVAC_RESOURCE, VERSION_RESOURCE, WEBSERVER_RESOURCE, decode_api_version,
    decode_server_properties, decode_system_values, decode_zone_values, put_payload,
    systems_query, zones_query,
};
use crate::transport::Transport;
use crate::types::*;
use crate::{Error, Result};

type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;
type SnapshotCallback = Box<dyn Fn(&Snapshot) + Send + Sync>;

pub struct AirZoneClientBuilder {
    config: BridgeConfig,
    event_callbacks: Vec<EventCallback>,
    snapshot_callbacks: Vec<SnapshotCallback>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl AirZoneClientBuilder {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            config: BridgeConfig {
                ip_address: ip.into(),
                ..BridgeConfig::default()
            },
            event_callbacks: Vec::new(),
            snapshot_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    /// Replaces every connection setting, including the address.
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.tcp_port = port;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn request_spacing(mut self, spacing: Duration) -> Self {
        self.config.request_spacing = spacing;
        self
    }

    pub fn on_event(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_callbacks.push(Box::new(f));
        self
    }

    pub fn on_snapshot(mut self, f: impl Fn(&Snapshot) + Send + Sync + 'static) -> Self {
        self.snapshot_callbacks.push(Box::new(f));
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<AirZoneClient> {
        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(MessageLogger::new(mode, &path)?),
            _ => None,
        };

        let transport = Transport::new(
            self.config.base_url(),
            self.config.timeout,
            self.config.request_spacing,
            logger,
        )?;

        Ok(AirZoneClient {
            config: self.config,
            transport,
            cache: SnapshotCache::default(),
            refresh: Mutex::new(()),
            event_callbacks: self.event_callbacks,
            snapshot_callbacks: self.snapshot_callbacks,
        })
    }
}

/// Talks to one AirZone bridge: polls zones and systems, serves reads from the
/// latest poll and validates commands before sending them.
///
/// All methods take `&self`; share the client behind an `Arc` between tasks.
/// Every request waits its turn at the bridge, so a call may take up to the
/// request spacing plus the timeout per request it makes.
pub struct AirZoneClient {
    config: BridgeConfig,
    transport: Transport,
    cache: SnapshotCache,
    refresh: Mutex<()>,
    event_callbacks: Vec<EventCallback>,
    snapshot_callbacks: Vec<SnapshotCallback>,
}

impl AirZoneClient {
    pub fn builder(ip: impl Into<String>) -> AirZoneClientBuilder {
        AirZoneClientBuilder::new(ip)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Polls every zone and every system and swaps them into the cache. On
    /// failure the previous snapshot stays in place.
    pub async fn fetch_status(&self) -> Result<()> {
        let _guard = self.refresh.lock().await;
        self.fetch_locked().await
    }

    async fn fetch_locked(&self) -> Result<()> {
        let next = match self.poll_snapshot().await {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "fetch status failed, keeping previous snapshot");
                return Err(e);
            }
        };

        let previous = self.cache.get();
        let events = snapshot_events(previous.as_deref(), &next);
        debug!(
            zones = next.zones.len(),
            systems = next.systems.len(),
            changes = events.len(),
            "snapshot refreshed"
        );
        self.cache.replace(next);

        for event in &events {
            for cb in &self.event_callbacks {
                cb(event);
            }
        }
        if let Some(current) = self.cache.get() {
            for cb in &self.snapshot_callbacks {
                cb(&current);
            }
        }
        Ok(())
    }

    async fn poll_snapshot(&self) -> Result<Snapshot> {
        let body = self
            .transport
            .post(HVAC_RESOURCE, &zones_query().to_string())
            .await?;
        let zones = decode_zone_values(&body)?;

        let body = self
            .transport
            .post(HVAC_RESOURCE, &systems_query().to_string())
            .await?;
        let systems = decode_system_values(&body)?;

        Snapshot::from_json(zones, systems)
    }

    /// Latest snapshot, polling once first if nothing was ever fetched.
    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        if let Some(current) = self.cache.get() {
            return Some(current);
        }
        let _guard = self.refresh.lock().await;
        // another caller may have populated the cache while we waited
        if !self.cache.is_populated() {
            trace!("cache empty, fetching status");
            let _ = self.fetch_locked().await;
        }
        self.cache.get()
    }

    pub async fn zone(&self, system_id: u32, zone_id: u32) -> Option<Zone> {
        self.snapshot().await?.zone(system_id, zone_id).cloned()
    }

    pub async fn system(&self, system_id: u32) -> Option<SystemInfo> {
        self.snapshot().await?.system(system_id).cloned()
    }

    pub async fn master_zone(&self, system_id: u32) -> Option<Zone> {
        self.snapshot().await?.master_zone(system_id).cloned()
    }

    /// Zone whose state a command for `target` is checked against. The
    /// all-zones target is checked against the system's master zone.
    pub async fn resolve_zone(&self, target: ZoneTarget) -> Option<Zone> {
        if target.is_all_zones() {
            self.master_zone(target.system_id).await
        } else {
            self.zone(target.system_id, target.zone_id).await
        }
    }

    pub async fn server_properties(&self) -> Option<ServerProperties> {
        let result = async {
            let body = self.transport.post(WEBSERVER_RESOURCE, "").await?;
            decode_server_properties(&body)
        }
        .await;
        result
            .inspect_err(|e| warn!(error = %e, "failed to read server properties"))
            .ok()
    }

    pub async fn api_version(&self) -> Option<String> {
        let result = async {
            let body = self.transport.post(VERSION_RESOURCE, "").await?;
            decode_api_version(&body)
        }
        .await;
        result
            .inspect_err(|e| warn!(error = %e, "failed to read API version"))
            .ok()
    }

    // -- Command methods --

    /// Validates `command` against the cached zone, sends it, then refreshes
    /// the cache. Rejected commands are logged and never reach the bridge.
    ///
    /// The refresh only shows what the bridge reports right after the write;
    /// it may not have applied the change yet.
    pub async fn handle_command(
        &self,
        target: ZoneTarget,
        channel: ZoneChannel,
        command: Command,
    ) -> Result<()> {
        let Some(zone) = self.resolve_zone(target).await else {
            warn!(%target, %channel, "no zone values, dropping command");
            return Err(Error::ZoneUnavailable {
                system_id: target.system_id,
                zone_id: target.zone_id,
            });
        };

        let value = translate(channel, &command, &zone)
            .inspect_err(|e| warn!(%target, %channel, %command, error = %e, "rejected zone command"))?;

        let body = put_payload(target, channel.field(), &value);
        debug!(%target, field = channel.field(), value = %value, "setting zone field");
        if let Err(e) = self.transport.put(HVAC_RESOURCE, &body.to_string()).await {
            warn!(%target, %channel, error = %e, "failed to set zone field");
            return Err(e);
        }

        let _ = self.fetch_status().await;
        Ok(())
    }

    pub async fn set_on(&self, target: ZoneTarget, on: bool) -> Result<()> {
        self.handle_command(target, ZoneChannel::On, Command::OnOff(on)).await
    }

    pub async fn set_setpoint(&self, target: ZoneTarget, setpoint: f64) -> Result<()> {
        self.handle_command(target, ZoneChannel::Setpoint, Command::Decimal(setpoint))
            .await
    }

    pub async fn set_cool_setpoint(&self, target: ZoneTarget, setpoint: f64) -> Result<()> {
        self.handle_command(target, ZoneChannel::CoolSetpoint, Command::Decimal(setpoint))
            .await
    }

    pub async fn set_heat_setpoint(&self, target: ZoneTarget, setpoint: f64) -> Result<()> {
        self.handle_command(target, ZoneChannel::HeatSetpoint, Command::Decimal(setpoint))
            .await
    }

    pub async fn set_name(&self, target: ZoneTarget, name: &str) -> Result<()> {
        self.handle_command(target, ZoneChannel::Name, Command::text(name))
            .await
    }

    /// Only modes listed by the zone (the master zone for all-zones targets) are sent.
    pub async fn set_mode(&self, target: ZoneTarget, mode: HvacMode) -> Result<()> {
        self.handle_command(target, ZoneChannel::Mode, Command::text(mode.as_str()))
            .await
    }

    pub async fn set_speed(&self, target: ZoneTarget, speed: i64) -> Result<()> {
        self.handle_command(target, ZoneChannel::Speed, Command::Decimal(speed as f64))
            .await
    }

    pub async fn set_cold_stage(&self, target: ZoneTarget, stage: Stage) -> Result<()> {
        self.handle_command(target, ZoneChannel::ColdStage, Command::text(stage.as_str()))
            .await
    }

    pub async fn set_heat_stage(&self, target: ZoneTarget, stage: Stage) -> Result<()> {
        self.handle_command(target, ZoneChannel::HeatStage, Command::text(stage.as_str()))
            .await
    }

    pub async fn set_sleep(&self, target: ZoneTarget, sleep: SleepTimer) -> Result<()> {
        self.handle_command(target, ZoneChannel::Sleep, Command::text(sleep.as_str()))
            .await
    }

    pub async fn set_air_quality_mode(&self, target: ZoneTarget, mode: AirQualityMode) -> Result<()> {
        self.handle_command(target, ZoneChannel::AirQualityMode, Command::text(mode.as_str()))
            .await
    }

    pub async fn set_air_quality_low_threshold(&self, target: ZoneTarget, value: f64) -> Result<()> {
        self.handle_command(
            target,
            ZoneChannel::AirQualityLowThreshold,
            Command::Decimal(value),
        )
        .await
    }

    pub async fn set_air_quality_high_threshold(&self, target: ZoneTarget, value: f64) -> Result<()> {
        self.handle_command(
            target,
            ZoneChannel::AirQualityHighThreshold,
            Command::Decimal(value),
        )
        .await
    }

    pub async fn set_slats_vertical_swing(&self, target: ZoneTarget, swing: bool) -> Result<()> {
        self.handle_command(target, ZoneChannel::SlatsVerticalSwing, Command::OnOff(swing))
            .await
    }

    pub async fn set_slats_horizontal_swing(&self, target: ZoneTarget, swing: bool) -> Result<()> {
        self.handle_command(target, ZoneChannel::SlatsHorizontalSwing, Command::OnOff(swing))
            .await
    }

    pub async fn set_slats_vertical_position(&self, target: ZoneTarget, position: i64) -> Result<()> {
        self.handle_command(
            target,
            ZoneChannel::SlatsVerticalPosition,
            Command::Decimal(position as f64),
        )
        .await
    }

    pub async fn set_slats_horizontal_position(&self, target: ZoneTarget, position: i64) -> Result<()> {
        self.handle_command(
            target,
            ZoneChannel::SlatsHorizontalPosition,
            Command::Decimal(position as f64),
        )
        .await
    }

    pub async fn set_eco_adapt(&self, target: ZoneTarget, eco: EcoAdapt) -> Result<()> {
        self.handle_command(target, ZoneChannel::EcoAdapt, Command::text(eco.as_str()))
            .await
    }

    pub async fn set_anti_freeze(&self, target: ZoneTarget, on: bool) -> Result<()> {
        self.handle_command(target, ZoneChannel::AntiFreeze, Command::OnOff(on))
            .await
    }
}
