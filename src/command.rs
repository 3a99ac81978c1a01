use std::fmt;
use std::str::FromStr;

use crate::mapping::{AirQualityMode, EcoAdapt, HvacMode, SleepTimer, Stage};
use crate::types::{Command, Zone};
use crate::{Error, Result};

/// Writable zone channels and the hvac field each one sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneChannel {
    On,
    Setpoint,
    CoolSetpoint,
    HeatSetpoint,
    Name,
    Mode,
    Speed,
    ColdStage,
    HeatStage,
    Sleep,
    AirQualityMode,
    AirQualityLowThreshold,
    AirQualityHighThreshold,
    SlatsVerticalSwing,
    SlatsHorizontalSwing,
    SlatsVerticalPosition,
    SlatsHorizontalPosition,
    EcoAdapt,
    AntiFreeze,
}

impl ZoneChannel {
    pub const ALL: [ZoneChannel; 19] = [
        ZoneChannel::On,
        ZoneChannel::Setpoint,
        ZoneChannel::CoolSetpoint,
        ZoneChannel::HeatSetpoint,
        ZoneChannel::Name,
        ZoneChannel::Mode,
        ZoneChannel::Speed,
        ZoneChannel::ColdStage,
        ZoneChannel::HeatStage,
        ZoneChannel::Sleep,
        ZoneChannel::AirQualityMode,
        ZoneChannel::AirQualityLowThreshold,
        ZoneChannel::AirQualityHighThreshold,
        ZoneChannel::SlatsVerticalSwing,
        ZoneChannel::SlatsHorizontalSwing,
        ZoneChannel::SlatsVerticalPosition,
        ZoneChannel::SlatsHorizontalPosition,
        ZoneChannel::EcoAdapt,
        ZoneChannel::AntiFreeze,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ZoneChannel::On => "on",
            ZoneChannel::Setpoint => "setpoint",
            ZoneChannel::CoolSetpoint => "coolsetpoint",
            ZoneChannel::HeatSetpoint => "heatsetpoint",
            ZoneChannel::Name => "name",
            ZoneChannel::Mode => "mode",
            ZoneChannel::Speed => "speed",
            ZoneChannel::ColdStage => "coldstage",
            ZoneChannel::HeatStage => "heatstage",
            ZoneChannel::Sleep => "sleep",
            ZoneChannel::AirQualityMode => "aq_mode",
            ZoneChannel::AirQualityLowThreshold => "aq_thrlow",
            ZoneChannel::AirQualityHighThreshold => "aq_thrhigh",
            ZoneChannel::SlatsVerticalSwing => "slats_vswing",
            ZoneChannel::SlatsHorizontalSwing => "slats_hswing",
            ZoneChannel::SlatsVerticalPosition => "slats_vertical",
            ZoneChannel::SlatsHorizontalPosition => "slats_horizontal",
            ZoneChannel::EcoAdapt => "eco_adapt",
            ZoneChannel::AntiFreeze => "antifreeze",
        }
    }

    /// Field name in the PUT body. Matches the channel id except for the
    /// stages: zone data reports them as `coldStage`/`heatStage`, and writes
    /// use the same keys rather than the lowercase `coldstage`/`heatstage`
    /// channel ids.
    pub fn field(&self) -> &'static str {
        match self {
            ZoneChannel::ColdStage => "coldStage",
            ZoneChannel::HeatStage => "heatStage",
            other => other.id(),
        }
    }
}

impl fmt::Display for ZoneChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ZoneChannel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| Error::UnknownValue {
                kind: "channel",
                value: s.to_string(),
            })
    }
}

/// Checks `command` against what `zone` advertises and converts it to the
/// value sent on the wire.
pub fn translate(channel: ZoneChannel, command: &Command, zone: &Zone) -> Result<Command> {
    let unsupported = || Error::UnsupportedCommand {
        channel: channel.id(),
    };

    // NaN would truncate to speed 0 and encode as JSON null
    if let Command::Decimal(v) = command
        && !v.is_finite()
    {
        return Err(Error::UnknownValue {
            kind: "number",
            value: v.to_string(),
        });
    }

    match channel {
        ZoneChannel::On
        | ZoneChannel::SlatsVerticalSwing
        | ZoneChannel::SlatsHorizontalSwing
        | ZoneChannel::AntiFreeze => match command {
            Command::OnOff(_) | Command::Decimal(_) => Ok(command.clone()),
            Command::Text(_) => Err(unsupported()),
        },
        ZoneChannel::Setpoint
        | ZoneChannel::CoolSetpoint
        | ZoneChannel::HeatSetpoint
        | ZoneChannel::AirQualityLowThreshold
        | ZoneChannel::AirQualityHighThreshold
        | ZoneChannel::SlatsVerticalPosition
        | ZoneChannel::SlatsHorizontalPosition => match command {
            Command::Decimal(_) => Ok(command.clone()),
            _ => Err(unsupported()),
        },
        ZoneChannel::Name => match command {
            Command::Text(_) => Ok(command.clone()),
            _ => Err(unsupported()),
        },
        ZoneChannel::Mode => {
            let mode = enumerant(channel, command, "mode", HvacMode::from_name)?;
            if !zone.allows_mode(mode.code()) {
                let mut allowed = zone.modes.clone();
                allowed.sort_unstable();
                return Err(Error::NotAllowed {
                    field: "mode",
                    value: mode.code(),
                    allowed,
                });
            }
            Ok(Command::Decimal(mode.code() as f64))
        }
        ZoneChannel::Speed => {
            let Command::Decimal(v) = command else {
                return Err(unsupported());
            };
            let speed = v.trunc() as i64;
            if !zone.allowed_speeds().contains(&speed) {
                return Err(Error::NotAllowed {
                    field: "speed",
                    value: speed,
                    allowed: zone.allowed_speeds().collect(),
                });
            }
            Ok(Command::Decimal(speed as f64))
        }
        ZoneChannel::ColdStage | ZoneChannel::HeatStage => {
            let (field, allowed) = if channel == ZoneChannel::ColdStage {
                ("cold stage", zone.cold_stages)
            } else {
                ("heat stage", zone.heat_stages)
            };
            let stage = enumerant(channel, command, "stage", Stage::from_name)?;
            // the bridge accepts only the single stage configured on the zone
            if stage.code() != allowed {
                return Err(Error::NotAllowed {
                    field,
                    value: stage.code(),
                    allowed: vec![allowed],
                });
            }
            Ok(Command::Decimal(stage.code() as f64))
        }
        ZoneChannel::Sleep => {
            let sleep = enumerant(channel, command, "sleep", SleepTimer::from_name)?;
            Ok(Command::Decimal(sleep.minutes() as f64))
        }
        ZoneChannel::AirQualityMode => {
            let mode = enumerant(channel, command, "air quality mode", AirQualityMode::from_name)?;
            Ok(Command::Decimal(mode.code() as f64))
        }
        ZoneChannel::EcoAdapt => {
            let eco = enumerant(channel, command, "eco adapt", EcoAdapt::from_name)?;
            Ok(Command::text(eco.as_wire()))
        }
    }
}

/// Enumerated channels take the display name as a text command.
fn enumerant<T>(
    channel: ZoneChannel,
    command: &Command,
    kind: &'static str,
    from_name: impl Fn(&str) -> Option<T>,
) -> Result<T> {
    match command {
        Command::Text(name) => from_name(name).ok_or_else(|| Error::UnknownValue {
            kind,
            value: name.clone(),
        }),
        _ => Err(Error::UnsupportedCommand {
            channel: channel.id(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zone() -> Zone {
        serde_json::from_value(json!({
            "systemID": 1, "zoneID": 1, "modes": [7, 1], "speeds": 3,
            "coldStages": 1, "heatStages": 3
        }))
        .unwrap()
    }

    #[test]
    fn channel_ids_round_trip() {
        for channel in ZoneChannel::ALL {
            assert_eq!(channel.id().parse::<ZoneChannel>().unwrap(), channel);
        }
        assert!("fan".parse::<ZoneChannel>().is_err());
    }

    #[test]
    fn mode_must_be_allowed() {
        let z = zone();
        assert_eq!(
            translate(ZoneChannel::Mode, &Command::text("AUTO"), &z).unwrap(),
            Command::Decimal(7.0)
        );
        match translate(ZoneChannel::Mode, &Command::text("HEATING"), &z) {
            Err(Error::NotAllowed { value, allowed, .. }) => {
                assert_eq!(value, 3);
                assert_eq!(allowed, vec![1, 7]);
            }
            other => panic!("expected NotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn unknown_names_are_dropped() {
        let z = zone();
        assert!(matches!(
            translate(ZoneChannel::Mode, &Command::text("TURBO"), &z),
            Err(Error::UnknownValue { kind: "mode", .. })
        ));
        assert!(matches!(
            translate(ZoneChannel::Sleep, &Command::text("FORTY_FIVE"), &z),
            Err(Error::UnknownValue { .. })
        ));
    }

    #[test]
    fn speed_range_is_inclusive() {
        let z = zone();
        assert_eq!(
            translate(ZoneChannel::Speed, &Command::Decimal(3.0), &z).unwrap(),
            Command::Decimal(3.0)
        );
        assert_eq!(
            translate(ZoneChannel::Speed, &Command::Decimal(0.0), &z).unwrap(),
            Command::Decimal(0.0)
        );
        assert!(translate(ZoneChannel::Speed, &Command::Decimal(4.0), &z).is_err());
        assert!(translate(ZoneChannel::Speed, &Command::Decimal(-1.0), &z).is_err());
    }

    #[test]
    fn stage_must_match_configured_stage() {
        let z = zone();
        assert_eq!(
            translate(ZoneChannel::ColdStage, &Command::text("AIR"), &z).unwrap(),
            Command::Decimal(1.0)
        );
        assert!(translate(ZoneChannel::ColdStage, &Command::text("RADIANT"), &z).is_err());
        assert_eq!(
            translate(ZoneChannel::HeatStage, &Command::text("COMBINED"), &z).unwrap(),
            Command::Decimal(3.0)
        );
        assert!(translate(ZoneChannel::HeatStage, &Command::text("AIR"), &z).is_err());
    }

    #[test]
    fn enumerants_map_to_wire_codes() {
        let z = zone();
        assert_eq!(
            translate(ZoneChannel::Sleep, &Command::text("NINETY"), &z).unwrap(),
            Command::Decimal(90.0)
        );
        assert_eq!(
            translate(ZoneChannel::AirQualityMode, &Command::text("AUTO"), &z).unwrap(),
            Command::Decimal(2.0)
        );
        assert_eq!(
            translate(ZoneChannel::EcoAdapt, &Command::text("A_PLUS"), &z).unwrap(),
            Command::text("a_p")
        );
    }

    #[test]
    fn command_kind_is_checked() {
        let z = zone();
        assert!(matches!(
            translate(ZoneChannel::Mode, &Command::Decimal(3.0), &z),
            Err(Error::UnsupportedCommand { channel: "mode" })
        ));
        assert!(translate(ZoneChannel::Setpoint, &Command::text("warm"), &z).is_err());
        assert!(translate(ZoneChannel::On, &Command::OnOff(true), &z).is_ok());
        assert!(translate(ZoneChannel::Name, &Command::text("Salon"), &z).is_ok());
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let z = zone();
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            for channel in [
                ZoneChannel::Speed,
                ZoneChannel::Setpoint,
                ZoneChannel::AirQualityHighThreshold,
                ZoneChannel::On,
            ] {
                assert!(
                    matches!(
                        translate(channel, &Command::Decimal(v), &z),
                        Err(Error::UnknownValue { kind: "number", .. })
                    ),
                    "{channel} accepted {v}"
                );
            }
        }
    }

    #[test]
    fn stage_fields_are_camel_case() {
        assert_eq!(ZoneChannel::ColdStage.field(), "coldStage");
        assert_eq!(ZoneChannel::AirQualityLowThreshold.field(), "aq_thrlow");
    }
}
