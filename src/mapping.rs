use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    Stop,
    Cooling,
    Heating,
    Fan,
    Dry,
    Auto,
}

impl HvacMode {
    pub const ALL: [HvacMode; 6] = [
        HvacMode::Stop,
        HvacMode::Cooling,
        HvacMode::Heating,
        HvacMode::Fan,
        HvacMode::Dry,
        HvacMode::Auto,
    ];

    /// Code 6 is reserved by the bridge and never mapped.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(HvacMode::Stop),
            2 => Some(HvacMode::Cooling),
            3 => Some(HvacMode::Heating),
            4 => Some(HvacMode::Fan),
            5 => Some(HvacMode::Dry),
            7 => Some(HvacMode::Auto),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            HvacMode::Stop => 1,
            HvacMode::Cooling => 2,
            HvacMode::Heating => 3,
            HvacMode::Fan => 4,
            HvacMode::Dry => 5,
            HvacMode::Auto => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Stop => "STOP",
            HvacMode::Cooling => "COOLING",
            HvacMode::Heating => "HEATING",
            HvacMode::Fan => "FAN",
            HvacMode::Dry => "DRY",
            HvacMode::Auto => "AUTO",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Air,
    Radiant,
    Combined,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Air, Stage::Radiant, Stage::Combined];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Stage::Air),
            2 => Some(Stage::Radiant),
            3 => Some(Stage::Combined),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Stage::Air => 1,
            Stage::Radiant => 2,
            Stage::Combined => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Air => "AIR",
            Stage::Radiant => "RADIANT",
            Stage::Combined => "COMBINED",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }
}

/// Sleep timer, in minutes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SleepTimer {
    Off,
    Thirty,
    Sixty,
    Ninety,
}

impl SleepTimer {
    pub const ALL: [SleepTimer; 4] = [
        SleepTimer::Off,
        SleepTimer::Thirty,
        SleepTimer::Sixty,
        SleepTimer::Ninety,
    ];

    pub fn from_minutes(minutes: i64) -> Option<Self> {
        match minutes {
            0 => Some(SleepTimer::Off),
            30 => Some(SleepTimer::Thirty),
            60 => Some(SleepTimer::Sixty),
            90 => Some(SleepTimer::Ninety),
            _ => None,
        }
    }

    pub fn minutes(&self) -> i64 {
        match self {
            SleepTimer::Off => 0,
            SleepTimer::Thirty => 30,
            SleepTimer::Sixty => 60,
            SleepTimer::Ninety => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepTimer::Off => "OFF",
            SleepTimer::Thirty => "THIRTY",
            SleepTimer::Sixty => "SIXTY",
            SleepTimer::Ninety => "NINETY",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirQualityMode {
    Off,
    On,
    Auto,
}

impl AirQualityMode {
    pub const ALL: [AirQualityMode; 3] =
        [AirQualityMode::Off, AirQualityMode::On, AirQualityMode::Auto];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(AirQualityMode::Off),
            1 => Some(AirQualityMode::On),
            2 => Some(AirQualityMode::Auto),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            AirQualityMode::Off => 0,
            AirQualityMode::On => 1,
            AirQualityMode::Auto => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AirQualityMode::Off => "OFF",
            AirQualityMode::On => "ON",
            AirQualityMode::Auto => "AUTO",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Air quality level reported by the zone. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirQuality {
    Off,
    Good,
    Medium,
    Low,
}

impl AirQuality {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(AirQuality::Off),
            1 => Some(AirQuality::Good),
            2 => Some(AirQuality::Medium),
            3 => Some(AirQuality::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AirQuality::Off => "OFF",
            AirQuality::Good => "GOOD",
            AirQuality::Medium => "MEDIUM",
            AirQuality::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcoAdapt {
    Off,
    Manual,
    A,
    APlus,
    APlusPlus,
}

impl EcoAdapt {
    pub const ALL: [EcoAdapt; 5] = [
        EcoAdapt::Off,
        EcoAdapt::Manual,
        EcoAdapt::A,
        EcoAdapt::APlus,
        EcoAdapt::APlusPlus,
    ];

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_wire() == s)
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            EcoAdapt::Off => "off",
            EcoAdapt::Manual => "manual",
            EcoAdapt::A => "a",
            EcoAdapt::APlus => "a_p",
            EcoAdapt::APlusPlus => "a_pp",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EcoAdapt::Off => "OFF",
            EcoAdapt::Manual => "MANUAL",
            EcoAdapt::A => "A",
            EcoAdapt::APlus => "A_PLUS",
            EcoAdapt::APlusPlus => "A_PLUS_PLUS",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermostatType {
    Blueface,
    BluefaceZero,
    Lite,
    Think,
}

impl ThermostatType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ThermostatType::Blueface),
            2 => Some(ThermostatType::BluefaceZero),
            3 => Some(ThermostatType::Lite),
            4 => Some(ThermostatType::Think),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThermostatType::Blueface => "Blueface",
            ThermostatType::BluefaceZero => "Blueface Zero",
            ThermostatType::Lite => "Lite",
            ThermostatType::Think => "Think",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermostatRadio {
    Cable,
    Radio,
}

impl ThermostatRadio {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ThermostatRadio::Cable),
            1 => Some(ThermostatRadio::Radio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThermostatRadio::Cable => "Cable",
            ThermostatRadio::Radio => "Radio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemType {
    C6,
    Aquaglass,
    Dzk,
    Radiant,
    C3,
    Zbs,
    Zs6,
}

impl SystemType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SystemType::C6),
            2 => Some(SystemType::Aquaglass),
            3 => Some(SystemType::Dzk),
            4 => Some(SystemType::Radiant),
            5 => Some(SystemType::C3),
            6 => Some(SystemType::Zbs),
            7 => Some(SystemType::Zs6),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemType::C6 => "C6",
            SystemType::Aquaglass => "AQUAGLASS",
            SystemType::Dzk => "DZK",
            SystemType::Radiant => "Radiant",
            SystemType::C3 => "C3",
            SystemType::Zbs => "ZBS",
            SystemType::Zs6 => "ZS6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TemperatureUnit::Celsius),
            1 => Some(TemperatureUnit::Fahrenheit),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "\u{00b0}C",
            TemperatureUnit::Fahrenheit => "\u{00b0}F",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(
    HvacMode,
    Stage,
    SleepTimer,
    AirQualityMode,
    AirQuality,
    EcoAdapt,
    ThermostatType,
    ThermostatRadio,
    SystemType
);
