#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature = 1,
    Humidity = 2,
    Pressure = 3,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [Self::Temperature, Self::Humidity, Self::Pressure];

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Temperature),
            2 => Some(Self::Humidity),
            3 => Some(Self::Pressure),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature sensor",
            Self::Humidity => "humidity sensor",
            Self::Pressure => "pressure sensor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub kind: SensorKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryMessage {
    pub declared_len: u16,
    pub timestamp_ticks: i64,
    pub emitter_id: i32,
    pub samples: Vec<SensorSample>,
}
