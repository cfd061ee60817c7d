//! Parsed stability report and its JSON shape
//!
//! A report serializes as one flat JSON object: the fixed identity fields
//! followed by one numeric field per measurement, in parse order.

use std::collections::HashMap;

use serde::{ser::SerializeMap, Serialize, Serializer};

/// Receive head coil inferred from the channel count on the configuration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadCoil {
    Channels32,
    Channels64,
}

impl HeadCoil {
    pub fn from_channels(channels: &str) -> Option<Self> {
        match channels {
            "32" => Some(Self::Channels32),
            "48" | "64" => Some(Self::Channels64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Channels32 => "32",
            Self::Channels64 => "64",
        }
    }
}

impl Serialize for HeadCoil {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityReport {
    pub scanner: String,
    pub coil: HeadCoil,
    pub filename: String,
    pub timestamp: i64,
    measurements: Vec<Measurement>,
    index: HashMap<String, usize>,
}

impl StabilityReport {
    pub fn new(scanner: String, coil: HeadCoil, filename: String, timestamp: i64) -> Self {
        Self {
            scanner,
            coil,
            filename,
            timestamp,
            measurements: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Key prefix shared by every measurement of this report.
    pub fn key_prefix(&self) -> String {
        format!("{}.{}", self.scanner, self.coil.as_str())
    }

    /// Records a measurement; a repeated key keeps its position and takes the new value.
    pub fn insert(&mut self, key: String, value: f64) {
        if let Some(&position) = self.index.get(&key) {
            self.measurements[position].value = value;
            return;
        }
        self.index.insert(key.clone(), self.measurements.len());
        self.measurements.push(Measurement { key, value });
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.index
            .get(key)
            .map(|&position| self.measurements[position].value)
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }
}

impl Serialize for StabilityReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + self.measurements.len()))?;
        map.serialize_entry("scanner", &self.scanner)?;
        map.serialize_entry("coil", &self.coil)?;
        map.serialize_entry("filename", &self.filename)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        for measurement in &self.measurements {
            map.serialize_entry(&measurement.key, &measurement.value)?;
        }
        map.end()
    }
}
