use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::inventory::device::Device;
use crate::inventory::timestamp::Timestamp;

/// One observed port on a device. Results accumulate across scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortScanResult {
    pub id: i64,
    #[serde(default)]
    pub device_ip: String,
    pub port: u16,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub is_open: bool,
    pub scan_time: Timestamp,
}

/// An HTTP banner grabbed from one of the device's web ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpProbeResult {
    pub id: i64,
    #[serde(default)]
    pub device_ip: String,
    pub url: String,
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Response headers in the order the backend listed them.
    #[serde(
        default,
        deserialize_with = "deserialize_headers",
        serialize_with = "serialize_headers"
    )]
    pub headers: Option<Vec<(String, String)>>,
    #[serde(default)]
    pub body_preview: Option<String>,
    pub scan_time: Timestamp,
}

/// A device together with its port and HTTP history, fetched as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDetail {
    #[serde(flatten)]
    pub device: Device,
    #[serde(default)]
    pub port_scans: Vec<PortScanResult>,
    #[serde(default)]
    pub http_responses: Vec<HttpProbeResult>,
}

impl DeviceDetail {
    pub fn open_ports(&self) -> impl Iterator<Item = &PortScanResult> {
        self.port_scans.iter().filter(|scan| scan.is_open)
    }
}

/// Body of `POST /api/scan/network`. A missing range means the server default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkScanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_range: Option<String>,
}

/// Body of `POST /api/scan/ports`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortScanRequest {
    pub ip_address: String,
}

/// Whatever the backend answered to a mutating call.
///
/// Only its existence matters; effects are observed with a follow-up read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Ack {
    /// Accepts any body, including an empty one or a bare JSON scalar.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Ack::default();
        }
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut fields)) => {
                let message = match fields.remove("message") {
                    Some(Value::String(text)) => Some(text),
                    Some(other) => {
                        fields.insert("message".to_string(), other);
                        None
                    }
                    None => None,
                };
                Ack { message, fields }
            }
            Ok(other) => Ack {
                message: None,
                fields: Map::from_iter([("value".to_string(), other)]),
            },
            Err(_) => Ack {
                message: Some(body.trim().to_string()),
                fields: Map::new(),
            },
        }
    }
}

fn header_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

struct HeaderVisitor;

impl<'de> Visitor<'de> for HeaderVisitor {
    type Value = Option<Vec<(String, String)>>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of header names to values")
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut headers = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, value)) = map.next_entry::<String, Value>()? {
            headers.push((name, header_text(value)));
        }
        Ok(Some(headers))
    }
}

fn deserialize_headers<'de, D>(deserializer: D) -> Result<Option<Vec<(String, String)>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(HeaderVisitor)
}

fn serialize_headers<S>(headers: &Option<Vec<(String, String)>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match headers {
        Some(pairs) => serializer.collect_map(pairs.iter().map(|(name, value)| (name, value))),
        None => serializer.serialize_none(),
    }
}
