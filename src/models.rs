//! Data models for decoded NMEA2000 PGN records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst};

use crate::errors::BridgeError;
use serde_helpers::*;

/// Largest value of the 30-bit AIS user id field
pub const MMSI_MAX: u32 = (1 << 30) - 1;

pub const PGN_CLASS_A_POSITION: u32 = 129038;
pub const PGN_CLASS_B_POSITION: u32 = 129039;
pub const PGN_ATON_REPORT: u32 = 129041;
pub const PGN_CLASS_A_STATIC: u32 = 129794;
pub const PGN_CLASS_B_STATIC_A: u32 = 129809;
pub const PGN_CLASS_B_STATIC_B: u32 = 129810;

/// Maritime Mobile Service Identity (MMSI)
///
/// A nine-digit number for identifying vessels in AIS messages, carried in a
/// 30-bit field. Accepted from JSON either as a number or as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct Mmsi(u32);

impl TryFrom<u32> for Mmsi {
    type Error = BridgeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value > MMSI_MAX {
            return Err(BridgeError::InvalidMmsi(value.to_string()));
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Mmsi {
    type Error = BridgeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parsed = value
            .trim()
            .parse::<u32>()
            .map_err(|_| BridgeError::InvalidMmsi(value.to_string()))?;
        Self::try_from(parsed)
    }
}

impl FromStr for Mmsi {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for Mmsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:09}", self.0)
    }
}

impl Mmsi {
    /// Get the raw MMSI value
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Enumerated field value as delivered by the N2K decoder.
///
/// canboat emits the label when it knows one and the bare number otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Name(String),
    Code(u64),
}

/// Decoded PGN record, canboat JSON format
///
/// ```json
/// {"pgn":129038,"prio":4,"src":43,"dst":255,
///  "timestamp":"2017-04-15T14:57:58.726Z",
///  "description":"AIS Class A Position Report",
///  "fields":{"userId":367515850, ...}}
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PgnRecord {
    pub pgn: u32,
    #[serde(default)]
    pub prio: Option<u8>,
    #[serde(default)]
    pub src: Option<u8>,
    #[serde(default)]
    pub dst: Option<u8>,
    /// Receive time, None if missing or not RFC 3339
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    /// Field values keyed by field name
    #[serde(default)]
    pub fields: serde_json::Value,
}

impl PgnRecord {
    pub fn new(pgn: u32, fields: serde_json::Value) -> Self {
        Self {
            pgn,
            prio: None,
            src: None,
            dst: None,
            timestamp: None,
            description: None,
            fields,
        }
    }
}

/// PGN 129038, AIS Class A position report
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAPositionReport {
    #[serde(alias = "User ID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub user_id: Mmsi,
    #[serde(default, alias = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "Latitude")]
    pub latitude: Option<f64>,
    /// Course over ground, radians
    #[serde(default, alias = "COG")]
    pub cog: Option<f64>,
    /// Speed over ground, m/s
    #[serde(default, alias = "SOG")]
    pub sog: Option<f64>,
    #[serde(default, alias = "AIS Transceiver information")]
    pub ais_transceiver_information: Option<Label>,
    /// True heading, radians
    #[serde(default, alias = "Heading")]
    pub heading: Option<f64>,
    /// Rate of turn, radians per second
    #[serde(default, alias = "Rate of Turn")]
    pub rate_of_turn: Option<f64>,
    #[serde(default, alias = "Nav Status")]
    pub nav_status: Option<Label>,
}

/// PGN 129039, AIS Class B position report
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBPositionReport {
    #[serde(alias = "User ID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub user_id: Mmsi,
    #[serde(default, alias = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "Position Accuracy")]
    pub position_accuracy: Option<Label>,
    #[serde(default, alias = "COG")]
    pub cog: Option<f64>,
    #[serde(default, alias = "SOG")]
    pub sog: Option<f64>,
    #[serde(default, alias = "AIS Transceiver information")]
    pub ais_transceiver_information: Option<Label>,
    #[serde(default, alias = "Heading")]
    pub heading: Option<f64>,
}

/// PGN 129794, AIS Class A static and voyage related data
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAStaticData {
    #[serde(alias = "User ID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub user_id: Mmsi,
    #[serde(default, alias = "IMO number")]
    pub imo_number: Option<u32>,
    #[serde(default, alias = "Callsign", deserialize_with = "deserialize_trimmed_string")]
    pub callsign: Option<String>,
    #[serde(default, alias = "Name", deserialize_with = "deserialize_trimmed_string")]
    pub name: Option<String>,
    #[serde(default, alias = "Type of ship")]
    pub type_of_ship: Option<Label>,
    /// Metres
    #[serde(default, alias = "Length")]
    pub length: Option<f64>,
    #[serde(default, alias = "Beam")]
    pub beam: Option<f64>,
    #[serde(default, alias = "Position reference from Starboard")]
    pub position_reference_from_starboard: Option<f64>,
    #[serde(default, alias = "Position reference from Bow")]
    pub position_reference_from_bow: Option<f64>,
    #[serde(default, alias = "Draft")]
    pub draft: Option<f64>,
    #[serde(
        default,
        alias = "Destination",
        deserialize_with = "deserialize_trimmed_string"
    )]
    pub destination: Option<String>,
}

/// PGN 129809, AIS Class B static data, message 24 part A
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBStaticPartA {
    #[serde(alias = "User ID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub user_id: Mmsi,
    #[serde(default, alias = "Name", deserialize_with = "deserialize_trimmed_string")]
    pub name: Option<String>,
}

/// PGN 129810, AIS Class B static data, message 24 part B
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBStaticPartB {
    #[serde(alias = "User ID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub user_id: Mmsi,
    #[serde(default, alias = "Type of ship")]
    pub type_of_ship: Option<Label>,
    #[serde(default, alias = "Callsign", deserialize_with = "deserialize_trimmed_string")]
    pub callsign: Option<String>,
    #[serde(default, alias = "Length")]
    pub length: Option<f64>,
    #[serde(default, alias = "Beam")]
    pub beam: Option<f64>,
    #[serde(default, alias = "Position reference from Starboard")]
    pub position_reference_from_starboard: Option<f64>,
    #[serde(default, alias = "Position reference from Bow")]
    pub position_reference_from_bow: Option<f64>,
}

/// PGN 129041, AIS Aids to Navigation (AtoN) report
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtonReport {
    #[serde(alias = "User ID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub user_id: Mmsi,
    #[serde(default, alias = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "Position Accuracy")]
    pub position_accuracy: Option<Label>,
    #[serde(default, alias = "RAIM")]
    pub raim: Option<Label>,
    /// Structure length or diameter, metres
    #[serde(default, alias = "Length/Diameter")]
    pub length_diameter: Option<f64>,
    #[serde(default, alias = "Beam/Diameter")]
    pub beam_diameter: Option<f64>,
    #[serde(default, alias = "Position Reference from Starboard Edge")]
    pub position_reference_from_starboard_edge: Option<f64>,
    #[serde(default, alias = "Position Reference from True North Facing Edge")]
    pub position_reference_from_true_north_facing_edge: Option<f64>,
    #[serde(default, alias = "AtoN Type")]
    pub aton_type: Option<Label>,
    #[serde(default, alias = "Off Position Indicator")]
    pub off_position_indicator: Option<Label>,
    #[serde(default, alias = "Virtual AtoN Flag")]
    pub virtual_aton_flag: Option<Label>,
    #[serde(default, alias = "Assigned Mode Flag")]
    pub assigned_mode_flag: Option<Label>,
    #[serde(default, alias = "AtoN Name", deserialize_with = "deserialize_trimmed_string")]
    pub aton_name: Option<String>,
}

/// PGN messages that carry AIS data
#[derive(Debug, Clone, PartialEq)]
pub enum N2kAisMessage {
    ClassAPosition(ClassAPositionReport),
    ClassBPosition(ClassBPositionReport),
    ClassAStatic(ClassAStaticData),
    ClassBStaticA(ClassBStaticPartA),
    ClassBStaticB(ClassBStaticPartB),
    AtonReport(AtonReport),
}

impl N2kAisMessage {
    /// Decode the fields of a PGN record
    ///
    /// Returns `Ok(None)` for PGNs that carry no AIS data, and an error if the
    /// fields of a supported PGN have an unexpected shape.
    pub fn from_record(record: &PgnRecord) -> Result<Option<Self>, BridgeError> {
        let message = match record.pgn {
            PGN_CLASS_A_POSITION => N2kAisMessage::ClassAPosition(decode_fields(record)?),
            PGN_CLASS_B_POSITION => N2kAisMessage::ClassBPosition(decode_fields(record)?),
            PGN_CLASS_A_STATIC => N2kAisMessage::ClassAStatic(decode_fields(record)?),
            PGN_CLASS_B_STATIC_A => N2kAisMessage::ClassBStaticA(decode_fields(record)?),
            PGN_CLASS_B_STATIC_B => N2kAisMessage::ClassBStaticB(decode_fields(record)?),
            PGN_ATON_REPORT => N2kAisMessage::AtonReport(decode_fields(record)?),
            _ => return Ok(None),
        };
        Ok(Some(message))
    }

    /// MMSI of the reporting station
    pub fn user_id(&self) -> Mmsi {
        match self {
            N2kAisMessage::ClassAPosition(m) => m.user_id,
            N2kAisMessage::ClassBPosition(m) => m.user_id,
            N2kAisMessage::ClassAStatic(m) => m.user_id,
            N2kAisMessage::ClassBStaticA(m) => m.user_id,
            N2kAisMessage::ClassBStaticB(m) => m.user_id,
            N2kAisMessage::AtonReport(m) => m.user_id,
        }
    }

    pub fn pgn(&self) -> u32 {
        match self {
            N2kAisMessage::ClassAPosition(_) => PGN_CLASS_A_POSITION,
            N2kAisMessage::ClassBPosition(_) => PGN_CLASS_B_POSITION,
            N2kAisMessage::ClassAStatic(_) => PGN_CLASS_A_STATIC,
            N2kAisMessage::ClassBStaticA(_) => PGN_CLASS_B_STATIC_A,
            N2kAisMessage::ClassBStaticB(_) => PGN_CLASS_B_STATIC_B,
            N2kAisMessage::AtonReport(_) => PGN_ATON_REPORT,
        }
    }
}

fn decode_fields<T: DeserializeOwned>(record: &PgnRecord) -> Result<T, BridgeError> {
    T::deserialize(&record.fields).map_err(|e| BridgeError::MalformedPgn {
        pgn: record.pgn,
        origin: e.to_string(),
    })
}

/// Custom deserializers
mod serde_helpers {
    use serde::{self, Deserialize, Deserializer};

    /// Strings are padded with spaces or '@' on the AIS side
    pub fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        Ok(s.and_then(|s| {
            let trimmed = s.trim_end_matches('@').trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn mmsi_bounds() {
        assert_eq!(Mmsi::try_from(367515850).unwrap().value(), 367515850);
        assert_eq!(Mmsi::try_from(1_000_000_000).unwrap().value(), 1_000_000_000);
        assert_eq!(Mmsi::try_from(MMSI_MAX).unwrap().value(), MMSI_MAX);
        assert!(Mmsi::try_from(MMSI_MAX + 1).is_err());
        assert_eq!(Mmsi::try_from("  2300123 ").unwrap().value(), 2300123);
        assert!(Mmsi::try_from("abc").is_err());
        assert_eq!(Mmsi::try_from(2300123).unwrap().to_string(), "002300123");
    }

    #[test]
    fn parse_record_envelope() {
        let s = r#"{
            "pgn": 129809,
            "prio": 6,
            "src": 43,
            "dst": 255,
            "timestamp": "2017-04-15T15:00:51.200Z",
            "description": "AIS Class B static data (msg 24 Part A)",
            "fields": {
                "messageId": "Static data report",
                "repeatIndicator": "Initial",
                "userId": 338184312,
                "name": "WILHELM",
                "aisTransceiverInformation": "Channel A VDL transmission",
                "reserved": 0
            }
        }"#;
        let record: PgnRecord = serde_json::from_str(s).unwrap();
        assert_eq!(record.pgn, 129809);
        assert_eq!(record.src, Some(43));
        assert_eq!(
            record.timestamp,
            Some(
                Utc.with_ymd_and_hms(2017, 4, 15, 15, 0, 51).unwrap()
                    + chrono::Duration::milliseconds(200)
            )
        );

        let message = N2kAisMessage::from_record(&record).unwrap().unwrap();
        let expected = N2kAisMessage::ClassBStaticA(ClassBStaticPartA {
            user_id: Mmsi::try_from(338184312).unwrap(),
            name: Some("WILHELM".to_string()),
        });
        assert_eq!(message, expected);
    }

    #[test]
    fn unparseable_timestamp_is_none() {
        let s = r#"{"pgn": 129809, "timestamp": "2017-04-15-15:00:51.200", "fields": {"userId": 1}}"#;
        let record: PgnRecord = serde_json::from_str(s).unwrap();
        assert_eq!(record.timestamp, None);
    }

    #[test]
    fn parse_legacy_field_names() {
        let record = PgnRecord::new(
            PGN_CLASS_A_POSITION,
            json!({
                "User ID": 367515850,
                "Longitude": -76.3859882,
                "Latitude": 39.074605,
                "COG": 5.6933,
                "SOG": 2,
                "Heading": 0.0698,
                "Rate of Turn": 10,
                "Nav Status": "Under way using engine",
                "AIS Transceiver information": "Channel A VDL reception"
            }),
        );
        let Some(N2kAisMessage::ClassAPosition(report)) =
            N2kAisMessage::from_record(&record).unwrap()
        else {
            panic!("expected class A position report");
        };
        assert_eq!(report.user_id.value(), 367515850);
        assert_eq!(report.sog, Some(2.0));
        assert_eq!(report.rate_of_turn, Some(10.0));
        assert_eq!(
            report.nav_status,
            Some(Label::Name("Under way using engine".to_string()))
        );
    }

    #[test]
    fn parse_string_mmsi() {
        let record = PgnRecord::new(PGN_CLASS_B_STATIC_A, json!({"userId": "338184312"}));
        let message = N2kAisMessage::from_record(&record).unwrap().unwrap();
        assert_eq!(message.user_id().value(), 338184312);
        assert_eq!(message.pgn(), PGN_CLASS_B_STATIC_A);
    }

    #[test]
    fn parse_numeric_label() {
        let record = PgnRecord::new(
            PGN_CLASS_A_POSITION,
            json!({"userId": 1, "navStatus": 13}),
        );
        let Some(N2kAisMessage::ClassAPosition(report)) =
            N2kAisMessage::from_record(&record).unwrap()
        else {
            panic!("expected class A position report");
        };
        assert_eq!(report.nav_status, Some(Label::Code(13)));
        assert_eq!(report.cog, None);
    }

    #[test]
    fn trimmed_strings() {
        let record = PgnRecord::new(
            PGN_CLASS_A_STATIC,
            json!({"userId": 1, "name": "ATLANTIC COAST@@@@", "callsign": "   ", "destination": null}),
        );
        let Some(N2kAisMessage::ClassAStatic(data)) =
            N2kAisMessage::from_record(&record).unwrap()
        else {
            panic!("expected class A static data");
        };
        assert_eq!(data.name, Some("ATLANTIC COAST".to_string()));
        assert_eq!(data.callsign, None);
        assert_eq!(data.destination, None);
    }

    #[test]
    fn unsupported_pgn_is_none() {
        let record = PgnRecord::new(129025, json!({"latitude": 60.1, "longitude": 24.9}));
        assert!(N2kAisMessage::from_record(&record).unwrap().is_none());
    }

    #[test]
    fn malformed_fields_are_errors() {
        let missing_user = PgnRecord::new(PGN_CLASS_A_POSITION, json!({"sog": 2}));
        assert!(matches!(
            N2kAisMessage::from_record(&missing_user),
            Err(BridgeError::MalformedPgn { pgn: 129038, .. })
        ));

        let wrong_type = PgnRecord::new(
            PGN_CLASS_A_POSITION,
            json!({"userId": 1, "sog": "fast"}),
        );
        assert!(N2kAisMessage::from_record(&wrong_type).is_err());

        let no_fields = PgnRecord::new(PGN_ATON_REPORT, serde_json::Value::Null);
        assert!(N2kAisMessage::from_record(&no_fields).is_err());
    }
}
