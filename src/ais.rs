//! AIS message attribute records handed to the sentence encoder.

use serde::Serialize;

use crate::models::Mmsi;

/// AIS message types produced by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum AisMessageType {
    /// Message 3, scheduled Class A position report
    ClassAPosition,
    /// Message 5, Class A static and voyage related data
    ClassAStatic,
    /// Message 18, standard Class B position report
    ClassBPosition,
    /// Message 21, aid-to-navigation report
    AtonReport,
    /// Message 24, Class B static data report
    ClassBStatic,
}

impl From<AisMessageType> for u8 {
    fn from(value: AisMessageType) -> Self {
        match value {
            AisMessageType::ClassAPosition => 3,
            AisMessageType::ClassAStatic => 5,
            AisMessageType::ClassBPosition => 18,
            AisMessageType::AtonReport => 21,
            AisMessageType::ClassBStatic => 24,
        }
    }
}

/// Attributes of one AIS message
///
/// Field names follow the attribute names of the AIS encoder. Everything
/// except `aistype`, `repeat` and `mmsi` is omitted when not known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AisAttributes {
    pub aistype: AisMessageType,
    /// Repeat indicator, always 0 for messages originating here
    pub repeat: u8,
    pub mmsi: Mmsi,
    /// Message 24 part number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navstatus: Option<u8>,
    /// Speed over ground, knots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sog: Option<f64>,
    /// Position accuracy, 1 = high, 0 = low
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Course over ground, whole degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cog: Option<i32>,
    /// True heading, whole degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdg: Option<i32>,
    /// Rate of turn indicator, 4.733 * SQRT(degrees per minute)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rot: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imo: Option<u32>,
    /// Type of ship and cargo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draught: Option<f64>,
    /// Distance from reference point to bow
    #[serde(rename = "dimA", skip_serializing_if = "Option::is_none")]
    pub dim_a: Option<f64>,
    /// Distance from reference point to stern
    #[serde(rename = "dimB", skip_serializing_if = "Option::is_none")]
    pub dim_b: Option<f64>,
    /// Distance from reference point to port side
    #[serde(rename = "dimC", skip_serializing_if = "Option::is_none")]
    pub dim_c: Option<f64>,
    /// Distance from reference point to starboard side
    #[serde(rename = "dimD", skip_serializing_if = "Option::is_none")]
    pub dim_d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aid_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atonname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_position: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raim: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_aid: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned: Option<u8>,
}

impl AisAttributes {
    /// Create a record carrying only the mandatory attributes
    pub fn new(aistype: AisMessageType, mmsi: Mmsi) -> Self {
        Self {
            aistype,
            repeat: 0,
            mmsi,
            part: None,
            navstatus: None,
            sog: None,
            accuracy: None,
            lon: None,
            lat: None,
            cog: None,
            hdg: None,
            rot: None,
            imo: None,
            cargo: None,
            callsign: None,
            shipname: None,
            destination: None,
            draught: None,
            dim_a: None,
            dim_b: None,
            dim_c: None,
            dim_d: None,
            aid_type: None,
            atonname: None,
            off_position: None,
            raim: None,
            virtual_aid: None,
            assigned: None,
        }
    }

    /// Set the four reference point offsets
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dim_a = dimensions.to_bow;
        self.dim_b = dimensions.to_stern;
        self.dim_c = dimensions.to_port;
        self.dim_d = dimensions.to_starboard;
    }
}

/// Ship dimensions as offsets from the position reference point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub to_bow: Option<f64>,
    pub to_stern: Option<f64>,
    pub to_port: Option<f64>,
    pub to_starboard: Option<f64>,
}

impl Dimensions {
    /// Offsets from an N2K reference point given from bow and from starboard.
    ///
    /// Each offset is set only if all values it is derived from are known.
    pub fn from_reference(
        from_bow: Option<f64>,
        length: Option<f64>,
        from_starboard: Option<f64>,
        beam: Option<f64>,
    ) -> Self {
        Self {
            to_bow: from_bow,
            to_stern: length.zip(from_bow).map(|(length, bow)| length - bow),
            to_port: beam
                .zip(from_starboard)
                .map(|(beam, starboard)| beam - starboard),
            to_starboard: from_starboard,
        }
    }
}
