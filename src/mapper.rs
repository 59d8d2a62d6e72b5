//! Conversion of N2K AIS PGNs to AIS message attributes

pub mod units;

use tracing::{debug, trace, warn};

use crate::{
    ais::{AisAttributes, AisMessageType, Dimensions},
    config::MapperConfig,
    errors::BridgeError,
    lookups::{
        Lookup, AIS_TRANSCEIVER, ASSIGNED_MODE, ATON_TYPE, NAV_STATUS,
        OWN_INFORMATION_NOT_BROADCAST, POSITION_ACCURACY, RAIM_FLAG, SHIP_TYPE, YES_NO,
    },
    models::{
        AtonReport, ClassAPositionReport, ClassAStaticData, ClassBPositionReport,
        ClassBStaticPartA, ClassBStaticPartB, Label, Mmsi, N2kAisMessage, PgnRecord,
    },
};
use units::{mps_to_knots, radians_to_degrees, rate_of_turn_code};

/// Maps PGN records to AIS attribute records
///
/// Holds no mutable state, a single mapper can be shared between tasks.
#[derive(Debug, Clone, Default)]
pub struct AisMapper {
    own_mmsi: Option<Mmsi>,
    send_self: bool,
}

impl AisMapper {
    /// Create a mapper
    ///
    /// Messages from `own_mmsi`, and position reports flagged as not
    /// broadcast, are dropped unless `send_self` is set.
    pub fn new(own_mmsi: Option<Mmsi>, send_self: bool) -> Self {
        Self {
            own_mmsi,
            send_self,
        }
    }

    pub fn from_config(config: &MapperConfig) -> Self {
        Self::new(config.own_mmsi, config.send_self)
    }

    /// Convert a PGN record, logging and dropping records that fail to convert
    pub fn convert(&self, record: &PgnRecord) -> Option<AisAttributes> {
        match self.try_convert(record) {
            Ok(attributes) => attributes,
            Err(e) => {
                warn!("Failed to convert PGN {}: {}", record.pgn, e);
                None
            }
        }
    }

    /// Convert a PGN record
    ///
    /// Returns `Ok(None)` when the PGN carries no AIS data or the message is
    /// suppressed.
    pub fn try_convert(&self, record: &PgnRecord) -> Result<Option<AisAttributes>, BridgeError> {
        match N2kAisMessage::from_record(record)? {
            Some(message) => Ok(self.map_message(&message)),
            None => {
                trace!("PGN {} carries no AIS data", record.pgn);
                Ok(None)
            }
        }
    }

    /// Map a decoded message, applying broadcast omission and self-suppression
    pub fn map_message(&self, message: &N2kAisMessage) -> Option<AisAttributes> {
        let mmsi = message.user_id();
        debug!("PGN {} from MMSI {}", message.pgn(), mmsi);

        let attributes = match message {
            N2kAisMessage::ClassAPosition(report) => self.class_a_position(report)?,
            N2kAisMessage::ClassBPosition(report) => self.class_b_position(report)?,
            N2kAisMessage::ClassAStatic(data) => class_a_static(data),
            N2kAisMessage::ClassBStaticA(data) => class_b_static_a(data),
            N2kAisMessage::ClassBStaticB(data) => class_b_static_b(data),
            N2kAisMessage::AtonReport(report) => aton_report(report),
        };

        if self.is_own_vessel(mmsi) {
            debug!("Dropping message {} from own vessel", message.pgn());
            return None;
        }

        debug!("Converted PGN {} to {:?}", message.pgn(), attributes);
        Some(attributes)
    }

    fn is_own_vessel(&self, mmsi: Mmsi) -> bool {
        !self.send_self && self.own_mmsi == Some(mmsi)
    }

    /// Reports of our own transceiver that were never transmitted
    fn is_not_broadcast(&self, transceiver: Option<&Label>) -> bool {
        !self.send_self
            && transceiver.and_then(|t| AIS_TRANSCEIVER.resolve(t))
                == Some(OWN_INFORMATION_NOT_BROADCAST)
    }

    fn class_a_position(&self, report: &ClassAPositionReport) -> Option<AisAttributes> {
        if self.is_not_broadcast(report.ais_transceiver_information.as_ref()) {
            debug!("Class A position of {} not broadcast", report.user_id);
            return None;
        }

        let mut attributes = AisAttributes::new(AisMessageType::ClassAPosition, report.user_id);
        attributes.navstatus = lookup(&NAV_STATUS, report.nav_status.as_ref());
        attributes.sog = report.sog.map(mps_to_knots);
        attributes.lon = report.longitude;
        attributes.lat = report.latitude;
        attributes.cog = report.cog.map(radians_to_degrees);
        attributes.hdg = report.heading.map(radians_to_degrees);
        attributes.rot = report.rate_of_turn.map(rate_of_turn_code);
        Some(attributes)
    }

    fn class_b_position(&self, report: &ClassBPositionReport) -> Option<AisAttributes> {
        if self.is_not_broadcast(report.ais_transceiver_information.as_ref()) {
            debug!("Class B position of {} not broadcast", report.user_id);
            return None;
        }

        let mut attributes = AisAttributes::new(AisMessageType::ClassBPosition, report.user_id);
        attributes.sog = report.sog.map(mps_to_knots);
        attributes.accuracy = Some(accuracy_flag(report.position_accuracy.as_ref()));
        attributes.lon = report.longitude;
        attributes.lat = report.latitude;
        attributes.cog = report.cog.map(radians_to_degrees);
        attributes.hdg = report.heading.map(radians_to_degrees);
        Some(attributes)
    }
}

fn class_a_static(data: &ClassAStaticData) -> AisAttributes {
    let mut attributes = AisAttributes::new(AisMessageType::ClassAStatic, data.user_id);
    attributes.imo = data.imo_number;
    attributes.cargo = lookup(&SHIP_TYPE, data.type_of_ship.as_ref());
    attributes.callsign = data.callsign.clone();
    attributes.shipname = data.name.clone();
    attributes.destination = data.destination.clone();
    attributes.draught = data.draft.map(|draft| draft / 10.0);
    attributes.set_dimensions(Dimensions::from_reference(
        data.position_reference_from_bow,
        data.length,
        data.position_reference_from_starboard,
        data.beam,
    ));
    attributes
}

fn class_b_static_a(data: &ClassBStaticPartA) -> AisAttributes {
    let mut attributes = AisAttributes::new(AisMessageType::ClassBStatic, data.user_id);
    attributes.part = Some(0);
    attributes.shipname = data.name.clone();
    attributes
}

fn class_b_static_b(data: &ClassBStaticPartB) -> AisAttributes {
    let mut attributes = AisAttributes::new(AisMessageType::ClassBStatic, data.user_id);
    attributes.part = Some(1);
    attributes.cargo = lookup(&SHIP_TYPE, data.type_of_ship.as_ref());
    attributes.callsign = data.callsign.clone();
    attributes.set_dimensions(Dimensions::from_reference(
        data.position_reference_from_bow,
        data.length,
        data.position_reference_from_starboard,
        data.beam,
    ));
    attributes
}

fn aton_report(report: &AtonReport) -> AisAttributes {
    let mut attributes = AisAttributes::new(AisMessageType::AtonReport, report.user_id);
    attributes.aid_type = lookup(&ATON_TYPE, report.aton_type.as_ref());
    attributes.atonname = report.aton_name.clone();
    attributes.accuracy = Some(accuracy_flag(report.position_accuracy.as_ref()));
    attributes.lon = report.longitude;
    attributes.lat = report.latitude;
    attributes.off_position = Some(yes_flag(report.off_position_indicator.as_ref()));
    attributes.raim = Some(raim_flag(report.raim.as_ref()));
    attributes.virtual_aid = Some(yes_flag(report.virtual_aton_flag.as_ref()));
    attributes.assigned = lookup(&ASSIGNED_MODE, report.assigned_mode_flag.as_ref());
    attributes.set_dimensions(Dimensions::from_reference(
        report.position_reference_from_true_north_facing_edge,
        report.length_diameter,
        report.position_reference_from_starboard_edge,
        report.beam_diameter,
    ));
    attributes
}

/// Look up an enumerated field, None if missing or not in the table
fn lookup(table: &Lookup, value: Option<&Label>) -> Option<u8> {
    let value = value?;
    let code = table.resolve(value);
    if code.is_none() {
        debug!("Unmapped {} value {:?}", table.name(), value);
    }
    code
}

/// 0 for low accuracy, 1 otherwise
fn accuracy_flag(value: Option<&Label>) -> u8 {
    match value.and_then(|v| POSITION_ACCURACY.resolve(v)) {
        Some(0) => 0,
        _ => 1,
    }
}

/// 1 when RAIM is in use, 0 otherwise
fn raim_flag(value: Option<&Label>) -> u8 {
    match value.and_then(|v| RAIM_FLAG.resolve(v)) {
        Some(1) => 1,
        _ => 0,
    }
}

/// 1 for yes, 0 otherwise
fn yes_flag(value: Option<&Label>) -> u8 {
    match value.and_then(|v| YES_NO.resolve(v)) {
        Some(1) => 1,
        _ => 0,
    }
}
