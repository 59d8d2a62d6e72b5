//! Enumeration tables mapping N2K labels to AIS codes
//!
//! Labels follow the canboat PGN definitions. Matching is ASCII
//! case-insensitive, since canboat releases have changed the capitalization
//! of several labels over time.

use crate::models::Label;

/// Static label to code table
#[derive(Debug)]
pub struct Lookup {
    name: &'static str,
    entries: &'static [(&'static str, u8)],
}

impl Lookup {
    const fn new(name: &'static str, entries: &'static [(&'static str, u8)]) -> Self {
        Self { name, entries }
    }

    /// Table name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &'static [(&'static str, u8)] {
        self.entries
    }

    /// Code for a textual label, None if the label is unknown
    pub fn code(&self, label: &str) -> Option<u8> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, code)| *code)
    }

    /// Label for a code, None if the code is not in the table
    pub fn label(&self, code: u8) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(name, _)| *name)
    }

    /// Resolve a field value, which may be a label or an already numeric code.
    ///
    /// Numeric codes are accepted only if the table knows them.
    pub fn resolve(&self, value: &Label) -> Option<u8> {
        match value {
            Label::Name(name) => self.code(name),
            Label::Code(code) => u8::try_from(*code)
                .ok()
                .filter(|c| self.label(*c).is_some()),
        }
    }
}

/// Navigational status, AIS message 1/2/3
pub static NAV_STATUS: Lookup = Lookup::new(
    "navigation status",
    &[
        ("Under way using engine", 0),
        ("At anchor", 1),
        ("Not under command", 2),
        ("Restricted manoeuverability", 3),
        ("Constrained by her draught", 4),
        ("Moored", 5),
        ("Aground", 6),
        ("Engaged in Fishing", 7),
        ("Under way sailing", 8),
        ("Hazardous material - High Speed", 9),
        ("Hazardous material - Wing in Ground", 10),
        ("Power-driven vessel towing astern", 11),
        ("Power-driven vessel pushing ahead or towing alongside", 12),
        ("AIS-SART", 14),
        ("Unavailable", 15),
    ],
);

/// Type of ship and cargo
pub static SHIP_TYPE: Lookup = Lookup::new(
    "ship type",
    &[
        ("Unavailable", 0),
        ("Wing In Ground", 20),
        ("Wing In Ground (hazard cat X)", 21),
        ("Wing In Ground (hazard cat Y)", 22),
        ("Wing In Ground (hazard cat Z)", 23),
        ("Wing In Ground (hazard cat OS)", 24),
        ("Wing In Ground (no additional information)", 29),
        ("Fishing", 30),
        ("Towing", 31),
        ("Towing exceeds 200m or wider than 25m", 32),
        ("Engaged in dredging or underwater operations", 33),
        ("Engaged in diving operations", 34),
        ("Engaged in military operations", 35),
        ("Sailing", 36),
        ("Pleasure", 37),
        ("High speed craft", 40),
        ("High speed craft (hazard cat X)", 41),
        ("High speed craft (hazard cat Y)", 42),
        ("High speed craft (hazard cat Z)", 43),
        ("High speed craft (hazard cat OS)", 44),
        ("High speed craft (no additional information)", 49),
        ("Pilot vessel", 50),
        ("SAR", 51),
        ("Tug", 52),
        ("Port tender", 53),
        ("Anti-pollution", 54),
        ("Law enforcement", 55),
        ("Spare", 56),
        ("Spare #2", 57),
        ("Medical", 58),
        ("RR Resolution No.18", 59),
        ("Passenger ship", 60),
        ("Passenger ship (hazard cat X)", 61),
        ("Passenger ship (hazard cat Y)", 62),
        ("Passenger ship (hazard cat Z)", 63),
        ("Passenger ship (hazard cat OS)", 64),
        ("Passenger ship (no additional information)", 69),
        ("Cargo ship", 70),
        ("Cargo ship (hazard cat X)", 71),
        ("Cargo ship (hazard cat Y)", 72),
        ("Cargo ship (hazard cat Z)", 73),
        ("Cargo ship (hazard cat OS)", 74),
        ("Cargo ship (no additional information)", 79),
        ("Tanker", 80),
        ("Tanker (hazard cat X)", 81),
        ("Tanker (hazard cat Y)", 82),
        ("Tanker (hazard cat Z)", 83),
        ("Tanker (hazard cat OS)", 84),
        ("Tanker (no additional information)", 89),
        ("Other", 90),
        ("Other (hazard cat X)", 91),
        ("Other (hazard cat Y)", 92),
        ("Other (hazard cat Z)", 93),
        ("Other (hazard cat OS)", 94),
        ("Other (no additional information)", 99),
    ],
);

pub static ASSIGNED_MODE: Lookup = Lookup::new(
    "assigned mode",
    &[("Autonomous and continuous", 0), ("Assigned mode", 1)],
);

/// Type of aid to navigation, AIS message 21
pub static ATON_TYPE: Lookup = Lookup::new(
    "AtoN type",
    &[
        ("Default: Type of AtoN not specified", 0),
        ("Reference point", 1),
        ("RACON", 2),
        ("Fixed structure off-shore", 3),
        ("Reserved for future use", 4),
        ("Fixed light: without sectors", 5),
        ("Fixed light: with sectors", 6),
        ("Fixed leading light front", 7),
        ("Fixed leading light rear", 8),
        ("Fixed beacon: cardinal N", 9),
        ("Fixed beacon: cardinal E", 10),
        ("Fixed beacon: cardinal S", 11),
        ("Fixed beacon: cardinal W", 12),
        ("Fixed beacon: port hand", 13),
        ("Fixed beacon: starboard hand", 14),
        ("Fixed beacon: preferred channel port hand", 15),
        ("Fixed beacon: preferred channel starboard hand", 16),
        ("Fixed beacon: isolated danger", 17),
        ("Fixed beacon: safe water", 18),
        ("Floating AtoN: cardinal N", 19),
        ("Floating AtoN: cardinal E", 20),
        ("Floating AtoN: cardinal S", 21),
        ("Floating AtoN: cardinal W", 22),
        ("Floating AtoN: port hand mark", 23),
        ("Floating AtoN: starboard hand mark", 24),
        ("Floating AtoN: preferred channel port hand", 25),
        ("Floating AtoN: preferred channel starboard hand", 26),
        ("Floating AtoN: isolated danger", 27),
        ("Floating AtoN: safe water", 28),
        ("Floating AtoN: special mark", 29),
        ("Floating AtoN: light vessel/LANBY/rigs", 30),
    ],
);

/// AIS transceiver information, used for broadcast omission
pub static AIS_TRANSCEIVER: Lookup = Lookup::new(
    "AIS transceiver",
    &[
        ("Channel A VDL reception", 0),
        ("Channel B VDL reception", 1),
        ("Channel A VDL transmission", 2),
        ("Channel B VDL transmission", 3),
        ("Own information not broadcast", 4),
        ("Reserved", 5),
    ],
);

/// Transceiver code for reports of our own vessel that are not on air
pub const OWN_INFORMATION_NOT_BROADCAST: u8 = 4;

pub static POSITION_ACCURACY: Lookup =
    Lookup::new("position accuracy", &[("Low", 0), ("High", 1)]);

pub static RAIM_FLAG: Lookup = Lookup::new("RAIM", &[("not in use", 0), ("in use", 1)]);

pub static YES_NO: Lookup = Lookup::new("yes/no", &[("No", 0), ("Yes", 1)]);
