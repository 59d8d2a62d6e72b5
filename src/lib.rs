//! Translate NMEA2000 AIS PGNs into AIS message attribute records

pub mod ais;
pub mod config;
pub mod errors;
pub mod lookups;
pub mod mapper;
pub mod models;
pub mod mqtt;
