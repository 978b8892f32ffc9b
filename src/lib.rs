//! LRT: Lambda Reliability Toolkit
//!
//! A Unix-style toolkit for reliability engineering: MIL-HDBK-217F hazard-rate
//! prediction, derating checks, FMEA criticality, reliability growth and
//! survival analysis over plain-text input files.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod records;
pub mod schema;
