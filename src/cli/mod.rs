//! Support code for the `snmp-agentd` binary.
//!
//! Argument parsing, logging setup and the MIB-II system group the daemon
//! serves.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod hints;
pub mod system;
