//! Friendly names for the objects `snmp-agentd` knows about.
//!
//! A fixed table, not MIB support.

use crate::Oid;

static NAMES: &[(&[u32], &str)] = &[
    (&[1, 3, 6, 1, 2, 1, 1], "system"),
    (&[1, 3, 6, 1, 2, 1, 1, 1, 0], "sysDescr.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 2, 0], "sysObjectID.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 3, 0], "sysUpTime.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 4, 0], "sysContact.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 5, 0], "sysName.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 6, 0], "sysLocation.0"),
    (&[1, 3, 6, 1, 4, 1], "enterprises"),
    (&[1, 3, 6, 1, 4, 1, 8072, 3, 2, 10], "netSnmpAgentOIDs.10"),
];

/// Friendly name for `oid`, if it is in the table.
pub fn lookup(oid: &Oid) -> Option<&'static str> {
    NAMES
        .iter()
        .find(|(arcs, _)| *arcs == oid.arcs())
        .map(|(_, name)| *name)
}

/// Parse dotted notation or a name from the table (case-insensitive).
pub fn parse_oid(s: &str) -> Result<Oid, String> {
    if s.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Oid::parse(s).map_err(|e| format!("invalid OID '{}': {}", s, e));
    }

    NAMES
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(s))
        .map(|(arcs, _)| Oid::from_slice(arcs))
        .ok_or_else(|| format!("unknown OID name '{}'", s))
}
