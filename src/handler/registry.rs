//! Ordered registry of managed objects.

use std::fmt;

use crate::error::{Error, Result};
use crate::oid::Oid;

use super::accessor::{Getter, Setter, not_writable};

/// How [`Registry::lookup`] matches a requested OID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// The entry registered under exactly this OID.
    Exact,
    /// The entry with the smallest OID strictly greater than this one.
    Next,
}

/// An OID bound to its accessors.
#[derive(Clone)]
pub struct ManagedObject {
    oid: Oid,
    getter: Getter,
    setter: Setter,
    writable: bool,
}

impl ManagedObject {
    /// OID the object is registered under.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Read accessor.
    pub fn getter(&self) -> &Getter {
        &self.getter
    }

    /// Write accessor. Read-only objects get one that fails with `notWritable`.
    pub fn setter(&self) -> &Setter {
        &self.setter
    }

    /// Whether a write accessor was supplied at registration.
    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

impl fmt::Debug for ManagedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedObject")
            .field("oid", &self.oid)
            .field("writable", &self.writable)
            .finish_non_exhaustive()
    }
}

/// Managed objects kept in ascending OID order.
///
/// Backed by a sorted `Vec` so both lookup modes are a single binary search.
/// OIDs are unique and entries are never removed.
///
/// ```
/// use snmp_agent::handler::{LookupMode, Registry, getter};
/// use snmp_agent::{Value, oid};
///
/// let mut registry = Registry::new();
/// registry
///     .register_read_only(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), getter(|_| Ok(Value::Integer(123))))
///     .unwrap();
///
/// let next = registry.lookup(&oid!(1, 3, 6, 1, 2, 1, 1, 3), LookupMode::Next).unwrap();
/// assert_eq!(next.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<ManagedObject>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object that rejects SET with `notWritable`.
    pub fn register_read_only(&mut self, oid: Oid, getter: Getter) -> Result<()> {
        self.insert(ManagedObject {
            oid,
            getter,
            setter: not_writable(),
            writable: false,
        })
    }

    /// Register an object with both accessors.
    pub fn register_read_write(&mut self, oid: Oid, getter: Getter, setter: Setter) -> Result<()> {
        self.insert(ManagedObject {
            oid,
            getter,
            setter,
            writable: true,
        })
    }

    fn insert(&mut self, object: ManagedObject) -> Result<()> {
        match self.position(&object.oid) {
            Ok(_) => Err(Error::AlreadyRegistered { oid: object.oid }),
            Err(idx) => {
                tracing::trace!(snmp.oid = %object.oid, writable = object.writable, "registered managed object");
                self.entries.insert(idx, object);
                Ok(())
            }
        }
    }

    /// Find an entry for `oid`.
    pub fn lookup(&self, oid: &Oid, mode: LookupMode) -> Option<&ManagedObject> {
        match (mode, self.position(oid)) {
            (LookupMode::Exact, Ok(idx)) => self.entries.get(idx),
            (LookupMode::Exact, Err(_)) => None,
            // Exact hit: the successor is the next slot.
            (LookupMode::Next, Ok(idx)) => self.entries.get(idx + 1),
            // Insertion point already holds the first greater entry.
            (LookupMode::Next, Err(idx)) => self.entries.get(idx),
        }
    }

    fn position(&self, oid: &Oid) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by(|entry| entry.oid.cmp(oid))
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in ascending OID order.
    pub fn iter(&self) -> impl Iterator<Item = &ManagedObject> {
        self.entries.iter()
    }
}
