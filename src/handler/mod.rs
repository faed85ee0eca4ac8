//! Managed objects and their accessors.
//!
//! A managed object is an OID bound to a read accessor ([`Getter`]) and a
//! write accessor ([`Setter`]). Objects live in a [`Registry`] kept in OID
//! order, which answers both exact and successor lookups.
//!
//! Accessors are plain synchronous closures. They report protocol failures
//! with [`AccessError::status`]; any other error is answered with `genErr`.
//!
//! ```
//! use snmp_agent::handler::{AccessError, Registry, getter, setter};
//! use snmp_agent::{ErrorStatus, Value, oid};
//!
//! let mut registry = Registry::new();
//! registry.register_read_write(
//!     oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
//!     getter(|_| Ok(Value::from("router"))),
//!     setter(|_, value| match value {
//!         Value::OctetString(_) => Ok(()),
//!         _ => Err(AccessError::status(ErrorStatus::BadValue, "expected a string")),
//!     }),
//! )?;
//! # Ok::<(), snmp_agent::Error>(())
//! ```

mod accessor;
mod registry;
mod results;

pub use accessor::{AccessError, Getter, Setter, getter, setter};
pub use registry::{LookupMode, ManagedObject, Registry};
pub use results::Response;
