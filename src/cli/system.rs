//! MIB-II system group (RFC 1213) served by `snmp-agentd`.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use bytes::Bytes;

use super::args::SystemArgs;
use super::hints;
use crate::agent::AgentBuilder;
use crate::error::ErrorStatus;
use crate::handler::AccessError;
use crate::oid::Oid;
use crate::value::Value;

const SYSTEM: [u32; 7] = [1, 3, 6, 1, 2, 1, 1];

// RFC 1213 DisplayString limit.
const MAX_DISPLAY_STRING: usize = 255;

fn system_oid(arc: u32) -> Oid {
    let mut arcs = SYSTEM.to_vec();
    arcs.extend([arc, 0]);
    Oid::new(arcs)
}

/// Current values of the system group.
///
/// sysDescr, sysObjectID and sysUpTime are read-only. sysContact, sysName
/// and sysLocation accept OCTET STRING writes.
#[derive(Debug, Clone)]
pub struct SystemGroup {
    descr: Bytes,
    object_id: Oid,
    started: Instant,
    contact: Arc<RwLock<Bytes>>,
    name: Arc<RwLock<Bytes>>,
    location: Arc<RwLock<Bytes>>,
}

impl SystemGroup {
    /// Build from command-line values.
    pub fn from_args(args: &SystemArgs) -> Result<Self, String> {
        Ok(Self {
            descr: Bytes::from(args.sys_descr.clone()),
            object_id: hints::parse_oid(&args.sys_object_id)?,
            started: Instant::now(),
            contact: Arc::new(RwLock::new(Bytes::from(args.sys_contact.clone()))),
            name: Arc::new(RwLock::new(Bytes::from(args.sys_name.clone()))),
            location: Arc::new(RwLock::new(Bytes::from(args.sys_location.clone()))),
        })
    }

    /// Hundredths of a second since the group was created.
    pub fn uptime(&self) -> u32 {
        // TimeTicks wraps after ~497 days.
        (self.started.elapsed().as_millis() / 10) as u32
    }

    /// Register every system object on `builder`.
    pub fn register(&self, builder: AgentBuilder) -> AgentBuilder {
        let descr = self.descr.clone();
        let object_id = self.object_id.clone();
        let uptime = self.clone();

        let builder = builder
            .read_only(system_oid(1), move |_| Ok(Value::OctetString(descr.clone())))
            .read_only(system_oid(2), move |_| {
                Ok(Value::ObjectIdentifier(object_id.clone()))
            })
            .read_only(system_oid(3), move |_| Ok(Value::TimeTicks(uptime.uptime())));

        let builder = writable_string(builder, system_oid(4), &self.contact);
        let builder = writable_string(builder, system_oid(5), &self.name);
        writable_string(builder, system_oid(6), &self.location)
    }

    /// Current sysName.0.
    pub fn name(&self) -> Bytes {
        read(&self.name)
    }

    /// Current sysContact.0.
    pub fn contact(&self) -> Bytes {
        read(&self.contact)
    }

    /// Current sysLocation.0.
    pub fn location(&self) -> Bytes {
        read(&self.location)
    }
}

fn read(cell: &RwLock<Bytes>) -> Bytes {
    cell.read().unwrap_or_else(|e| e.into_inner()).clone()
}

fn writable_string(builder: AgentBuilder, oid: Oid, cell: &Arc<RwLock<Bytes>>) -> AgentBuilder {
    let name = hints::lookup(&oid).unwrap_or("object");
    let getter_cell = Arc::clone(cell);
    let setter_cell = Arc::clone(cell);

    builder.read_write(
        oid,
        move |_| Ok(Value::OctetString(read(&getter_cell))),
        move |oid, value| {
            let Value::OctetString(bytes) = value else {
                return Err(AccessError::status(
                    ErrorStatus::BadValue,
                    format!("{} expects an OCTET STRING, got {}", name, value.type_name()),
                ));
            };
            if bytes.len() > MAX_DISPLAY_STRING {
                return Err(AccessError::status(
                    ErrorStatus::BadValue,
                    format!("{} longer than {} bytes", name, MAX_DISPLAY_STRING),
                ));
            }
            *setter_cell.write().unwrap_or_else(|e| e.into_inner()) = bytes.clone();
            tracing::info!(snmp.oid = %oid, value = %value, "{} updated", name);
            Ok(())
        },
    )
}
