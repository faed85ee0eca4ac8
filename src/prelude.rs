//! Prelude module for convenient imports.
//!
//! ```rust
//! use snmp_agent::prelude::*;
//!
//! let agent = Agent::builder()
//!     .read_only(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), |_| Ok(Value::from("test agent")))
//!     .build()?;
//! assert_eq!(agent.registry().len(), 1);
//! # Ok::<(), Error>(())
//! ```
//!
//! This imports the agent and its builder, the accessor error type, the core
//! value types, [`Error`]/[`Result`] and the [`oid!`] macro.

pub use crate::agent::{Agent, AgentBuilder};
pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::handler::AccessError;
pub use crate::oid::Oid;
pub use crate::value::Value;
pub use crate::varbind::VarBind;
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
