//! Variable binding processing for GET, GETNEXT and SET.

use crate::error::ErrorStatus;
use crate::handler::{LookupMode, Registry, Response};
use crate::varbind::VarBind;

/// Run a batch of bindings against `registry`.
///
/// Each binding is resolved with [`LookupMode::Next`] when `next` is set,
/// otherwise exactly. With `mutate` the object's setter is called with the
/// binding's value, otherwise its getter.
///
/// Processing stops at the first failure: the response carries that failure's
/// status, its 1-based index and the request's own bindings. Values read
/// before the failure are discarded. Setters that already ran are not undone.
///
/// On success a read returns one binding per request binding, named with the
/// resolved OID; a write returns the request's bindings unchanged.
pub fn process_pdu(registry: &Registry, varbinds: &[VarBind], next: bool, mutate: bool) -> Response {
    let mode = if next {
        LookupMode::Next
    } else {
        LookupMode::Exact
    };
    let mut results = Vec::with_capacity(if mutate { 0 } else { varbinds.len() });

    for (index, vb) in varbinds.iter().enumerate() {
        let error_index = (index + 1) as i32;

        let Some(object) = registry.lookup(&vb.oid, mode) else {
            tracing::trace!(snmp.oid = %vb.oid, ?mode, "no managed object");
            return Response::error(ErrorStatus::NoSuchName, error_index, varbinds.to_vec());
        };

        let outcome = if mutate {
            (object.setter())(object.oid(), &vb.value).map(|()| None)
        } else {
            (object.getter())(object.oid()).map(Some)
        };

        match outcome {
            Ok(Some(value)) => {
                tracing::trace!(snmp.oid = %object.oid(), %value, "read");
                results.push(VarBind::new(object.oid().clone(), value));
            }
            Ok(None) => {
                tracing::trace!(snmp.oid = %object.oid(), value = %vb.value, "written");
            }
            Err(err) => {
                let status = err.error_status();
                tracing::debug!(
                    snmp.oid = %object.oid(),
                    snmp.error_status = %status,
                    snmp.error_index = error_index,
                    error = %err,
                    "accessor failed"
                );
                return Response::error(status, error_index, varbinds.to_vec());
            }
        }
    }

    if mutate {
        Response::success(varbinds.to_vec())
    } else {
        Response::success(results)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::handler::{AccessError, getter, setter};
    use crate::oid;
    use crate::oid::Oid;
    use crate::value::Value;

    fn sys(arc: u32) -> Oid {
        oid!(1, 3, 6, 1, 2, 1, 1, arc, 0)
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register_read_only(sys(1), getter(|_| Ok(Value::from("test agent"))))
            .unwrap();
        registry
            .register_read_only(sys(3), getter(|_| Ok(Value::TimeTicks(123))))
            .unwrap();
        registry
            .register_read_write(
                sys(5),
                getter(|_| Ok(Value::from("router"))),
                setter(|_, value| match value {
                    Value::OctetString(_) => Ok(()),
                    _ => Err(AccessError::status(ErrorStatus::BadValue, "expected a string")),
                }),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_get_all_found() {
        let request = vec![VarBind::null(sys(1)), VarBind::null(sys(3))];
        let response = process_pdu(&registry(), &request, false, false);
        assert!(response.is_success());
        assert_eq!(response.error_index, 0);
        assert_eq!(
            response.varbinds,
            vec![
                VarBind::new(sys(1), Value::from("test agent")),
                VarBind::new(sys(3), Value::TimeTicks(123)),
            ]
        );
    }

    #[test]
    fn test_get_missing_returns_original_bindings() {
        let request = vec![
            VarBind::null(sys(1)),
            VarBind::null(sys(2)),
            VarBind::null(sys(3)),
        ];
        let response = process_pdu(&registry(), &request, false, false);
        assert_eq!(response.error_status, ErrorStatus::NoSuchName);
        assert_eq!(response.error_index, 2);
        assert_eq!(response.varbinds, request);
    }

    #[test]
    fn test_get_next_uses_resolved_oid() {
        let request = vec![
            VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 3)),
            VarBind::null(sys(3)),
        ];
        let response = process_pdu(&registry(), &request, true, false);
        assert!(response.is_success());
        assert_eq!(
            response.varbinds,
            vec![
                VarBind::new(sys(3), Value::TimeTicks(123)),
                VarBind::new(sys(5), Value::from("router")),
            ]
        );
    }

    #[test]
    fn test_get_next_past_end() {
        let request = vec![VarBind::null(sys(5))];
        let response = process_pdu(&registry(), &request, true, false);
        assert_eq!(response.error_status, ErrorStatus::NoSuchName);
        assert_eq!(response.error_index, 1);
        assert_eq!(response.varbinds, request);
    }

    #[test]
    fn test_set_success_echoes_request() {
        let request = vec![VarBind::new(sys(5), Value::from("core-1"))];
        let response = process_pdu(&registry(), &request, false, true);
        assert!(response.is_success());
        assert_eq!(response.varbinds, request);
    }

    #[test]
    fn test_set_typed_failure() {
        let request = vec![VarBind::new(sys(5), Value::Integer(1))];
        let response = process_pdu(&registry(), &request, false, true);
        assert_eq!(response.error_status, ErrorStatus::BadValue);
        assert_eq!(response.error_index, 1);
        assert_eq!(response.varbinds, request);
    }

    #[test]
    fn test_set_read_only_object_is_not_writable() {
        let request = vec![
            VarBind::new(sys(5), Value::from("ok")),
            VarBind::new(sys(3), Value::TimeTicks(0)),
        ];
        let response = process_pdu(&registry(), &request, false, true);
        assert_eq!(response.error_status, ErrorStatus::NotWritable);
        assert_eq!(response.error_index, 2);
    }

    #[test]
    fn test_untyped_failure_is_gen_err() {
        let mut registry = registry();
        registry
            .register_read_only(
                sys(6),
                getter(|_| Err(AccessError::other("sensor offline"))),
            )
            .unwrap();

        let request = vec![VarBind::null(sys(1)), VarBind::null(sys(6))];
        let response = process_pdu(&registry, &request, false, false);
        assert_eq!(response.error_status, ErrorStatus::GenErr);
        assert_eq!(response.error_index, 2);
        assert_eq!(response.varbinds, request);
    }

    #[test]
    fn test_stops_at_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new();
        for arc in [1, 2, 3] {
            let calls = calls.clone();
            registry
                .register_read_only(
                    sys(arc),
                    getter(move |oid| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        if oid.arcs()[7] == 2 {
                            Err(AccessError::status(ErrorStatus::ReadOnly, "nope"))
                        } else {
                            Ok(Value::Null)
                        }
                    }),
                )
                .unwrap();
        }

        let request = vec![
            VarBind::null(sys(1)),
            VarBind::null(sys(2)),
            VarBind::null(sys(3)),
        ];
        let response = process_pdu(&registry, &request, false, false);
        assert_eq!(response.error_status, ErrorStatus::ReadOnly);
        assert_eq!(response.error_index, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_request() {
        let response = process_pdu(&registry(), &[], false, false);
        assert!(response.is_success());
        assert!(response.varbinds.is_empty());
    }
}
