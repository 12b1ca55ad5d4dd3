//! Method-ID numbering pass.
//!
//! Runs over a completed interface. Explicit ids are reserved first; methods
//! without one then receive the lowest free ids in declaration order.

use std::collections::HashMap;

use tracing::debug;

use super::items::{DocumentItem, Interface};
use crate::errors::AidlError;

/// Largest id a method may carry: transaction codes start at 1 and the
/// range ends at `0x00ffffff`.
pub const MAX_METHOD_ID: u32 = 0x00ff_ffff - 1;

pub fn assign_method_ids(iface: &mut Interface) -> Result<(), AidlError> {
    let interface = iface.qualified_name();
    let mut reserved: HashMap<u32, String> = HashMap::new();
    let mut explicit = Vec::with_capacity(iface.items.len());

    for method in iface.methods() {
        let Some(token) = &method.explicit_id else {
            explicit.push(None);
            continue;
        };
        let id = token
            .text()
            .parse::<u32>()
            .ok()
            .filter(|id| *id <= MAX_METHOD_ID)
            .ok_or_else(|| AidlError::IdOutOfRange {
                interface: interface.clone(),
                method: method.name().to_string(),
                value: token.text().to_string(),
                max: MAX_METHOD_ID,
                line: token.line(),
            })?;
        if let Some(first) = reserved.get(&id) {
            return Err(AidlError::DuplicateExplicitId {
                interface,
                id,
                first: first.clone(),
                second: method.name().to_string(),
                line: token.line(),
            });
        }
        reserved.insert(id, method.name().to_string());
        explicit.push(Some(id));
    }

    let mut next = 0u32;
    let mut assigned = Vec::with_capacity(explicit.len());
    for (method, explicit) in iface.methods().zip(&explicit) {
        let id = match explicit {
            Some(id) => *id,
            None => {
                while reserved.contains_key(&next) {
                    next += 1;
                }
                if next > MAX_METHOD_ID {
                    return Err(AidlError::IdOutOfRange {
                        interface,
                        method: method.name().to_string(),
                        value: next.to_string(),
                        max: MAX_METHOD_ID,
                        line: method.name.line(),
                    });
                }
                next += 1;
                next - 1
            }
        };
        assigned.push(id);
    }

    for (method, id) in iface.methods_mut().zip(assigned) {
        method.assigned_id = Some(id);
    }
    debug!(interface = %interface, methods = explicit.len(), "assigned method ids");
    Ok(())
}

/// Numbers every interface of a document, stopping at the first failure.
pub fn assign_document_ids(items: &mut [DocumentItem]) -> Result<(), AidlError> {
    for item in items.iter_mut() {
        if let DocumentItem::Interface(iface) = item {
            assign_method_ids(iface)?;
        }
    }
    Ok(())
}
