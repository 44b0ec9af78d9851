//! Capability extraction from `acap`/`tcap` attribute lists
//!
//! Both functions are pure: malformed lines are skipped with a debug trace and
//! index uniqueness is left to whoever inserts the records.

use tracing::debug;

use crate::attributes::{parse_acap, parse_tcap};
use crate::capability::{AttributeCapability, Capability};
use crate::sdp::SdpAttribute;

/// Build one attribute capability per `acap` attribute, in input order
pub fn extract_attribute_capabilities(attributes: &[&SdpAttribute]) -> Vec<AttributeCapability> {
    attributes
        .iter()
        .filter_map(|attribute| match parse_acap(attribute.value_or_empty()) {
            Ok(acap) => Some(AttributeCapability::new(acap.id, acap.name, acap.value)),
            Err(e) => {
                debug!("Skipping {}: {}", attribute, e);
                None
            }
        })
        .collect()
}

/// Build transport capabilities from `tcap` attributes
///
/// A line lists one or more protocols; they are numbered consecutively from
/// the declared index.
pub fn extract_transport_capabilities(attributes: &[&SdpAttribute]) -> Vec<Capability> {
    let mut capabilities = Vec::new();

    for attribute in attributes {
        let tcap = match parse_tcap(attribute.value_or_empty()) {
            Ok(tcap) => tcap,
            Err(e) => {
                debug!("Skipping {}: {}", attribute, e);
                continue;
            }
        };

        let numbered: Option<Vec<Capability>> = tcap
            .protocols
            .iter()
            .enumerate()
            .map(|(offset, protocol)| {
                let offset = u32::try_from(offset).ok()?;
                let index = tcap.id.checked_add(offset)?;
                Some(Capability::transport(index, protocol.as_str()))
            })
            .collect();

        match numbered {
            Some(mut line) => capabilities.append(&mut line),
            None => debug!("Skipping {}: capability index overflow", attribute),
        }
    }

    capabilities
}
