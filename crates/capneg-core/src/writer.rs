//! Rendering of capabilities and configurations as SDP attributes
//!
//! The output of these functions reads back through
//! [`SessionDescription`](crate::SessionDescription) and
//! [`PotentialConfigGraph::process`] into an equivalent graph.

use crate::capability::{
    AttributeCapability, AttributeCapabilityRef, Capability, CapabilityKind, CapabilityRecord, ConfigAttribute,
    ConfigIndex, ConfigKind, StreamIndex,
};
use crate::graph::PotentialConfigGraph;
use crate::sdp::SdpAttribute;

/// `a=acap:<index> <name>[:<value>]`
pub fn acap_line(capability: &AttributeCapability) -> SdpAttribute {
    let value = if capability.value.is_empty() {
        format!("{} {}", capability.index, capability.name)
    } else {
        format!("{} {}:{}", capability.index, capability.name, capability.value)
    };
    SdpAttribute::new(CapabilityKind::Attribute.attribute_name(), value)
}

/// `a=tcap:<index> <protocol>`
pub fn tcap_line(capability: &Capability) -> SdpAttribute {
    SdpAttribute::new(
        CapabilityKind::TransportProtocol.attribute_name(),
        format!("{} {}", capability.index, capability.value),
    )
}

/// Comma separated members of one attribute group, optional runs in brackets
fn attribute_group(graph: &PotentialConfigGraph, group: &[AttributeCapabilityRef]) -> String {
    let mut out = String::new();
    let mut in_optional_run = false;

    let members = group
        .iter()
        .filter_map(|reference| graph.resolve(reference).map(|c| (c.index(), reference.mandatory)));

    for (position, (index, mandatory)) in members.enumerate() {
        if position > 0 {
            if in_optional_run && mandatory {
                out.push(']');
                in_optional_run = false;
            }
            out.push(',');
        }
        if !mandatory && !in_optional_run {
            out.push('[');
            in_optional_run = true;
        }
        out.push_str(&index.to_string());
    }
    if in_optional_run {
        out.push(']');
    }
    out
}

fn delete_prefix(config: &ConfigAttribute) -> String {
    if !config.delete_media_attributes && !config.delete_session_attributes {
        return String::new();
    }
    let mut prefix = String::from("-");
    if config.delete_media_attributes {
        prefix.push('m');
    }
    if config.delete_session_attributes {
        prefix.push('s');
    }
    prefix.push(':');
    prefix
}

fn render_config(graph: &PotentialConfigGraph, config: &ConfigAttribute) -> String {
    let mut clauses = Vec::with_capacity(2);

    let groups: Vec<String> = config
        .attribute_alternatives
        .iter()
        .map(|group| attribute_group(graph, group))
        .filter(|group| !group.is_empty())
        .collect();
    if !groups.is_empty() {
        clauses.push(format!("a={}{}", delete_prefix(config), groups.join("|")));
    }

    let transports: Vec<String> = config
        .transport_alternatives
        .iter()
        .filter_map(|reference| graph.resolve(reference))
        .map(|c| c.index().to_string())
        .collect();
    if !transports.is_empty() {
        clauses.push(format!("t={}", transports.join("|")));
    }

    clauses.join(" ")
}

impl PotentialConfigGraph {
    /// Clauses of a stored configuration, e.g. `a=-m:20,[59]|1001 t=10|11`
    ///
    /// Returns `None` when the stream has no configuration with that number.
    pub fn config_value(&self, stream: StreamIndex, config_id: ConfigIndex) -> Option<String> {
        self.configs_for(stream)
            .get(&config_id)
            .map(|config| render_config(self, config))
    }

    /// Session level `acap` and `tcap` attributes
    pub fn session_attributes(&self) -> Vec<SdpAttribute> {
        self.global_attribute_capabilities()
            .iter()
            .map(acap_line)
            .chain(self.global_transport_capabilities().iter().map(tcap_line))
            .collect()
    }

    /// Media level `acap`, `tcap` and configuration attributes of a stream
    ///
    /// Configurations are written as `kind`; unparsed lines are not written.
    pub fn stream_attributes(&self, stream: StreamIndex, kind: ConfigKind) -> Vec<SdpAttribute> {
        let mut attributes: Vec<SdpAttribute> = self
            .attribute_capabilities_for(stream)
            .iter()
            .map(acap_line)
            .chain(self.transport_capabilities_for(stream).iter().map(tcap_line))
            .collect();

        for (id, config) in self.configs_for(stream) {
            let clauses = render_config(self, config);
            let value = if clauses.is_empty() {
                id.to_string()
            } else {
                format!("{} {}", id, clauses)
            };
            attributes.push(SdpAttribute::new(kind.attribute_name(), value));
        }

        attributes
    }
}
