// Common test utilities for capneg-core
#![allow(dead_code)]

use rvoip_capneg_core::{
    AttributeCapabilityRef, ConfigAttribute, PotentialConfigGraph, SessionDescription,
};
use tracing_subscriber::EnvFilter;

/// Route crate logs to the test output, filtered by RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parses SDP text, panicking on failure.
pub fn sdp(text: &str) -> SessionDescription {
    text.parse()
        .unwrap_or_else(|e| panic!("Failed to parse test SDP: {:?}\n{}", e, text))
}

/// Builds a graph from SDP text.
pub fn graph(text: &str) -> PotentialConfigGraph {
    init_tracing();
    PotentialConfigGraph::from_session(&sdp(text))
}

/// Capability indices and mandatory flags of one attribute group.
pub fn group_indices(graph: &PotentialConfigGraph, group: &[AttributeCapabilityRef]) -> Vec<(u32, bool)> {
    group
        .iter()
        .map(|reference| {
            let capability = graph
                .resolve(reference)
                .unwrap_or_else(|| panic!("Dangling attribute reference {:?}", reference));
            (capability.index, reference.mandatory)
        })
        .collect()
}

/// Attribute groups of a configuration as capability indices.
pub fn attribute_groups(graph: &PotentialConfigGraph, config: &ConfigAttribute) -> Vec<Vec<(u32, bool)>> {
    config
        .attribute_alternatives
        .iter()
        .map(|group| group_indices(graph, group))
        .collect()
}

/// Transport alternatives of a configuration as capability indices.
pub fn transport_indices(graph: &PotentialConfigGraph, config: &ConfigAttribute) -> Vec<u32> {
    config
        .transport_alternatives
        .iter()
        .map(|reference| {
            graph
                .resolve(reference)
                .unwrap_or_else(|| panic!("Dangling transport reference {:?}", reference))
                .index
        })
        .collect()
}

/// Session header shared by the fixtures below.
pub const SESSION_HEADER: &str = "v=0\r\n\
    o=jehan-mac 1239 1239 IN IP6 2a01:e35:1387:1020:6233:4bff:fe0b:5663\r\n\
    s=SIP Talk\r\n\
    c=IN IP4 192.168.0.18\r\n\
    b=AS:380\r\n\
    t=0 0\r\n\
    a=ice-pwd:31ec21eb38b2ec6d36e8dc7b\r\n";

/// Audio media section without capabilities.
pub const AUDIO_MEDIA: &str = "m=audio 7078 RTP/AVP 111 110 3 0 8 101\r\n\
    a=rtpmap:111 speex/16000\r\n\
    a=fmtp:111 vbr=on\r\n\
    a=rtpmap:110 speex/8000\r\n\
    a=fmtp:110 vbr=on\r\n\
    a=rtpmap:101 telephone-event/8000\r\n\
    a=fmtp:101 0-11\r\n";

/// Video media section without capabilities.
pub const VIDEO_MEDIA: &str = "m=video 8078 RTP/AVP 99 97 98\r\n\
    c=IN IP4 192.168.0.18\r\n\
    b=AS:380\r\n\
    a=rtcp-fb:98 nack rpsi\r\n\
    a=rtcp-xr:rcvr-rtt=all:10\r\n\
    a=rtpmap:99 MP4V-ES/90000\r\n\
    a=fmtp:99 profile-level-id=3\r\n\
    a=rtpmap:97 theora/90000\r\n\
    a=rtpmap:98 H263-1998/90000\r\n\
    a=fmtp:98 CIF=1;QCIF=1\r\n";

/// Build SDP text from pieces.
pub fn build(parts: &[&str]) -> String {
    parts.concat()
}
