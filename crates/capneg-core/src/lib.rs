//! SDP capability negotiation for rvoip
//!
//! This crate builds the potential configuration graph of RFC 5939 from a
//! session description: attribute capabilities (`a=acap`), transport
//! capabilities (`a=tcap`) and the actual or potential configurations
//! (`a=acfg`, `a=pcfg`) that combine them, per media stream.
//!
//! The graph is what offer/answer code queries to enumerate the
//! configurations a peer proposes, and what it mutates to describe the
//! configuration it accepts. Choosing a configuration is left to the caller.
//!
//! ```
//! use rvoip_capneg_core::prelude::*;
//!
//! let sdp: SessionDescription = "v=0\r\n\
//!     a=acap:1 key-mgmt:mikey AQAFgM\r\n\
//!     a=tcap:1 RTP/SAVP\r\n\
//!     m=audio 7078 RTP/AVP 0\r\n\
//!     a=pcfg:1 a=1 t=1\r\n".parse().unwrap();
//!
//! let mut graph = PotentialConfigGraph::new();
//! graph.process(&sdp).unwrap();
//!
//! let config = &graph.configs_for(0)[&1];
//! let key_mgmt = graph.resolve(&config.attribute_alternatives[0][0]).unwrap();
//! assert_eq!(key_mgmt.value, "mikey AQAFgM");
//!
//! // Answer with a new actual configuration
//! let id = graph.free_config_index(0);
//! graph.add_config(0, id, &[vec![1]], &[1], false, false);
//! assert_eq!(graph.config_value(0, id).as_deref(), Some("a=1 t=1"));
//! ```

pub mod attributes;
pub mod capability;
pub mod config;
pub mod config_parser;
pub mod error;
pub mod extract;
pub mod graph;
pub mod index;
pub mod sdp;
pub mod writer;

pub use capability::{
    AttributeCapability, AttributeCapabilityRef, Capability, CapabilityIndex, CapabilityKey, CapabilityKind,
    CapabilityRecord, CapabilityScope, ConfigAttribute, ConfigCapabilityRef, ConfigIndex, ConfigKind,
    PotentialConfiguration, StreamIndex, TransportCapabilityRef,
};
pub use config::{GraphConfig, MalformedConfigPolicy};
pub use error::{Error, Result};
pub use graph::{PotentialConfigGraph, StoredCapability};
pub use index::free_index;
pub use sdp::{MediaDescription, SdpAttribute, SessionDescription};

/// Re-export of common types and functions
pub mod prelude {
    pub use crate::capability::{
        AttributeCapability, Capability, CapabilityKind, ConfigAttribute, ConfigCapabilityRef, ConfigKind,
    };
    pub use crate::config::{GraphConfig, MalformedConfigPolicy};
    pub use crate::error::{Error, Result};
    pub use crate::graph::PotentialConfigGraph;
    pub use crate::sdp::{MediaDescription, SdpAttribute, SessionDescription};
}
