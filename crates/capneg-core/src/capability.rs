//! Capability and configuration records
//!
//! Capabilities are declared once (`a=acap`, `a=tcap`) and referenced many
//! times from configurations (`a=acfg`, `a=pcfg`). Records are owned by the
//! graph in append-only, per-scope vectors; configurations hold a
//! [`ConfigCapabilityRef`] naming the scope and slot of the record instead of
//! a pointer to it.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// 0-based position of a media description in the session description
pub type StreamIndex = u32;

/// Number of an `acfg`/`pcfg` configuration
pub type ConfigIndex = u32;

/// Number of an `acap`/`tcap` capability
pub type CapabilityIndex = u32;

/// Kind of a capability (RFC 5939 section 3.4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityKind {
    /// Attribute capability (a=acap)
    Attribute,
    /// Transport protocol capability (a=tcap)
    TransportProtocol,
    /// Extension capability (a=ecap), recognised but never resolved
    Extended,
}

impl CapabilityKind {
    /// SDP attribute name declaring capabilities of this kind
    pub fn attribute_name(&self) -> &'static str {
        match self {
            CapabilityKind::Attribute => "acap",
            CapabilityKind::TransportProtocol => "tcap",
            CapabilityKind::Extended => "ecap",
        }
    }

    /// Kind selected by the leading tag of a configuration clause (`a=`, `t=`)
    pub fn from_clause_tag(tag: &str) -> Self {
        match tag {
            "a" => CapabilityKind::Attribute,
            "t" => CapabilityKind::TransportProtocol,
            _ => CapabilityKind::Extended,
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

/// Kind of a configuration attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigKind {
    /// Actual configuration (a=acfg), carried by answers
    Actual,
    /// Potential configuration (a=pcfg), carried by offers
    Potential,
}

impl ConfigKind {
    /// Both kinds in processing order
    pub const ALL: [ConfigKind; 2] = [ConfigKind::Actual, ConfigKind::Potential];

    /// SDP attribute name of this configuration kind
    pub fn attribute_name(&self) -> &'static str {
        match self {
            ConfigKind::Actual => "acfg",
            ConfigKind::Potential => "pcfg",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

/// Common view over capability records
pub trait CapabilityRecord {
    /// Capability number
    fn index(&self) -> CapabilityIndex;
    /// Capability value (protocol name or attribute value)
    fn value(&self) -> &str;
    /// Capability kind
    fn kind(&self) -> CapabilityKind;
}

/// A transport protocol (or other unnamed) capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Capability number, unique among capabilities of the same kind
    pub index: CapabilityIndex,
    /// Protocol name, e.g. "RTP/SAVP"
    pub value: String,
    /// Capability kind
    pub kind: CapabilityKind,
}

impl Capability {
    /// Create a transport protocol capability
    pub fn transport(index: CapabilityIndex, value: impl Into<String>) -> Self {
        Self {
            index,
            value: value.into(),
            kind: CapabilityKind::TransportProtocol,
        }
    }
}

impl CapabilityRecord for Capability {
    fn index(&self) -> CapabilityIndex {
        self.index
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn kind(&self) -> CapabilityKind {
        self.kind
    }
}

/// An attribute capability: an SDP attribute that may be applied to a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCapability {
    /// Capability number, unique among attribute capabilities
    pub index: CapabilityIndex,
    /// SDP attribute name, e.g. "crypto" or "ptime"
    pub name: String,
    /// SDP attribute value, empty for flag attributes
    pub value: String,
    /// Capability kind, always `Attribute`
    pub kind: CapabilityKind,
}

impl AttributeCapability {
    /// Create an attribute capability
    pub fn new(index: CapabilityIndex, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            value: value.into(),
            kind: CapabilityKind::Attribute,
        }
    }
}

impl CapabilityRecord for AttributeCapability {
    fn index(&self) -> CapabilityIndex {
        self.index
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn kind(&self) -> CapabilityKind {
        self.kind
    }
}

/// Where a capability was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CapabilityScope {
    /// Session level, visible to every stream
    Session,
    /// Media level of the given stream
    Stream(StreamIndex),
}

/// Stable key of a capability record inside the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityKey {
    /// Declaration scope
    pub scope: CapabilityScope,
    /// Position in the scope's capability list
    pub slot: usize,
}

impl CapabilityKey {
    /// Create a key
    pub fn new(scope: CapabilityScope, slot: usize) -> Self {
        Self { scope, slot }
    }
}

/// Non-owning reference from a configuration to a capability record
///
/// `T` is the record type the key points at, so attribute and transport
/// references cannot be mixed up.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ConfigCapabilityRef<T> {
    /// Key of the referenced record
    pub key: CapabilityKey,
    /// Whether the capability must be supported for the configuration to apply
    pub mandatory: bool,
    #[serde(skip)]
    _kind: PhantomData<fn() -> T>,
}

impl<T> ConfigCapabilityRef<T> {
    /// Create a reference
    pub fn new(key: CapabilityKey, mandatory: bool) -> Self {
        Self {
            key,
            mandatory,
            _kind: PhantomData,
        }
    }
}

impl<T> Clone for ConfigCapabilityRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ConfigCapabilityRef<T> {}

impl<T> PartialEq for ConfigCapabilityRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.mandatory == other.mandatory
    }
}

impl<T> Eq for ConfigCapabilityRef<T> {}

impl<T> fmt::Debug for ConfigCapabilityRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigCapabilityRef")
            .field("key", &self.key)
            .field("mandatory", &self.mandatory)
            .finish()
    }
}

/// Reference to an attribute capability
pub type AttributeCapabilityRef = ConfigCapabilityRef<AttributeCapability>;

/// Reference to a transport capability
pub type TransportCapabilityRef = ConfigCapabilityRef<Capability>;

/// One resolved `acfg`/`pcfg` configuration of a stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigAttribute {
    /// Alternative attribute capability sets, one per `|`-separated slot
    pub attribute_alternatives: Vec<Vec<AttributeCapabilityRef>>,
    /// Alternative transport protocols, one per `|`-separated slot
    pub transport_alternatives: Vec<TransportCapabilityRef>,
    /// Media level attributes are replaced by the configuration (`-m`)
    pub delete_media_attributes: bool,
    /// Session level attributes are replaced by the configuration (`-s`)
    pub delete_session_attributes: bool,
}

/// One point of the configuration space described by a [`ConfigAttribute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PotentialConfiguration<'a> {
    /// Attribute capability set, if the configuration lists any
    pub attributes: Option<&'a [AttributeCapabilityRef]>,
    /// Transport protocol, if the configuration lists any
    pub transport: Option<&'a TransportCapabilityRef>,
}

impl ConfigAttribute {
    /// Create an empty configuration with the given delete flags
    pub fn new(delete_media_attributes: bool, delete_session_attributes: bool) -> Self {
        Self {
            delete_media_attributes,
            delete_session_attributes,
            ..Self::default()
        }
    }

    /// True when neither attribute nor transport alternatives are listed
    pub fn is_empty(&self) -> bool {
        self.attribute_alternatives.is_empty() && self.transport_alternatives.is_empty()
    }

    /// Number of (attribute set, transport) pairs this configuration stands for
    pub fn combination_count(&self) -> usize {
        self.attribute_alternatives.len().max(1) * self.transport_alternatives.len().max(1)
    }

    /// Enumerate every (attribute set, transport) pair, attribute sets outermost
    pub fn combinations(&self) -> Vec<PotentialConfiguration<'_>> {
        let attributes: Vec<Option<&[AttributeCapabilityRef]>> = if self.attribute_alternatives.is_empty() {
            vec![None]
        } else {
            self.attribute_alternatives.iter().map(|g| Some(g.as_slice())).collect()
        };
        let transports: Vec<Option<&TransportCapabilityRef>> = if self.transport_alternatives.is_empty() {
            vec![None]
        } else {
            self.transport_alternatives.iter().map(Some).collect()
        };

        let mut combinations = Vec::with_capacity(attributes.len() * transports.len());
        for attrs in &attributes {
            for transport in &transports {
                combinations.push(PotentialConfiguration {
                    attributes: *attrs,
                    transport: *transport,
                });
            }
        }
        combinations
    }
}
