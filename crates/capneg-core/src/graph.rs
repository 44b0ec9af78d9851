//! Potential configuration graph
//!
//! [`PotentialConfigGraph`] holds every capability and configuration of one
//! session description:
//!
//! - attribute and transport capabilities declared at session level, visible
//!   to every stream
//! - attribute and transport capabilities declared on each media line
//! - resolved `acfg`/`pcfg` configurations per stream
//! - configuration lines that could not be resolved, kept as attribute text
//!
//! A graph is either built once from a [`SessionDescription`] with
//! [`PotentialConfigGraph::process`], or assembled incrementally with the
//! `add_*` methods while an answer is being constructed.
//!
//! Capability records are never removed or reordered, so the
//! [`CapabilityKey`] held by a configuration stays valid for the lifetime of
//! the graph. [`PotentialConfigGraph::resolve`] turns a reference back into
//! the record it names.
//!
//! # Examples
//!
//! ```
//! use rvoip_capneg_core::{PotentialConfigGraph, SessionDescription};
//!
//! let sdp: SessionDescription = "v=0\r\n\
//!     a=tcap:1 RTP/SAVP RTP/SAVPF\r\n\
//!     m=audio 7078 RTP/AVP 0\r\n\
//!     a=acap:20 ptime:30\r\n\
//!     a=pcfg:1 a=[20] t=1|2\r\n".parse().unwrap();
//!
//! let graph = PotentialConfigGraph::from_session(&sdp);
//!
//! assert_eq!(graph.global_transport_capabilities().len(), 2);
//! let config = &graph.configs_for(0)[&1];
//! assert_eq!(config.combination_count(), 2);
//!
//! let ptime = graph.resolve(&config.attribute_alternatives[0][0]).unwrap();
//! assert_eq!(ptime.name, "ptime");
//! assert_eq!(graph.free_transport_index(), 3);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::attributes::parse_config;
use crate::capability::{
    AttributeCapability, Capability, CapabilityIndex, CapabilityKey, CapabilityRecord, CapabilityScope,
    ConfigAttribute, ConfigCapabilityRef, ConfigIndex, ConfigKind, StreamIndex,
};
use crate::config::GraphConfig;
use crate::config_parser::{parse_config_line, VisibleCapabilities};
use crate::error::{Error, Result};
use crate::extract::{extract_attribute_capabilities, extract_transport_capabilities};
use crate::index::free_index;
use crate::sdp::{MediaDescription, SessionDescription};

static EMPTY_CONFIGS: BTreeMap<ConfigIndex, ConfigAttribute> = BTreeMap::new();
static EMPTY_UNPARSED: BTreeMap<ConfigIndex, String> = BTreeMap::new();

/// Capability record types stored in the graph
pub trait StoredCapability: CapabilityRecord + Sized {
    /// Look up the record a key points at
    fn lookup<'a>(graph: &'a PotentialConfigGraph, key: &CapabilityKey) -> Option<&'a Self>;
}

impl StoredCapability for AttributeCapability {
    fn lookup<'a>(graph: &'a PotentialConfigGraph, key: &CapabilityKey) -> Option<&'a Self> {
        let records = match key.scope {
            CapabilityScope::Session => graph.global_attr_caps.as_slice(),
            CapabilityScope::Stream(stream) => graph.attribute_capabilities_for(stream),
        };
        records.get(key.slot)
    }
}

impl StoredCapability for Capability {
    fn lookup<'a>(graph: &'a PotentialConfigGraph, key: &CapabilityKey) -> Option<&'a Self> {
        let records = match key.scope {
            CapabilityScope::Session => graph.global_transport_caps.as_slice(),
            CapabilityScope::Stream(stream) => graph.transport_capabilities_for(stream),
        };
        records.get(key.slot)
    }
}

/// Keyed view of the records of one kind visible to a stream, stream first
fn keyed<'a, T>(stream: StreamIndex, local: &'a [T], global: &'a [T]) -> Vec<(CapabilityKey, &'a T)> {
    let local = local
        .iter()
        .enumerate()
        .map(move |(slot, record)| (CapabilityKey::new(CapabilityScope::Stream(stream), slot), record));
    let global = global
        .iter()
        .enumerate()
        .map(|(slot, record)| (CapabilityKey::new(CapabilityScope::Session, slot), record));
    local.chain(global).collect()
}

/// Capabilities and configurations of one session description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PotentialConfigGraph {
    #[serde(skip)]
    config: GraphConfig,
    #[serde(skip)]
    processed: bool,
    global_attr_caps: Vec<AttributeCapability>,
    global_transport_caps: Vec<Capability>,
    stream_attr_caps: BTreeMap<StreamIndex, Vec<AttributeCapability>>,
    stream_transport_caps: BTreeMap<StreamIndex, Vec<Capability>>,
    configs: BTreeMap<StreamIndex, BTreeMap<ConfigIndex, ConfigAttribute>>,
    unparsed_configs: BTreeMap<StreamIndex, BTreeMap<ConfigIndex, String>>,
}

impl PotentialConfigGraph {
    /// Create an empty graph with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with the given configuration
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build a graph from a session description
    ///
    /// A session description that cannot be processed yields an empty graph.
    pub fn from_session(session: &SessionDescription) -> Self {
        let mut graph = Self::new();
        if let Err(e) = graph.process(session) {
            error!("Unable to build potential configuration graph: {}", e);
        }
        graph
    }

    /// Graph configuration
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Populate the graph from a session description
    ///
    /// Runs once per graph. With the default
    /// [`MalformedConfigPolicy`](crate::MalformedConfigPolicy) a malformed
    /// configuration clause leaves the graph empty and is returned as
    /// [`Error::MalformedConfig`].
    pub fn process(&mut self, session: &SessionDescription) -> Result<()> {
        if self.processed {
            warn!("Potential configuration graph already built, ignoring session description");
            return Err(Error::AlreadyProcessed);
        }
        self.processed = true;

        self.global_attr_caps = extract_attribute_capabilities(&session.find_attributes("acap"));
        self.global_transport_caps = extract_transport_capabilities(&session.find_attributes("tcap"));
        debug!(
            "Session declares {} attribute and {} transport capabilities",
            self.global_attr_caps.len(),
            self.global_transport_caps.len()
        );

        for (position, media) in session.media_descriptions.iter().enumerate() {
            let Ok(stream) = StreamIndex::try_from(position) else {
                warn!("Ignoring media description {} and beyond", position);
                break;
            };
            if let Err(e) = self.process_stream(stream, media) {
                self.clear();
                return Err(e);
            }
        }

        Ok(())
    }

    fn process_stream(&mut self, stream: StreamIndex, media: &MediaDescription) -> Result<()> {
        let attr_caps = extract_attribute_capabilities(&media.find_attributes("acap"));
        if !attr_caps.is_empty() {
            self.stream_attr_caps.insert(stream, attr_caps);
        }
        let transport_caps = extract_transport_capabilities(&media.find_attributes("tcap"));
        if !transport_caps.is_empty() {
            self.stream_transport_caps.insert(stream, transport_caps);
        }

        let acfg = media.find_attributes(ConfigKind::Actual.attribute_name());
        let pcfg = media.find_attributes(ConfigKind::Potential.attribute_name());
        if !acfg.is_empty() && !pcfg.is_empty() {
            info!(
                "Stream {} carries both acfg and pcfg attributes, the session description is likely invalid",
                stream
            );
        }

        for (kind, attributes) in ConfigKind::ALL.into_iter().zip([acfg, pcfg]) {
            for attribute in attributes {
                let value = attribute.value_or_empty();
                let line = match parse_config(kind.attribute_name(), value) {
                    Ok(line) => line,
                    Err(e) => {
                        debug!("Skipping {}: {}", attribute, e);
                        continue;
                    }
                };

                let parsed = {
                    let visible = self.visible_capabilities(stream);
                    parse_config_line(stream, &line, &visible)
                };

                match parsed {
                    Ok(Some(config)) => {
                        debug!("Stream {} {} {} resolved", stream, kind, line.id);
                        self.store_config(stream, line.id, config);
                    }
                    Ok(None) => {
                        info!("Stream {} keeps {} {} unparsed", stream, kind, line.id);
                        self.store_unparsed(stream, line.id, format!("a={}:{}", kind, value));
                    }
                    Err(e) if self.config.discards_session_on_malformed_config() => {
                        error!("Discarding capability negotiation of the session description: {}", e);
                        return Err(e);
                    }
                    Err(e) => {
                        error!("Stream {} keeps {} {} unparsed: {}", stream, kind, line.id, e);
                        self.store_unparsed(stream, line.id, format!("a={}:{}", kind, value));
                    }
                }
            }
        }

        Ok(())
    }

    /// Drop every capability and configuration, keeping settings and state
    fn clear(&mut self) {
        self.global_attr_caps.clear();
        self.global_transport_caps.clear();
        self.stream_attr_caps.clear();
        self.stream_transport_caps.clear();
        self.configs.clear();
        self.unparsed_configs.clear();
    }

    /// Unparsed text recorded under the same id is kept for diagnostics
    fn store_config(&mut self, stream: StreamIndex, config_id: ConfigIndex, config: ConfigAttribute) {
        self.configs.entry(stream).or_default().insert(config_id, config);
    }

    /// A resolved configuration under the same id is left in place
    fn store_unparsed(&mut self, stream: StreamIndex, config_id: ConfigIndex, text: String) {
        self.unparsed_configs.entry(stream).or_default().insert(config_id, text);
    }

    /// Keyed capabilities a stream may reference
    pub fn visible_capabilities(&self, stream: StreamIndex) -> VisibleCapabilities<'_> {
        VisibleCapabilities::new(
            keyed(stream, self.attribute_capabilities_for(stream), &self.global_attr_caps),
            keyed(stream, self.transport_capabilities_for(stream), &self.global_transport_caps),
        )
    }

    /// Record a configuration reference points at, if it is still in the graph
    pub fn resolve<T: StoredCapability>(&self, reference: &ConfigCapabilityRef<T>) -> Option<&T> {
        T::lookup(self, &reference.key)
    }

    /// Whether an attribute capability index is used at session or stream level
    pub fn attribute_capability_exists(&self, index: CapabilityIndex) -> bool {
        capability_exists("acap", index, &self.global_attr_caps, &self.stream_attr_caps)
    }

    /// Whether a transport capability index is used at session or stream level
    pub fn transport_capability_exists(&self, index: CapabilityIndex) -> bool {
        capability_exists("tcap", index, &self.global_transport_caps, &self.stream_transport_caps)
    }

    /// Add a session level attribute capability
    ///
    /// Returns `false` and leaves the graph untouched when the index is taken.
    pub fn add_global_attribute_capability(
        &mut self,
        index: CapabilityIndex,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        if self.attribute_capability_exists(index) {
            return false;
        }
        self.global_attr_caps.push(AttributeCapability::new(index, name, value));
        true
    }

    /// Add a session level transport capability
    ///
    /// Returns `false` and leaves the graph untouched when the index is taken.
    pub fn add_global_transport_capability(&mut self, index: CapabilityIndex, value: impl Into<String>) -> bool {
        if self.transport_capability_exists(index) {
            return false;
        }
        self.global_transport_caps.push(Capability::transport(index, value));
        true
    }

    /// Add an attribute capability to a stream
    ///
    /// Returns `false` and leaves the graph untouched when the index is taken.
    pub fn add_attribute_capability_to_stream(
        &mut self,
        stream: StreamIndex,
        index: CapabilityIndex,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        if self.attribute_capability_exists(index) {
            return false;
        }
        self.stream_attr_caps
            .entry(stream)
            .or_default()
            .push(AttributeCapability::new(index, name, value));
        true
    }

    /// Add a transport capability to a stream
    ///
    /// Returns `false` and leaves the graph untouched when the index is taken.
    pub fn add_transport_capability_to_stream(
        &mut self,
        stream: StreamIndex,
        index: CapabilityIndex,
        value: impl Into<String>,
    ) -> bool {
        if self.transport_capability_exists(index) {
            return false;
        }
        self.stream_transport_caps
            .entry(stream)
            .or_default()
            .push(Capability::transport(index, value));
        true
    }

    fn resolve_attribute_group(
        &self,
        stream: StreamIndex,
        config_id: ConfigIndex,
        indices: &[CapabilityIndex],
    ) -> Vec<ConfigCapabilityRef<AttributeCapability>> {
        let visible = self.visible_capabilities(stream);
        indices
            .iter()
            .filter_map(|&index| match visible.attribute_key(index) {
                Some(key) => Some(ConfigCapabilityRef::new(key, true)),
                None => {
                    error!(
                        "Configuration {} of stream {}: no attribute capability {}",
                        config_id, stream, index
                    );
                    None
                }
            })
            .collect()
    }

    fn resolve_transports(
        &self,
        stream: StreamIndex,
        config_id: ConfigIndex,
        indices: &[CapabilityIndex],
    ) -> Vec<ConfigCapabilityRef<Capability>> {
        let visible = self.visible_capabilities(stream);
        indices
            .iter()
            .filter_map(|&index| match visible.transport_key(index) {
                Some(key) => Some(ConfigCapabilityRef::new(key, false)),
                None => {
                    error!(
                        "Configuration {} of stream {}: no transport capability {}",
                        config_id, stream, index
                    );
                    None
                }
            })
            .collect()
    }

    /// Build a configuration from capability indices and store it
    ///
    /// Indices are resolved against the capabilities visible to the stream;
    /// unknown ones are logged and skipped. Any configuration already stored
    /// under `config_id` is replaced, unparsed text under that id is kept.
    pub fn add_config(
        &mut self,
        stream: StreamIndex,
        config_id: ConfigIndex,
        attribute_groups: &[Vec<CapabilityIndex>],
        transport_indices: &[CapabilityIndex],
        delete_media_attributes: bool,
        delete_session_attributes: bool,
    ) {
        let mut config = ConfigAttribute::new(delete_media_attributes, delete_session_attributes);
        config.attribute_alternatives = attribute_groups
            .iter()
            .map(|group| self.resolve_attribute_group(stream, config_id, group))
            .filter(|group| !group.is_empty())
            .collect();
        config.transport_alternatives = self.resolve_transports(stream, config_id, transport_indices);

        self.store_config(stream, config_id, config);
    }

    /// Append an attribute capability set to a configuration
    ///
    /// The configuration is created without delete flags if needed.
    pub fn add_attribute_list_to_config(
        &mut self,
        stream: StreamIndex,
        config_id: ConfigIndex,
        group: &[CapabilityIndex],
    ) {
        let group = self.resolve_attribute_group(stream, config_id, group);
        if group.is_empty() {
            return;
        }
        self.config_entry(stream, config_id).attribute_alternatives.push(group);
    }

    /// Append transport alternatives to a configuration
    ///
    /// The configuration is created without delete flags if needed.
    pub fn add_transport_list_to_config(
        &mut self,
        stream: StreamIndex,
        config_id: ConfigIndex,
        indices: &[CapabilityIndex],
    ) {
        let mut transports = self.resolve_transports(stream, config_id, indices);
        if transports.is_empty() {
            return;
        }
        self.config_entry(stream, config_id).transport_alternatives.append(&mut transports);
    }

    fn config_entry(&mut self, stream: StreamIndex, config_id: ConfigIndex) -> &mut ConfigAttribute {
        self.configs.entry(stream).or_default().entry(config_id).or_default()
    }

    /// Session level attribute capabilities
    pub fn global_attribute_capabilities(&self) -> &[AttributeCapability] {
        &self.global_attr_caps
    }

    /// Session level transport capabilities
    pub fn global_transport_capabilities(&self) -> &[Capability] {
        &self.global_transport_caps
    }

    /// Attribute capabilities of every stream
    pub fn stream_attribute_capabilities(&self) -> &BTreeMap<StreamIndex, Vec<AttributeCapability>> {
        &self.stream_attr_caps
    }

    /// Transport capabilities of every stream
    pub fn stream_transport_capabilities(&self) -> &BTreeMap<StreamIndex, Vec<Capability>> {
        &self.stream_transport_caps
    }

    /// Resolved configurations of every stream
    pub fn all_configs(&self) -> &BTreeMap<StreamIndex, BTreeMap<ConfigIndex, ConfigAttribute>> {
        &self.configs
    }

    /// Unresolved configuration lines of every stream
    pub fn all_unparsed_configs(&self) -> &BTreeMap<StreamIndex, BTreeMap<ConfigIndex, String>> {
        &self.unparsed_configs
    }

    /// Attribute capabilities declared on a stream
    pub fn attribute_capabilities_for(&self, stream: StreamIndex) -> &[AttributeCapability] {
        match self.stream_attr_caps.get(&stream) {
            Some(caps) => caps,
            None => {
                debug!("No attribute capabilities on stream {}", stream);
                &[]
            }
        }
    }

    /// Transport capabilities declared on a stream
    pub fn transport_capabilities_for(&self, stream: StreamIndex) -> &[Capability] {
        match self.stream_transport_caps.get(&stream) {
            Some(caps) => caps,
            None => {
                debug!("No transport capabilities on stream {}", stream);
                &[]
            }
        }
    }

    /// Attribute capabilities a stream may reference: its own, then the session ones
    pub fn all_attribute_capabilities_for(&self, stream: StreamIndex) -> Vec<&AttributeCapability> {
        self.attribute_capabilities_for(stream)
            .iter()
            .chain(self.global_attr_caps.iter())
            .collect()
    }

    /// Transport capabilities a stream may reference: its own, then the session ones
    pub fn all_transport_capabilities_for(&self, stream: StreamIndex) -> Vec<&Capability> {
        self.transport_capabilities_for(stream)
            .iter()
            .chain(self.global_transport_caps.iter())
            .collect()
    }

    /// Resolved configurations of a stream, keyed by configuration number
    pub fn configs_for(&self, stream: StreamIndex) -> &BTreeMap<ConfigIndex, ConfigAttribute> {
        self.configs.get(&stream).unwrap_or(&EMPTY_CONFIGS)
    }

    /// Unresolved configuration lines of a stream, keyed by configuration number
    pub fn unparsed_configs_for(&self, stream: StreamIndex) -> &BTreeMap<ConfigIndex, String> {
        self.unparsed_configs.get(&stream).unwrap_or(&EMPTY_UNPARSED)
    }

    /// Unused transport capability index
    pub fn free_transport_index(&self) -> CapabilityIndex {
        let stream_indices = self.stream_transport_caps.values().flatten().map(|c| c.index);
        free_index(self.global_transport_caps.iter().map(|c| c.index).chain(stream_indices))
    }

    /// Unused attribute capability index
    pub fn free_attribute_index(&self) -> CapabilityIndex {
        let stream_indices = self.stream_attr_caps.values().flatten().map(|c| c.index);
        free_index(self.global_attr_caps.iter().map(|c| c.index).chain(stream_indices))
    }

    /// Unused configuration number on a stream
    pub fn free_config_index(&self, stream: StreamIndex) -> ConfigIndex {
        free_index(
            self.configs_for(stream)
                .keys()
                .chain(self.unparsed_configs_for(stream).keys())
                .copied(),
        )
    }

    /// True when the graph holds no capability and no configuration
    pub fn is_empty(&self) -> bool {
        self.global_attr_caps.is_empty()
            && self.global_transport_caps.is_empty()
            && self.stream_attr_caps.is_empty()
            && self.stream_transport_caps.is_empty()
            && self.configs.is_empty()
            && self.unparsed_configs.is_empty()
    }

    /// JSON dump of the graph contents for diagnostics
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn capability_exists<T: CapabilityRecord>(
    name: &str,
    index: CapabilityIndex,
    global: &[T],
    streams: &BTreeMap<StreamIndex, Vec<T>>,
) -> bool {
    let in_global = global.iter().any(|c| c.index() == index);
    let in_stream = streams.values().flatten().any(|c| c.index() == index);
    if in_global && in_stream {
        error!(
            "Capability {} {} declared at both session and stream level, graph may be corrupted",
            name, index
        );
    }
    in_global || in_stream
}
