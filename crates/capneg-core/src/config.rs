//! Configuration for potential configuration graph building
//!
//! The graph is mostly free of knobs: capability extraction and index
//! resolution follow RFC 5939 directly. The one behaviour callers may want to
//! choose is what happens when a configuration clause is not even shaped like
//! `<kind>=<body>`.
//!
//! ```rust
//! use rvoip_capneg_core::{GraphConfig, MalformedConfigPolicy, PotentialConfigGraph};
//!
//! let config = GraphConfig::new()
//!     .with_malformed_config_policy(MalformedConfigPolicy::DiscardLine);
//!
//! let graph = PotentialConfigGraph::with_config(config);
//! assert!(graph.is_empty());
//! ```

use serde::{Deserialize, Serialize};

/// What to do with a configuration clause that has no `=` separator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedConfigPolicy {
    /// Drop every capability gathered from the session description and
    /// report the error to the caller.
    #[default]
    DiscardSession,
    /// Keep the offending line as an unparsed configuration and carry on
    /// with the rest of the session description.
    DiscardLine,
}

/// Graph building configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Handling of malformed `acfg`/`pcfg` clauses
    #[serde(default)]
    pub malformed_config_policy: MalformedConfigPolicy,
}

impl GraphConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the malformed configuration policy
    pub fn with_malformed_config_policy(mut self, policy: MalformedConfigPolicy) -> Self {
        self.malformed_config_policy = policy;
        self
    }

    /// Whether a malformed clause aborts the whole session description
    pub fn discards_session_on_malformed_config(&self) -> bool {
        self.malformed_config_policy == MalformedConfigPolicy::DiscardSession
    }
}
