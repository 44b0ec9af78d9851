//! Configuration line parser
//!
//! Resolves the clauses of one `a=acfg`/`a=pcfg` attribute against the
//! capabilities visible to a stream. The clause grammar is small:
//!
//! ```text
//! clause        := kind "=" [delete-prefix ":"] alt-group *("|" alt-group)
//! alt-group     := token *("," token)
//! token         := ["["] digits ["]"]
//! delete-prefix := "-" ("m" | "s" | "ms")
//! ```
//!
//! `a` clauses list attribute capability sets, `t` clauses list transport
//! protocols, any other kind is an extension and is skipped. A `[` opens a
//! run of optional capabilities which the token carrying `]` closes. The run
//! may span alternative groups.
//!
//! Resolution rules:
//!
//! - an attribute clause with any unresolvable token fails as a whole
//! - a transport group that is unresolvable or has more than one member is
//!   dropped, the clause fails only when no group survives and one of them
//!   was unresolvable
//! - the first clause of a kind wins, later ones are logged and ignored
//! - a line with a failed clause, or with nothing resolved, yields `None` so
//!   the caller can keep it as unparsed text
//! - a clause without `=` is an error for the whole line

use nom::{
    bytes::complete::take_till,
    character::complete::digit1,
    sequence::preceded,
    IResult,
};
use tracing::{debug, error, warn};

use crate::attributes::ConfigLineAttribute;
use crate::capability::{
    AttributeCapability, AttributeCapabilityRef, Capability, CapabilityIndex, CapabilityKey, CapabilityKind,
    CapabilityRecord, ConfigAttribute, ConfigCapabilityRef, StreamIndex, TransportCapabilityRef,
};
use crate::error::{Error, Result};

/// Capabilities a stream may reference, stream-local ones first
#[derive(Debug, Default, Clone)]
pub struct VisibleCapabilities<'a> {
    attributes: Vec<(CapabilityKey, &'a AttributeCapability)>,
    transports: Vec<(CapabilityKey, &'a Capability)>,
}

impl<'a> VisibleCapabilities<'a> {
    /// Create a view from keyed capability records
    pub fn new(
        attributes: Vec<(CapabilityKey, &'a AttributeCapability)>,
        transports: Vec<(CapabilityKey, &'a Capability)>,
    ) -> Self {
        Self { attributes, transports }
    }

    /// Key of the first attribute capability with the given index
    pub fn attribute_key(&self, index: CapabilityIndex) -> Option<CapabilityKey> {
        find_key(&self.attributes, index)
    }

    /// Key of the first transport capability with the given index
    pub fn transport_key(&self, index: CapabilityIndex) -> Option<CapabilityKey> {
        find_key(&self.transports, index)
    }
}

fn find_key<T: CapabilityRecord>(records: &[(CapabilityKey, &T)], index: CapabilityIndex) -> Option<CapabilityKey> {
    records.iter().find(|(_, record)| record.index() == index).map(|(key, _)| *key)
}

/// One token of an index list after bracket tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexToken {
    index: Option<CapabilityIndex>,
    mandatory: bool,
}

/// Optional-run tracking across the tokens of a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BracketState {
    Mandatory,
    Optional,
}

impl BracketState {
    fn advance(&mut self, token: &str) -> IndexToken {
        if token.contains('[') {
            *self = BracketState::Optional;
        }
        let mandatory = *self == BracketState::Mandatory;
        if token.contains(']') {
            *self = BracketState::Mandatory;
        }
        IndexToken {
            index: leading_index(token),
            mandatory,
        }
    }
}

/// First run of decimal digits in a token
fn leading_index(token: &str) -> Option<CapabilityIndex> {
    let parsed: IResult<&str, &str> = preceded(take_till(|c: char| c.is_ascii_digit()), digit1)(token);
    parsed.ok().and_then(|(_, digits)| digits.parse().ok())
}

/// Split an index list into alternative groups of tokens
fn scan_index_list(list: &str) -> Vec<Vec<IndexToken>> {
    list.split('|')
        .scan(BracketState::Mandatory, |state, group| {
            Some(group.split(',').map(|token| state.advance(token)).collect::<Vec<_>>())
        })
        .collect()
}

/// Attribute clause after resolution
#[derive(Debug)]
struct AttributeClause {
    groups: Vec<Vec<AttributeCapabilityRef>>,
    delete_media_attributes: bool,
    delete_session_attributes: bool,
}

fn resolve_attribute_clause(
    prefix: Option<&str>,
    list: &str,
    visible: &VisibleCapabilities<'_>,
) -> Option<AttributeClause> {
    let mut groups = Vec::new();
    for group in scan_index_list(list) {
        let refs: Option<Vec<AttributeCapabilityRef>> = group
            .iter()
            .map(|token| {
                token
                    .index
                    .and_then(|index| visible.attribute_key(index))
                    .map(|key| ConfigCapabilityRef::new(key, token.mandatory))
            })
            .collect();

        match refs {
            Some(refs) => groups.push(refs),
            None => {
                debug!("Attribute list '{}' references an unknown capability", list);
                return None;
            }
        }
    }

    let prefix = prefix.unwrap_or_default();
    Some(AttributeClause {
        groups,
        delete_media_attributes: prefix.contains('m'),
        delete_session_attributes: prefix.contains('s'),
    })
}

fn resolve_transport_clause(list: &str, visible: &VisibleCapabilities<'_>) -> Option<Vec<TransportCapabilityRef>> {
    let mut unresolved = false;
    let alternatives: Vec<TransportCapabilityRef> = scan_index_list(list)
        .into_iter()
        .filter_map(|group| match group.as_slice() {
            [token] => {
                let resolved = token
                    .index
                    .and_then(|index| visible.transport_key(index))
                    .map(|key| ConfigCapabilityRef::new(key, token.mandatory));
                if resolved.is_none() {
                    debug!("Transport list '{}' references an unknown capability", list);
                    unresolved = true;
                }
                resolved
            }
            group => {
                warn!(
                    "Dropping transport alternative with {} protocols in '{}', exactly one is allowed",
                    group.len(),
                    list
                );
                None
            }
        })
        .collect();

    // Oversized groups alone never fail the clause
    if alternatives.is_empty() && unresolved {
        None
    } else {
        Some(alternatives)
    }
}

/// Accumulated result of the clauses of one line
#[derive(Debug, Default)]
struct LineState {
    attributes: Option<AttributeClause>,
    transports: Option<Vec<TransportCapabilityRef>>,
    seen_attribute: bool,
    seen_transport: bool,
    failed: bool,
}

impl LineState {
    fn into_config(self) -> Option<ConfigAttribute> {
        if self.failed {
            return None;
        }

        let mut config = ConfigAttribute::default();
        if let Some(attributes) = self.attributes {
            config.attribute_alternatives = attributes.groups;
            config.delete_media_attributes = attributes.delete_media_attributes;
            config.delete_session_attributes = attributes.delete_session_attributes;
        }
        if let Some(transports) = self.transports {
            config.transport_alternatives = transports;
        }

        if config.is_empty() {
            None
        } else {
            Some(config)
        }
    }
}

/// Resolve one configuration line for `stream`
///
/// Returns `Ok(None)` when the line cannot be turned into a configuration and
/// should be kept as unparsed text, and `Err(Error::MalformedConfig)` when a
/// clause is not shaped like `<kind>=<body>`.
pub fn parse_config_line(
    stream: StreamIndex,
    line: &ConfigLineAttribute,
    visible: &VisibleCapabilities<'_>,
) -> Result<Option<ConfigAttribute>> {
    let state = line.clauses.iter().try_fold(LineState::default(), |mut state, clause| {
        let (Some((tag, _)), Some((_, body))) = (clause.split_once('='), clause.rsplit_once('=')) else {
            error!("Configuration {} of stream {} has malformed clause '{}'", line.id, stream, clause);
            return Err(Error::MalformedConfig {
                stream,
                config: line.id,
                clause: clause.clone(),
            });
        };

        let (prefix, list) = match body.split_once(':') {
            Some((prefix, list)) => (Some(prefix), list),
            None => (None, body),
        };

        match CapabilityKind::from_clause_tag(tag) {
            CapabilityKind::Attribute if state.seen_attribute => {
                error!("Configuration {} of stream {} repeats the attribute clause '{}'", line.id, stream, clause);
            }
            CapabilityKind::Attribute => {
                state.seen_attribute = true;
                state.attributes = resolve_attribute_clause(prefix, list, visible);
                state.failed |= state.attributes.is_none();
            }
            CapabilityKind::TransportProtocol if state.seen_transport => {
                error!("Configuration {} of stream {} repeats the transport clause '{}'", line.id, stream, clause);
            }
            CapabilityKind::TransportProtocol => {
                if prefix.is_some() {
                    debug!("Ignoring delete prefix on transport clause '{}'", clause);
                }
                state.seen_transport = true;
                state.transports = resolve_transport_clause(list, visible);
                state.failed |= state.transports.is_none();
            }
            CapabilityKind::Extended => {
                debug!("Ignoring extension clause '{}'", clause);
            }
        }

        Ok(state)
    })?;

    Ok(state.into_config())
}
