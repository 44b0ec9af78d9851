//! Session description input model
//!
//! The graph does not need a full SDP model. It consumes session level
//! attributes and an ordered list of media descriptions, each with its own
//! attributes, and looks them up by name (`acap`, `tcap`, `acfg`, `pcfg`).
//!
//! [`SessionDescription`] can be built directly by an SDP tokenizer, or read
//! from SDP text through [`FromStr`]. The text reader is lenient: it only keeps
//! `m=` and `a=` lines and does not validate anything else.
//!
//! ```
//! use rvoip_capneg_core::SessionDescription;
//!
//! let sdp: SessionDescription = "v=0\r\n\
//!     a=tcap:1 RTP/SAVP\r\n\
//!     m=audio 49170 RTP/AVP 0\r\n\
//!     a=pcfg:1 t=1\r\n".parse().unwrap();
//!
//! assert_eq!(sdp.find_attributes("tcap").len(), 1);
//! assert_eq!(sdp.media_descriptions[0].find_attributes("pcfg").len(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use nom::{
    character::complete::{anychar, char, not_line_ending},
    IResult,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// An SDP attribute line (`a=<name>[:<value>]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdpAttribute {
    /// Attribute name
    pub name: String,
    /// Attribute value, `None` for property attributes such as `a=sendrecv`
    pub value: Option<String>,
}

impl SdpAttribute {
    /// Create an attribute with a value
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Create a property attribute
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Attribute value, or an empty string for property attributes
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl fmt::Display for SdpAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "a={}:{}", self.name, value),
            None => write!(f, "a={}", self.name),
        }
    }
}

impl FromStr for SdpAttribute {
    type Err = Error;

    /// Parse the value of an `a=` line (without the `a=` prefix)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Parser("Empty attribute".to_string()));
        }
        Ok(match s.split_once(':') {
            Some((name, value)) => SdpAttribute::new(name, value),
            None => SdpAttribute::flag(s),
        })
    }
}

/// Filter an attribute list by name
fn filter_attributes<'a>(attributes: &'a [SdpAttribute], name: &str) -> Vec<&'a SdpAttribute> {
    attributes.iter().filter(|a| a.name == name).collect()
}

/// A media description (`m=` line and its attributes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescription {
    /// Media type (audio, video, ...)
    pub media: String,
    /// Transport port
    pub port: u16,
    /// Transport protocol (RTP/AVP, RTP/SAVP, ...)
    pub protocol: String,
    /// Media formats
    pub formats: Vec<String>,
    /// Media level attributes in declaration order
    pub attributes: Vec<SdpAttribute>,
}

impl MediaDescription {
    /// Create a media description without attributes
    pub fn new(media: impl Into<String>, port: u16, protocol: impl Into<String>, formats: Vec<String>) -> Self {
        Self {
            media: media.into(),
            port,
            protocol: protocol.into(),
            formats,
            attributes: Vec::new(),
        }
    }

    /// Add an attribute, builder style
    pub fn with_attribute(mut self, attribute: SdpAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Media level attributes with the given name
    pub fn find_attributes(&self, name: &str) -> Vec<&SdpAttribute> {
        filter_attributes(&self.attributes, name)
    }
}

impl fmt::Display for MediaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={} {} {}", self.media, self.port, self.protocol)?;
        for format in &self.formats {
            write!(f, " {}", format)?;
        }
        f.write_str("\r\n")?;
        for attribute in &self.attributes {
            write!(f, "{}\r\n", attribute)?;
        }
        Ok(())
    }
}

/// Parse the value of an `m=` line
fn parse_media_line(value: &str) -> Result<MediaDescription> {
    let mut fields = value.split_whitespace();
    let media = fields
        .next()
        .ok_or_else(|| Error::Parser("Media line without media type".to_string()))?;
    let port_field = fields
        .next()
        .ok_or_else(|| Error::Parser(format!("Media line '{}' without port", value)))?;
    // Port may carry a port count (49170/2)
    let port = port_field
        .split('/')
        .next()
        .unwrap_or(port_field)
        .parse::<u16>()
        .map_err(|_| Error::Parser(format!("Invalid media port '{}'", port_field)))?;
    let protocol = fields
        .next()
        .ok_or_else(|| Error::Parser(format!("Media line '{}' without protocol", value)))?;
    let formats = fields.map(str::to_string).collect();

    Ok(MediaDescription::new(media, port, protocol, formats))
}

/// A session description as seen by the capability negotiation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// Session level attributes in declaration order
    pub attributes: Vec<SdpAttribute>,
    /// Media descriptions in declaration order, 0-indexed stream positions
    pub media_descriptions: Vec<MediaDescription>,
}

impl SessionDescription {
    /// Create an empty session description
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session level attribute, builder style
    pub fn with_attribute(mut self, attribute: SdpAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a media description, builder style
    pub fn with_media(mut self, media: MediaDescription) -> Self {
        self.media_descriptions.push(media);
        self
    }

    /// Session level attributes with the given name
    pub fn find_attributes(&self, name: &str) -> Vec<&SdpAttribute> {
        filter_attributes(&self.attributes, name)
    }
}

impl fmt::Display for SessionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attribute in &self.attributes {
            write!(f, "{}\r\n", attribute)?;
        }
        for media in &self.media_descriptions {
            write!(f, "{}", media)?;
        }
        Ok(())
    }
}

/// Split one SDP line into its type character and trimmed value
fn sdp_line(input: &str) -> IResult<&str, (char, &str)> {
    let (input, key) = anychar(input)?;
    let (input, _) = char('=')(input)?;
    let (input, value) = not_line_ending(input)?;

    let input = input.trim_start_matches(['\r', '\n']);

    Ok((input, (key, value.trim())))
}

impl FromStr for SessionDescription {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut session = SessionDescription::new();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (_, (key, value)) = sdp_line(line)?;
            match key {
                'm' => session.media_descriptions.push(parse_media_line(value)?),
                'a' => {
                    let attribute: SdpAttribute = value.parse()?;
                    match session.media_descriptions.last_mut() {
                        Some(media) => media.attributes.push(attribute),
                        None => session.attributes.push(attribute),
                    }
                }
                other => debug!("Skipping SDP line type '{}'", other),
            }
        }

        Ok(session)
    }
}
