//! Capability negotiation attribute parsers
//!
//! Typed views over the values of the RFC 5939 attributes:
//!
//! - `a=acap:<id> <name>[:<value>]`
//! - `a=tcap:<id> <proto> *(SP <proto>)`
//! - `a=acfg:<id> <clauses>` and `a=pcfg:<id> <clauses>`
//!
//! Only the id and the coarse layout are read here. The clauses of a
//! configuration are interpreted later against the capabilities visible to
//! the stream.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1, space0, space1},
    combinator::{map_res, opt, rest},
    multi::separated_list1,
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::capability::{CapabilityIndex, ConfigIndex};
use crate::error::{Error, Result};

/// Value of an `a=acap` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcapAttribute {
    /// Declared capability number
    pub id: CapabilityIndex,
    /// Name of the SDP attribute the capability stands for
    pub name: String,
    /// Value of that attribute, empty for property attributes
    pub value: String,
}

/// Value of an `a=tcap` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcapAttribute {
    /// Capability number of the first protocol
    pub id: CapabilityIndex,
    /// Transport protocols, numbered consecutively from `id`
    pub protocols: Vec<String>,
}

/// Value of an `a=acfg` or `a=pcfg` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigLineAttribute {
    /// Configuration number
    pub id: ConfigIndex,
    /// Whitespace separated clauses (`a=...`, `t=...`)
    pub clauses: Vec<String>,
}

/// Parse a non-zero length decimal number into a u32
fn parse_number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

/// Parse a run of non-whitespace characters
fn parse_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// Parse an attribute name (stops at ':' or whitespace)
fn parse_attribute_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ':' && !c.is_whitespace())(input)
}

fn acap(input: &str) -> IResult<&str, AcapAttribute> {
    let (input, _) = space0(input)?;
    let (input, id) = parse_number(input)?;
    let (input, _) = space1(input)?;
    let (input, name) = parse_attribute_name(input)?;
    let (input, value) = opt(preceded(char(':'), rest))(input)?;

    Ok((
        input,
        AcapAttribute {
            id,
            name: name.to_string(),
            value: value.map(str::trim).unwrap_or_default().to_string(),
        },
    ))
}

fn tcap(input: &str) -> IResult<&str, TcapAttribute> {
    let (input, _) = space0(input)?;
    let (input, id) = parse_number(input)?;
    let (input, _) = space1(input)?;
    let (input, protocols) = separated_list1(space1, parse_word)(input)?;
    let (input, _) = space0(input)?;

    Ok((
        input,
        TcapAttribute {
            id,
            protocols: protocols.into_iter().map(str::to_string).collect(),
        },
    ))
}

fn config_line(input: &str) -> IResult<&str, ConfigLineAttribute> {
    let (input, _) = space0(input)?;
    let (input, id) = parse_number(input)?;
    let (input, clauses) = rest(input)?;

    // An id glued to its first clause ("1a=1") is not a config line
    if !clauses.is_empty() && !clauses.starts_with(char::is_whitespace) {
        return Err(nom::Err::Error(nom::error::Error::new(
            clauses,
            nom::error::ErrorKind::Space,
        )));
    }

    Ok((
        "",
        ConfigLineAttribute {
            id,
            clauses: clauses.split_whitespace().map(str::to_string).collect(),
        },
    ))
}

/// Parse the value of an `a=acap` attribute
///
/// The capability value is everything after the first `:` that follows the
/// name, so values carrying colons of their own survive intact.
///
/// # Examples
///
/// ```
/// use rvoip_capneg_core::attributes::parse_acap;
///
/// let acap = parse_acap("59 crypto:10 MS_AES_256_SHA1_80 inline:HjdHIU446fe64hnu6K446rkyMjA7fQp9CnVubGVz|2^20|1:4").unwrap();
/// assert_eq!(acap.id, 59);
/// assert_eq!(acap.name, "crypto");
/// assert!(acap.value.ends_with("|2^20|1:4"));
/// ```
pub fn parse_acap(value: &str) -> Result<AcapAttribute> {
    match acap(value) {
        Ok((_, attribute)) => Ok(attribute),
        Err(e) => Err(Error::invalid_attribute("acap", format!("'{}': {}", value, e))),
    }
}

/// Parse the value of an `a=tcap` attribute
///
/// # Examples
///
/// ```
/// use rvoip_capneg_core::attributes::parse_tcap;
///
/// let tcap = parse_tcap("1 RTP/SAVP RTP/SAVPF").unwrap();
/// assert_eq!(tcap.id, 1);
/// assert_eq!(tcap.protocols, vec!["RTP/SAVP", "RTP/SAVPF"]);
/// ```
pub fn parse_tcap(value: &str) -> Result<TcapAttribute> {
    match tcap(value) {
        Ok(("", attribute)) => Ok(attribute),
        Ok((remaining, _)) => Err(Error::invalid_attribute(
            "tcap",
            format!("'{}': unexpected trailing input '{}'", value, remaining),
        )),
        Err(e) => Err(Error::invalid_attribute("tcap", format!("'{}': {}", value, e))),
    }
}

/// Parse the value of an `a=acfg` or `a=pcfg` attribute
///
/// `name` is only used to label errors.
pub fn parse_config(name: &str, value: &str) -> Result<ConfigLineAttribute> {
    match config_line(value) {
        Ok((_, attribute)) => Ok(attribute),
        Err(e) => Err(Error::invalid_attribute(name, format!("'{}': {}", value, e))),
    }
}
