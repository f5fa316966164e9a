//! Packet input file parsing.
//!
//! The input is a comma-separated flat file with a header line, one
//! packet per subsequent line: `id,source,destination,port,ttl`. Tokens
//! are whitespace-trimmed. Malformed lines are reported with their line
//! number rather than silently skipped.

use std::path::Path;

use routesim_core::{AddressError, Ipv4Address, Packet, PacketId};

use crate::error::NodeError;

/// Errors from parsing the packet input file.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("line {line}: expected 5 fields (id,source,destination,port,ttl), got {actual}")]
    FieldCount { line: usize, actual: usize },
    #[error("line {line}: invalid packet id")]
    InvalidId { line: usize },
    #[error("line {line}: packet id 0 is reserved and must not appear in input")]
    ReservedId { line: usize },
    #[error("line {line}: invalid {which} address: {source}")]
    InvalidAddress {
        line: usize,
        which: &'static str,
        source: AddressError,
    },
    #[error("line {line}: invalid port")]
    InvalidPort { line: usize },
    #[error("line {line}: invalid TTL (must be 1-255)")]
    InvalidTtl { line: usize },
}

/// Parse one data line into a packet. `line` is 1-based, for reporting.
pub fn parse_packet_line(text: &str, line: usize) -> Result<Packet, InputError> {
    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    if fields.len() != 5 {
        return Err(InputError::FieldCount {
            line,
            actual: fields.len(),
        });
    }

    let id: u64 = fields[0]
        .parse()
        .map_err(|_| InputError::InvalidId { line })?;
    if id == 0 {
        return Err(InputError::ReservedId { line });
    }

    let source: Ipv4Address = fields[1].parse().map_err(|source| InputError::InvalidAddress {
        line,
        which: "source",
        source,
    })?;
    let destination: Ipv4Address =
        fields[2].parse().map_err(|source| InputError::InvalidAddress {
            line,
            which: "destination",
            source,
        })?;

    let port: u16 = fields[3]
        .parse()
        .map_err(|_| InputError::InvalidPort { line })?;

    // TTL starts positive; a packet born dead is an input error.
    let ttl: u8 = fields[4]
        .parse()
        .map_err(|_| InputError::InvalidTtl { line })?;
    if ttl == 0 {
        return Err(InputError::InvalidTtl { line });
    }

    Ok(Packet::new(PacketId::new(id), source, destination, port, ttl))
}

/// Parse a whole packet file body. The first line is a header and is
/// skipped; blank lines are ignored.
pub fn read_packets_from_str(content: &str) -> Result<Vec<Packet>, InputError> {
    let mut packets = Vec::new();
    for (i, text) in content.lines().enumerate() {
        if i == 0 || text.trim().is_empty() {
            continue;
        }
        packets.push(parse_packet_line(text, i + 1)?);
    }
    Ok(packets)
}

/// Read and parse the packet input file at `path`.
pub fn read_packets(path: &Path) -> Result<Vec<Packet>, NodeError> {
    let content = std::fs::read_to_string(path)?;
    let packets = read_packets_from_str(&content)?;
    tracing::info!(count = packets.len(), path = %path.display(), "loaded packets");
    Ok(packets)
}
