//! Loading item streams from text sources.
//!
//! Access logs may mix JSON records carrying a `remote_addr` field with
//! plain text lines whose first token is the client address. Lines that do
//! not yield a dotted-quad address are skipped.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

// Shape of a dotted quad. Octet ranges are not checked.
static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("valid ipv4 pattern")
});

#[derive(Debug, Deserialize)]
struct AccessRecord {
    remote_addr: Option<Value>,
}

/// Loads the IPv4 addresses found in `reader`, in order and with
/// duplicates.
pub fn load_ip_addresses<R>(reader: R) -> io::Result<Vec<String>>
where
    R: BufRead,
{
    let mut ips = Vec::new();
    let mut skipped = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        match extract_address(line) {
            Some(ip) if IPV4_PATTERN.is_match(&ip) => ips.push(ip.into_owned()),
            _ => {
                trace!(line = number + 1, "skipping line without address");
                skipped += 1;
            },
        }
    }

    debug!(loaded = ips.len(), skipped, "loaded ip addresses");

    Ok(ips)
}

/// Loads the IPv4 addresses found in the file at `path`.
pub fn load_ip_addresses_from_path<P>(path: P) -> io::Result<Vec<String>>
where
    P: AsRef<Path>,
{
    load_ip_addresses(BufReader::new(File::open(path)?))
}

/// Loads the non-blank lines of `reader` with surrounding whitespace
/// removed.
pub fn load_lines<R>(reader: R) -> io::Result<Vec<String>>
where
    R: BufRead,
{
    let mut lines = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if !line.is_empty() {
            lines.push(line.to_owned());
        }
    }

    Ok(lines)
}

/// Loads every line of the file at `path`, see [`load_lines`].
pub fn load_lines_from_path<P>(path: P) -> io::Result<Vec<String>>
where
    P: AsRef<Path>,
{
    load_lines(BufReader::new(File::open(path)?))
}

// Returns the address candidate of a trimmed, non-empty line.
//
// A JSON object contributes its string `remote_addr`; anything else, or a
// JSON object without one, falls back to the first whitespace token.
fn extract_address(line: &str) -> Option<Cow<'_, str>> {
    if line.starts_with('{') && line.ends_with('}') {
        if let Ok(AccessRecord {
            remote_addr: Some(Value::String(addr)),
        }) = serde_json::from_str::<AccessRecord>(line)
        {
            return Some(Cow::Owned(addr));
        }
    }

    line.split_whitespace().next().map(Cow::Borrowed)
}
