// ── Token and list parsing ──
//
// Daemon replies are whitespace-separated tokens: one record per token
// for scalar lists, `|`-delimited fields for interface records, and
// `key=value` pairs for session info. Every list operation goes through
// the same tokenize-then-decode path: `parse_list` for homogeneous
// record lists, `fold_tokens` for a single record built from many
// tokens. Malformed items are logged and skipped.

use thiserror::Error;
use tracing::warn;

use crate::model::{GroupInfo, IfaceInfo, MacAddress, MacParseError, SessionInfo, SessionState};
use crate::proto;

/// Most tokens accepted from a single reply or notification.
pub const MAX_TOKENS: usize = 256;

/// A single token or field could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no '=' in token {token:?}")]
    MissingSeparator { token: String },

    #[error("invalid unsigned integer {text:?}")]
    InvalidNumber { text: String },

    #[error(transparent)]
    Mac(#[from] MacParseError),

    #[error("unknown {what} {value:?}")]
    Unknown { what: &'static str, value: String },

    #[error("record {record:?} has no {field} field")]
    MissingField { record: String, field: &'static str },

    #[error("record {record:?} has a bad {field} field: {reason}")]
    BadField {
        record: String,
        field: &'static str,
        reason: String,
    },
}

/// The reply as a whole could not be turned into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("more than {limit} tokens in one reply")]
    Overflow { limit: usize },

    #[error("cannot reserve space for {count} items")]
    Alloc { count: usize },
}

// ── Codec primitives ────────────────────────────────────────────────

/// Split `buf` into its non-empty whitespace-delimited tokens.
pub fn tokenize(buf: &str) -> Result<Vec<&str>, ListError> {
    let mut tokens = Vec::new();
    for token in buf.split_ascii_whitespace() {
        if tokens.len() == MAX_TOKENS {
            return Err(ListError::Overflow { limit: MAX_TOKENS });
        }
        tokens.push(token);
    }
    Ok(tokens)
}

/// Split `key=value` at the first `=`. Leading blanks of the value are dropped.
pub fn split_key_value(token: &str) -> Result<(&str, &str), ParseError> {
    token
        .split_once('=')
        .map(|(key, value)| (key, value.trim_start_matches([' ', '\t'])))
        .ok_or_else(|| ParseError::MissingSeparator {
            token: token.to_owned(),
        })
}

/// Parse an unsigned integer the way C's `strtoul(s, _, 0)` reads it:
/// decimal, `0x` hex or leading-`0` octal. Negative values, overflow and
/// trailing garbage are errors rather than wrapping.
pub fn parse_ulong(text: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        text: text.to_owned(),
    };

    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, unsigned.trim_start_matches('0'))
    } else {
        (10, unsigned)
    };

    if radix == 8 && digits.is_empty() {
        // "00", "000": all zeros.
        return Ok(0);
    }
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    u64::from_str_radix(digits, radix).map_err(|_| invalid())
}

/// [`parse_ulong`] narrowed to 32 bits.
pub fn parse_u32(text: &str) -> Result<u32, ParseError> {
    let value = parse_ulong(text)?;
    u32::try_from(value).map_err(|_| ParseError::InvalidNumber {
        text: text.to_owned(),
    })
}

// ── Generic list parser ─────────────────────────────────────────────

/// Decode every token of `buf` with `item`, in order.
///
/// Capacity is reserved for exactly as many items as there are tokens;
/// an empty reply allocates nothing. Tokens that `item` rejects are
/// logged and skipped, so the result can be shorter than the token count.
pub fn parse_list<T, F>(buf: &str, mut item: F) -> Result<Vec<T>, ListError>
where
    F: FnMut(&str) -> Result<T, ParseError>,
{
    let tokens = tokenize(buf)?;
    let mut items = Vec::new();
    if tokens.is_empty() {
        return Ok(items);
    }

    items
        .try_reserve_exact(tokens.len())
        .map_err(|_| ListError::Alloc {
            count: tokens.len(),
        })?;

    for token in tokens {
        match item(token) {
            Ok(value) => items.push(value),
            Err(e) => warn!(token, error = %e, "skipping unparsable list item"),
        }
    }
    Ok(items)
}

/// Feed every token of `buf` into one accumulated record.
pub fn fold_tokens<A, F>(buf: &str, acc: &mut A, mut apply: F) -> Result<(), ListError>
where
    F: FnMut(&mut A, &str) -> Result<(), ParseError>,
{
    for token in tokenize(buf)? {
        if let Err(e) = apply(acc, token) {
            warn!(token, error = %e, "skipping unparsable token");
        }
    }
    Ok(())
}

// ── Record parsers ──────────────────────────────────────────────────

pub fn parse_group(token: &str) -> Result<GroupInfo, ParseError> {
    Ok(GroupInfo {
        id: token.to_owned(),
    })
}

pub fn parse_session_id(token: &str) -> Result<u32, ParseError> {
    parse_u32(token)
}

pub fn parse_mac(token: &str) -> Result<MacAddress, ParseError> {
    Ok(token.parse()?)
}

/// Decode `name|addr|priority|llt`. Every field is required.
pub fn parse_iface(token: &str) -> Result<IfaceInfo, ParseError> {
    let mut fields = token.split('|');
    let mut next = |field: &'static str| {
        fields
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| ParseError::MissingField {
                record: token.to_owned(),
                field,
            })
    };
    let bad = |field: &'static str, e: ParseError| ParseError::BadField {
        record: token.to_owned(),
        field,
        reason: e.to_string(),
    };

    let name = next("name")?.to_owned();
    let addr = parse_mac(next("addr")?).map_err(|e| bad("addr", e))?;
    let priority = parse_u32(next("priority")?).map_err(|e| bad("priority", e))?;
    let llt = parse_u32(next("llt")?).map_err(|e| bad("llt", e))?;

    Ok(IfaceInfo {
        name,
        addr,
        priority,
        llt,
    })
}

/// Apply one `key=value` token of a `SESSION_GET` reply.
///
/// `NONE` values leave the field untouched. A bad value is an error for
/// this token only; the field keeps its default.
pub fn apply_session_field(info: &mut SessionInfo, token: &str) -> Result<(), ParseError> {
    let (key, value) = split_key_value(token)?;
    if value == proto::VALUE_NONE {
        return Ok(());
    }

    match key {
        proto::KEY_OLD_PEER_ADDR => info.old_peer_addr = Some(parse_mac(value)?),
        proto::KEY_NEW_PEER_ADDR => info.new_peer_addr = Some(parse_mac(value)?),
        proto::KEY_OLD_IFNAME => info.old_ifname = Some(value.to_owned()),
        proto::KEY_NEW_IFNAME => info.new_ifname = Some(value.to_owned()),
        proto::KEY_LLT => info.llt = parse_u32(value)?,
        proto::KEY_STATE => info.state = Some(parse_state(value)?),
        _ => {
            return Err(ParseError::Unknown {
                what: "session parameter",
                value: key.to_owned(),
            });
        }
    }
    Ok(())
}

pub fn parse_state(value: &str) -> Result<SessionState, ParseError> {
    value.parse().map_err(|_| ParseError::Unknown {
        what: "session state",
        value: value.to_owned(),
    })
}
