//! Protocol constants: versions and header names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request header carrying the signed token (client to site).
pub const CLIENT_HEADER_NAME: &str = "X-Better-Web-Hello";

/// Response header or meta tag carrying the site identifier (site to client).
pub const SERVER_HEADER_NAME: &str = "X-Better-Web-Welcome";

/// Protocol versions understood by this implementation.
///
/// A version byte outside this set makes a token unusable. New versions are
/// added here together with any layout or registry change they introduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProtocolVersion {
    V1 = 1,
}

impl ProtocolVersion {
    /// The version new tokens and welcome headers are written with.
    pub const CURRENT: Self = Self::V1;

    /// All supported versions.
    pub const ALL: [Self; 1] = [Self::V1];

    /// Parse from the wire byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.to_u8() == value)
    }

    /// Convert to the wire byte.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u8())
    }
}

/// CGI-style name under which a server exposes a request header,
/// e.g. `HTTP_X_BETTER_WEB_HELLO`.
pub fn cgi_header_name(header: &str) -> String {
    let mut name = String::with_capacity(header.len() + 5);
    name.push_str("HTTP_");
    for c in header.chars() {
        name.push(if c == '-' { '_' } else { c.to_ascii_uppercase() });
    }
    name
}
