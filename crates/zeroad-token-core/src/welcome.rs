//! The `X-Better-Web-Welcome` header: `client_id^version^bitmask`.
//!
//! Sent by a site to announce which client id and features it honours. It
//! carries no secret and is deliberately unsigned: a forged value can only
//! misrepresent a site to its own visitor's extension.

use std::fmt;

use crate::error::WelcomeError;
use crate::features::FeatureSet;
use crate::protocol::ProtocolVersion;

/// Separator between the three parts.
pub const SEPARATOR: char = '^';

/// A parsed welcome header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeHeader {
    pub client_id: String,
    pub version: ProtocolVersion,
    /// Registered features only; unknown bits are dropped while parsing.
    pub features: FeatureSet,
}

impl fmt::Display for WelcomeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.client_id,
            self.version,
            self.features.bits()
        )
    }
}

/// Check a site client id for use in the welcome header.
pub fn validate_client_id(client_id: &str) -> Result<(), WelcomeError> {
    if client_id.is_empty() {
        return Err(WelcomeError::EmptyClientId);
    }
    if client_id.contains(SEPARATOR) {
        return Err(WelcomeError::ClientIdContainsSeparator);
    }
    Ok(())
}

/// Build the header value for the current protocol version.
pub fn encode_welcome_header(
    client_id: &str,
    features: FeatureSet,
) -> Result<String, WelcomeError> {
    validate_client_id(client_id)?;
    let unknown = features.bits() & !FeatureSet::all().bits();
    if unknown != 0 {
        return Err(WelcomeError::UnknownFeatureBits(unknown));
    }
    if features.is_empty() {
        return Err(WelcomeError::NoFeatures);
    }

    let header = WelcomeHeader {
        client_id: client_id.to_owned(),
        version: ProtocolVersion::CURRENT,
        features,
    };
    Ok(header.to_string())
}

/// Parse a header value.
pub fn decode_welcome_header(value: &str) -> Result<WelcomeHeader, WelcomeError> {
    let parts: Vec<&str> = value.split(SEPARATOR).collect();
    let &[client_id, version, bitmask] = parts.as_slice() else {
        return Err(WelcomeError::PartCount(parts.len()));
    };

    if client_id.is_empty() {
        return Err(WelcomeError::EmptyClientId);
    }

    let version = parse_decimal(version)
        .and_then(|v| u8::try_from(v).ok())
        .and_then(ProtocolVersion::from_u8)
        .ok_or_else(|| WelcomeError::InvalidVersion(version.to_owned()))?;

    let bits = parse_decimal(bitmask)
        .ok_or_else(|| WelcomeError::InvalidBitmask(bitmask.to_owned()))?;

    Ok(WelcomeHeader {
        client_id: client_id.to_owned(),
        version,
        features: FeatureSet::from_bits_truncate(bits),
    })
}

/// Parse a canonical non-negative decimal: digits only, no sign, no
/// leading zero except for `"0"` itself.
fn parse_decimal(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;
    use proptest::prelude::*;

    #[test]
    fn test_encode() {
        let value = encode_welcome_header("partner-001", FeatureSet::all()).unwrap();
        assert_eq!(value, "partner-001^1^3");

        let value = encode_welcome_header("abc", Feature::OnePass.into()).unwrap();
        assert_eq!(value, "abc^1^2");
    }

    #[test]
    fn test_encode_rejects_invalid_input() {
        assert_eq!(
            encode_welcome_header("", FeatureSet::all()),
            Err(WelcomeError::EmptyClientId)
        );
        assert_eq!(
            encode_welcome_header("a^b", FeatureSet::all()),
            Err(WelcomeError::ClientIdContainsSeparator)
        );
        assert_eq!(
            encode_welcome_header("abc", FeatureSet::EMPTY),
            Err(WelcomeError::NoFeatures)
        );
        assert_eq!(
            encode_welcome_header("abc", FeatureSet::from_bits(0b100)),
            Err(WelcomeError::UnknownFeatureBits(0b100))
        );
        assert_eq!(
            encode_welcome_header("abc", FeatureSet::from_bits(0b101)),
            Err(WelcomeError::UnknownFeatureBits(0b100))
        );
    }

    #[test]
    fn test_decode() {
        let header = decode_welcome_header("partner-001^1^3").unwrap();
        assert_eq!(header.client_id, "partner-001");
        assert_eq!(header.version, ProtocolVersion::V1);
        assert_eq!(header.features.iter().collect::<Vec<_>>(), Feature::ALL.to_vec());
    }

    #[test]
    fn test_decode_drops_unknown_bits() {
        let header = decode_welcome_header("abc^1^6").unwrap();
        assert_eq!(header.features, Feature::OnePass.into());
        assert_eq!(header.to_string(), "abc^1^2");
    }

    #[test]
    fn test_decode_part_count() {
        assert_eq!(decode_welcome_header("abc^1"), Err(WelcomeError::PartCount(2)));
        assert_eq!(decode_welcome_header("a^b^1^3"), Err(WelcomeError::PartCount(4)));
        assert_eq!(decode_welcome_header(""), Err(WelcomeError::PartCount(1)));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        for version in ["2", "0", "99", "", "x", "+1", "01", "256"] {
            let value = format!("abc^{version}^1");
            assert!(
                matches!(decode_welcome_header(&value), Err(WelcomeError::InvalidVersion(_))),
                "version {version:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_rejects_non_canonical_bitmask() {
        for bitmask in ["", "-1", "+3", "03", "3.0", " 3", "0x3", "4294967296"] {
            let value = format!("abc^1^{bitmask}");
            assert!(
                matches!(decode_welcome_header(&value), Err(WelcomeError::InvalidBitmask(_))),
                "bitmask {bitmask:?} should be rejected"
            );
        }
        assert!(decode_welcome_header("abc^1^0").is_ok());
    }

    #[test]
    fn test_decode_rejects_empty_client_id() {
        assert_eq!(decode_welcome_header("^1^3"), Err(WelcomeError::EmptyClientId));
    }

    proptest! {
        #[test]
        fn test_encoded_header_decodes(client_id in "[^^]{1,64}", bits in 1u32..=3) {
            let features = FeatureSet::from_bits(bits);
            let value = encode_welcome_header(&client_id, features).unwrap();
            let header = decode_welcome_header(&value).unwrap();

            prop_assert_eq!(header.client_id, client_id);
            prop_assert_eq!(header.version, ProtocolVersion::CURRENT);
            prop_assert_eq!(header.features, features);
        }

        #[test]
        fn test_decode_is_total(value in ".*") {
            let _ = decode_welcome_header(&value);
        }
    }
}
