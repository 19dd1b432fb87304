//! # Zero Ad Network Token Testkit
//!
//! Testing utilities for Zero Ad Network tokens.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed inputs with their exact header values, for
//!   checking other encoders and verifiers byte for byte
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: An issuer keypair plus a site that trusts it
//!
//! ## Golden Vectors
//!
//! ```rust
//! use zeroad_token_testkit::vectors::{all_vectors, generate_header_from_vector};
//!
//! for vector in all_vectors() {
//!     assert_eq!(generate_header_from_vector(&vector), vector.expected_header);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use zeroad_token_testkit::generators::ClaimsParams;
//!
//! proptest! {
//!     #[test]
//!     fn header_decodes(params: ClaimsParams) {
//!         let header = params.encode();
//!         prop_assert!(zeroad_token_core::decode_client_header(&header).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use zeroad_token_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new("partner-001");
//! let header = fixture.make_token(3600);
//! assert!(fixture.site.parse_client_token(Some(&header)).any());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::TestFixture;
pub use generators::ClaimsParams;
pub use vectors::{all_vectors, generate_header_from_vector, verify_all_vectors, GoldenVector};
