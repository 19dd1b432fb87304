//! The per-process site object handed to request handlers.

use serde::{Deserialize, Serialize};
use zeroad_token_core::{
    cgi_header_name, ActionContext, PublicKey, CLIENT_HEADER_NAME, SERVER_HEADER_NAME,
};

use crate::error::Result;
use crate::identity::SiteIdentity;
use crate::key_store::KeyStore;
use crate::verifier::{
    parse_and_validate, unix_now, verify_client_header, Rejection, VerifiedToken,
};

/// How the welcome value is delivered to the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMethod {
    /// `X-Better-Web-Welcome` response header.
    #[default]
    Header,
    /// `<meta>` tag in the page head.
    Meta,
}

/// The welcome value rendered for one [`OutputMethod`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WelcomeOutput {
    Header { name: &'static str, value: String },
    MetaTag(String),
}

/// A configured site: identity, verification key and welcome value.
///
/// Build one at startup and share it; every method takes `&self`.
#[derive(Debug, Clone)]
pub struct Site {
    identity: SiteIdentity,
    public_key: PublicKey,
    welcome_value: String,
    output_method: OutputMethod,
}

impl Site {
    /// Create a site verifying with the identity's key override, or with
    /// the network key when there is none.
    pub fn new(identity: SiteIdentity, key_store: &KeyStore) -> Result<Self> {
        let public_key = match identity.public_key_override() {
            Some(key) => *key,
            None => key_store.network_key()?,
        };
        let welcome_value = identity.welcome_header().to_string();

        Ok(Self {
            identity,
            public_key,
            welcome_value,
            output_method: OutputMethod::default(),
        })
    }

    pub fn with_output_method(mut self, output_method: OutputMethod) -> Self {
        self.output_method = output_method;
        self
    }

    pub fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    /// The key tokens are verified against.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn output_method(&self) -> OutputMethod {
        self.output_method
    }

    /// Request header carrying the token.
    pub fn client_header_name(&self) -> &'static str {
        CLIENT_HEADER_NAME
    }

    /// The request header's CGI variable name, `HTTP_X_BETTER_WEB_HELLO`.
    pub fn cgi_client_header_name(&self) -> String {
        cgi_header_name(CLIENT_HEADER_NAME)
    }

    pub fn server_header_name(&self) -> &'static str {
        SERVER_HEADER_NAME
    }

    /// `client_id^version^bitmask`.
    pub fn welcome_header_value(&self) -> &str {
        &self.welcome_value
    }

    /// `<meta name="X-Better-Web-Welcome" content="..." data-zeroad="server-identifier" />`
    pub fn welcome_meta_tag(&self) -> String {
        format!(
            "<meta name=\"{}\" content=\"{}\" data-zeroad=\"server-identifier\" />",
            SERVER_HEADER_NAME,
            escape_attribute(&self.welcome_value)
        )
    }

    /// The welcome value in the configured output form.
    pub fn welcome_output(&self) -> WelcomeOutput {
        match self.output_method {
            OutputMethod::Header => WelcomeOutput::Header {
                name: SERVER_HEADER_NAME,
                value: self.welcome_value.clone(),
            },
            OutputMethod::Meta => WelcomeOutput::MetaTag(self.welcome_meta_tag()),
        }
    }

    /// Verify a hello header at `now` (unix seconds), keeping the reason
    /// for a rejection.
    pub fn verify_client_token(
        &self,
        header: Option<&str>,
        now: u64,
    ) -> std::result::Result<VerifiedToken, Rejection> {
        verify_client_header(header, &self.identity, &self.public_key, now)
    }

    /// Evaluate a hello header at `now` (unix seconds).
    pub fn parse_client_token_at(&self, header: Option<&str>, now: u64) -> ActionContext {
        parse_and_validate(header, &self.identity, &self.public_key, now)
    }

    /// Evaluate a hello header against the system clock.
    pub fn parse_client_token(&self, header: Option<&str>) -> ActionContext {
        self.parse_client_token_at(header, unix_now())
    }
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}
