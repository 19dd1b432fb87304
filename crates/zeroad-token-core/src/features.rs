//! The feature registry.
//!
//! A feature is a paid bundle identified by one bit of the token bitmask.
//! Each feature expands to a fixed list of actions, the stable identifiers
//! that downstream content logic switches on:
//!
//! ```text
//! CLEAN_WEB (bit 0) -> HIDE_ADVERTISEMENTS, HIDE_COOKIE_CONSENT_SCREEN,
//!                      HIDE_MARKETING_DIALOGS, DISABLE_NON_FUNCTIONAL_TRACKING
//! ONE_PASS  (bit 1) -> DISABLE_CONTENT_PAYWALL, ENABLE_SUBSCRIPTION_ACCESS
//! ```
//!
//! This table is shared by the encoder, the welcome header codec and the
//! verifier. Renaming an identifier requires a protocol version bump.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// A paid feature bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    /// No ads, no cookie consent screens, no marketing dialogs, no
    /// non-functional tracking.
    CleanWeb,
    /// Free access to paywalled content and the base subscription plan.
    OnePass,
}

impl Feature {
    /// Every registered feature, in bit order.
    pub const ALL: [Self; 2] = [Self::CleanWeb, Self::OnePass];

    /// The feature's bit in the token bitmask.
    pub const fn bit(self) -> u32 {
        match self {
            Self::CleanWeb => 1 << 0,
            Self::OnePass => 1 << 1,
        }
    }

    /// Stable identifier, e.g. `CLEAN_WEB`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CleanWeb => "CLEAN_WEB",
            Self::OnePass => "ONE_PASS",
        }
    }

    /// Parse a stable identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// The actions this feature turns on.
    pub const fn actions(self) -> &'static [Action] {
        match self {
            Self::CleanWeb => &[
                Action::HideAdvertisements,
                Action::HideCookieConsentScreen,
                Action::HideMarketingDialogs,
                Action::DisableNonFunctionalTracking,
            ],
            Self::OnePass => &[
                Action::DisableContentPaywall,
                Action::EnableSubscriptionAccess,
            ],
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One concrete behaviour toggle granted by a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    HideAdvertisements,
    HideCookieConsentScreen,
    HideMarketingDialogs,
    DisableNonFunctionalTracking,
    DisableContentPaywall,
    EnableSubscriptionAccess,
}

impl Action {
    /// Number of known actions.
    pub const COUNT: usize = 6;

    /// Every known action, in registry order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::HideAdvertisements,
        Self::HideCookieConsentScreen,
        Self::HideMarketingDialogs,
        Self::DisableNonFunctionalTracking,
        Self::DisableContentPaywall,
        Self::EnableSubscriptionAccess,
    ];

    /// Stable identifier, e.g. `HIDE_ADVERTISEMENTS`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::HideAdvertisements => "HIDE_ADVERTISEMENTS",
            Self::HideCookieConsentScreen => "HIDE_COOKIE_CONSENT_SCREEN",
            Self::HideMarketingDialogs => "HIDE_MARKETING_DIALOGS",
            Self::DisableNonFunctionalTracking => "DISABLE_NON_FUNCTIONAL_TRACKING",
            Self::DisableContentPaywall => "DISABLE_CONTENT_PAYWALL",
            Self::EnableSubscriptionAccess => "ENABLE_SUBSCRIPTION_ACCESS",
        }
    }

    /// Parse a stable identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A feature bitmask.
///
/// Bits outside the registry are kept as-is when read off the wire; they
/// never map to an action.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(u32);

impl FeatureSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Wrap a raw bitmask, unknown bits included.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Wrap a raw bitmask, dropping bits outside the registry.
    pub fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::all().0)
    }

    /// Every registered feature.
    pub fn all() -> Self {
        Feature::ALL.into_iter().collect()
    }

    /// The raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    pub fn insert(&mut self, feature: Feature) {
        self.0 |= feature.bit();
    }

    /// Bits set in both sets.
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Registered features present in this set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

impl From<Feature> for FeatureSet {
    fn from(feature: Feature) -> Self {
        Self(feature.bit())
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureSet({:#b}: ", self.0)?;
        f.debug_list().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}

/// The verifier's output: every known action mapped to a decision.
///
/// The record is total. An action no enabled feature implies is present and
/// `false`. Serializes as a map from action identifier to bool.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionContext([bool; Action::COUNT]);

impl ActionContext {
    /// The fail-closed context: every action `false`.
    pub const fn none() -> Self {
        Self([false; Action::COUNT])
    }

    /// Expand a set of enabled features into their actions.
    pub fn from_features(enabled: FeatureSet) -> Self {
        let mut decisions = [false; Action::COUNT];
        for feature in Feature::ALL {
            let decision = enabled.contains(feature);
            for action in feature.actions() {
                decisions[action.index()] = decision;
            }
        }
        Self(decisions)
    }

    /// The decision for one action.
    pub const fn is_enabled(&self, action: Action) -> bool {
        self.0[action.index()]
    }

    /// `true` if at least one action is enabled.
    pub fn any(&self) -> bool {
        self.0.iter().any(|d| *d)
    }

    /// All actions with their decisions, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, bool)> + '_ {
        Action::ALL.into_iter().map(move |a| (a, self.is_enabled(a)))
    }

    /// Only the enabled actions.
    pub fn enabled_actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.iter().filter(|(_, d)| *d).map(|(a, _)| a)
    }
}

impl Index<Action> for ActionContext {
    type Output = bool;

    fn index(&self, action: Action) -> &bool {
        &self.0[action.index()]
    }
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(a, d)| (a.name(), d)))
            .finish()
    }
}

impl Serialize for ActionContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Action::COUNT))?;
        for (action, decision) in self.iter() {
            map.serialize_entry(action.name(), &decision)?;
        }
        map.end()
    }
}
