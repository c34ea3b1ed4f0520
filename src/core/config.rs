//! Board configuration types.
//!
//! Boards configure the engine at startup by providing:
//! - `ZoneConfig`: One processing zone (name, backend operation, lane rules)
//! - `CardSpec`: One voice card placed in holding at the start
//! - `ClassifierConfig`: Where and how to reach the classification service
//! - `BoardConfig`: Combines all configuration
//!
//! The engine never hardcodes zones, lanes, or cards - boards define them.
//! Configuration is immutable once loaded; the controller shares it behind
//! an `Arc`.

use std::path::Path;
use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::ConfigError;

/// Zone identifier. The raw value is the zone's ordinal.
///
/// Ordinal 0 is the holding zone; processing zones are numbered from 1 in
/// the order they appear in `BoardConfig::zones`. Ordering defines both
/// adjacency and the "forward" direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u16);

impl ZoneId {
    /// The holding zone (stage zero).
    pub const HOLDING: Self = Self(0);

    /// The first processing zone.
    pub const FIRST: Self = Self(1);

    /// Create a new zone ID from its ordinal.
    #[must_use]
    pub const fn new(ordinal: u16) -> Self {
        Self(ordinal)
    }

    /// Get the ordinal.
    #[must_use]
    pub const fn ordinal(self) -> u16 {
        self.0
    }

    /// Ordinal as a collection index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Is this the holding zone?
    #[must_use]
    pub const fn is_holding(self) -> bool {
        self.0 == 0
    }

    /// The zone immediately after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Check if two zones are neighbours in the sequence.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.0.abs_diff(other.0) == 1
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_holding() {
            write!(f, "Holding")
        } else {
            write!(f, "Zone({})", self.0)
        }
    }
}

/// Lane identifier, 1-based.
///
/// Lane numbering is stable across zones: lane 2 of every zone denotes
/// the same track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneId(pub u8);

impl LaneId {
    /// Create a new lane ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for LaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lane {}", self.0)
    }
}

/// Configuration for a single processing zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Human-readable name, also sent to the classification service.
    pub name: String,

    /// Backend operation this zone represents (e.g. "initialization").
    #[serde(default)]
    pub operation: Option<String>,

    /// Lanes a card can never leave once it enters them.
    #[serde(default)]
    pub sticky_lanes: SmallVec<[LaneId; 4]>,

    /// Lanes whose occupant cannot advance to a later zone.
    #[serde(default)]
    pub blocking_lanes: SmallVec<[LaneId; 4]>,
}

impl ZoneConfig {
    /// Create a zone with no special lanes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation: None,
            sticky_lanes: SmallVec::new(),
            blocking_lanes: SmallVec::new(),
        }
    }

    /// Set the backend operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Mark a lane as sticky.
    #[must_use]
    pub fn with_sticky_lane(mut self, lane: LaneId) -> Self {
        self.sticky_lanes.push(lane);
        self
    }

    /// Mark a lane as blocking.
    #[must_use]
    pub fn with_blocking_lane(mut self, lane: LaneId) -> Self {
        self.blocking_lanes.push(lane);
        self
    }
}

/// A voice card placed in holding when the board starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSpec {
    /// Unique card ID.
    pub id: String,
    /// Display label. Also unique: historical presence is keyed by label.
    pub label: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_ping_timeout_ms() -> u64 {
    3_000
}

const fn default_ping_interval_ms() -> u64 {
    10_000
}

/// Classification service settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Service root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for a single classify call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound for an availability probe.
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,

    /// How often the surrounding UI should probe availability.
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            ping_timeout_ms: default_ping_timeout_ms(),
            ping_interval_ms: default_ping_interval_ms(),
        }
    }
}

impl ClassifierConfig {
    /// Create settings for a service root with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the classify timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    #[must_use]
    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }
}

/// Complete board configuration.
///
/// ## Usage
///
/// ```
/// use voice_board::core::{BoardConfig, LaneId, ZoneConfig, ZoneId};
///
/// let config = BoardConfig::new(2)
///     .with_zone(ZoneConfig::new("Zone 1").with_sticky_lane(LaneId::new(1)))
///     .with_zone(ZoneConfig::new("Zone 2"))
///     .with_card("voice-a", "Voice A");
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.terminal_zone(), ZoneId::new(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Lanes per processing zone.
    pub lane_count: u8,

    /// Lane of the terminal zone whose occupancy completes that zone.
    #[serde(default)]
    pub completion_lane: Option<LaneId>,

    /// Processing zones, in order. Ordinal = index + 1.
    pub zones: Vec<ZoneConfig>,

    /// Cards, all starting in holding.
    #[serde(default)]
    pub cards: Vec<CardSpec>,

    /// Classification service settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl BoardConfig {
    /// Create an empty configuration.
    pub fn new(lane_count: u8) -> Self {
        assert!(lane_count > 0, "Must have at least 1 lane");

        Self {
            lane_count,
            completion_lane: None,
            zones: Vec::new(),
            cards: Vec::new(),
            classifier: ClassifierConfig::default(),
        }
    }

    /// Append a processing zone.
    #[must_use]
    pub fn with_zone(mut self, zone: ZoneConfig) -> Self {
        self.zones.push(zone);
        self
    }

    /// Add a card to holding.
    #[must_use]
    pub fn with_card(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.cards.push(CardSpec {
            id: id.into(),
            label: label.into(),
        });
        self
    }

    /// Set the terminal zone's completion lane.
    #[must_use]
    pub fn with_completion_lane(mut self, lane: LaneId) -> Self {
        self.completion_lane = Some(lane);
        self
    }

    /// Set classification service settings.
    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// The stock voice board: four zones, three lanes, five voices.
    pub fn voice_board() -> Self {
        let lane = LaneId::new;
        let mut config = Self::new(3)
            .with_zone(
                ZoneConfig::new("Zone 1")
                    .with_operation("initialization")
                    .with_sticky_lane(lane(3)),
            )
            .with_zone(
                ZoneConfig::new("Zone 2")
                    .with_operation("feature_extraction")
                    .with_sticky_lane(lane(2))
                    .with_sticky_lane(lane(3)),
            )
            .with_zone(
                ZoneConfig::new("Zone 3")
                    .with_operation("transformation")
                    .with_sticky_lane(lane(1)),
            )
            .with_zone(ZoneConfig::new("Zone 4").with_operation("enhancement"));

        for letter in ['a', 'b', 'c', 'd', 'e'] {
            config = config.with_card(
                format!("voice-{letter}"),
                format!("Voice {}", letter.to_ascii_uppercase()),
            );
        }
        config
    }

    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check structural constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.zones.is_empty() {
            return Err(ConfigError::NoZones);
        }
        if self.zones.len() >= usize::from(u16::MAX) {
            return Err(ConfigError::TooManyZones(self.zones.len()));
        }
        if self.cards.is_empty() {
            return Err(ConfigError::NoCards);
        }

        for zone in &self.zones {
            let lanes = zone.sticky_lanes.iter().chain(zone.blocking_lanes.iter());
            for &lane in lanes {
                if !self.contains_lane(lane) {
                    return Err(ConfigError::LaneOutOfRange {
                        zone: zone.name.clone(),
                        lane,
                    });
                }
            }
        }

        if let Some(lane) = self.completion_lane {
            if !self.contains_lane(lane) {
                return Err(ConfigError::CompletionLaneOutOfRange(lane));
            }
        }

        let mut ids = FxHashSet::default();
        let mut labels = FxHashSet::default();
        for card in &self.cards {
            if !ids.insert(card.id.as_str()) {
                return Err(ConfigError::DuplicateCardId(card.id.clone()));
            }
            if !labels.insert(card.label.as_str()) {
                return Err(ConfigError::DuplicateLabel(card.label.clone()));
            }
        }

        Ok(())
    }

    /// Number of processing zones (holding excluded).
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Processing zone IDs, in order.
    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> {
        (1..=self.zones.len() as u16).map(ZoneId::new)
    }

    /// Lane IDs, in order.
    pub fn lanes(&self) -> impl Iterator<Item = LaneId> {
        (1..=self.lane_count).map(LaneId::new)
    }

    /// The last processing zone.
    #[must_use]
    pub fn terminal_zone(&self) -> ZoneId {
        ZoneId::new(self.zones.len() as u16)
    }

    /// Is `zone` holding or a configured processing zone?
    #[must_use]
    pub fn contains_zone(&self, zone: ZoneId) -> bool {
        zone.index() <= self.zones.len()
    }

    #[must_use]
    pub fn contains_lane(&self, lane: LaneId) -> bool {
        (1..=self.lane_count).contains(&lane.raw())
    }

    /// Get a processing zone config. `None` for holding and unknown zones.
    #[must_use]
    pub fn get_zone(&self, zone: ZoneId) -> Option<&ZoneConfig> {
        zone.index()
            .checked_sub(1)
            .and_then(|i| self.zones.get(i))
    }

    /// Display name of a zone.
    #[must_use]
    pub fn zone_name(&self, zone: ZoneId) -> &str {
        if zone.is_holding() {
            return "holding";
        }
        self.get_zone(zone).map_or("unknown", |z| z.name.as_str())
    }
}
