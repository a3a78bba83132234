//! Reading time settings and the admin round trip.
//!
//! [`Settings`] is the immutable snapshot the presenter reads on every render.
//! It is built from an [`OptionStore`] with [`Settings::load`], which never
//! fails: anomalous stored values are replaced by their defaults and logged.
//! The admin surface goes the other way through [`Settings::apply`] and
//! [`Settings::save`], which enforce the bounds of the settings form.
//!
//! # Stored keys
//!
//! | key | stored as |
//! |---|---|
//! | `readtime_reading_speed` | integer (or integer string) |
//! | `readtime_placement` | `"before"`, `"after"` or `"manual"` |
//! | `readtime_custom_text` | string |
//! | `readtime_minutes_text` | string |
//! | `readtime_seconds_text` | string |
//! | `readtime_display_seconds` | `"yes"` to enable, anything else disables |
//! | `readtime_excluded_post_types` | list of strings |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{SettingsError, SettingsResult, StoreResult};
use crate::estimate::DEFAULT_READING_SPEED;
use crate::options::{OptionStore, option_key};

/// Lowest reading speed accepted by the settings form.
pub const MIN_READING_SPEED: u32 = 50;

/// Highest reading speed accepted by the settings form.
pub const MAX_READING_SPEED: u32 = 1000;

/// Default label printed before the estimate.
pub const DEFAULT_CUSTOM_TEXT: &str = "Reading Time:";

/// Default minutes unit label.
pub const DEFAULT_MINUTES_TEXT: &str = "min";

/// Default seconds unit label.
pub const DEFAULT_SECONDS_TEXT: &str = "sec";

/// Where the reading time block goes relative to the content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Placement {
    /// Prepend the block to the content (default).
    #[default]
    Before,
    /// Append the block to the content.
    After,
    /// Only render where an author placed the manual marker.
    Manual,
    /// A stored value with no defined injection point. Rendering is a no-op.
    Other(String),
}

impl Placement {
    /// Placement values the settings form offers.
    pub const KNOWN: [&'static str; 3] = ["before", "after", "manual"];

    /// Interpret a stored value. Unrecognized values become [`Placement::Other`].
    pub fn parse(value: &str) -> Self {
        match value {
            "before" => Self::Before,
            "after" => Self::After,
            "manual" => Self::Manual,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the placement as it is stored.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Manual => "manual",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` for the three values the settings form offers.
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Placement {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Placement> for String {
    fn from(value: Placement) -> Self {
        value.as_str().to_string()
    }
}

/// One field of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SettingsField {
    /// Words per minute.
    #[cfg_attr(feature = "clap", value(name = "reading_speed"))]
    ReadingSpeed,
    /// Injection point.
    #[cfg_attr(feature = "clap", value(name = "placement"))]
    Placement,
    /// Label prefix.
    #[cfg_attr(feature = "clap", value(name = "custom_text"))]
    CustomText,
    /// Minutes unit label.
    #[cfg_attr(feature = "clap", value(name = "minutes_text"))]
    MinutesText,
    /// Seconds unit label.
    #[cfg_attr(feature = "clap", value(name = "seconds_text"))]
    SecondsText,
    /// Seconds-only display.
    #[cfg_attr(feature = "clap", value(name = "display_seconds"))]
    DisplaySeconds,
    /// Post types that never get a reading time.
    #[cfg_attr(feature = "clap", value(name = "excluded_post_types"))]
    ExcludedPostTypes,
}

impl SettingsField {
    /// Every field, in form order.
    pub const ALL: [Self; 7] = [
        Self::ReadingSpeed,
        Self::Placement,
        Self::CustomText,
        Self::MinutesText,
        Self::SecondsText,
        Self::DisplaySeconds,
        Self::ExcludedPostTypes,
    ];

    /// Returns the field name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadingSpeed => "reading_speed",
            Self::Placement => "placement",
            Self::CustomText => "custom_text",
            Self::MinutesText => "minutes_text",
            Self::SecondsText => "seconds_text",
            Self::DisplaySeconds => "display_seconds",
            Self::ExcludedPostTypes => "excluded_post_types",
        }
    }

    /// Returns the namespaced option store key for this field.
    pub fn option_key(&self) -> String {
        option_key(self.as_str())
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsField {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownField {
                name: s.to_string(),
                available: Self::ALL.map(|f| f.as_str()).join(", "),
            })
    }
}

/// Reading time settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Words per minute.
    pub reading_speed: u32,
    /// Injection point relative to the content.
    pub placement: Placement,
    /// Label printed in bold before the estimate.
    pub custom_text: String,
    /// Minutes unit label.
    pub minutes_text: String,
    /// Seconds unit label.
    pub seconds_text: String,
    /// Show the whole estimate in seconds.
    pub display_seconds: bool,
    /// Post types that never get a reading time.
    pub excluded_post_types: BTreeSet<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reading_speed: DEFAULT_READING_SPEED,
            placement: Placement::default(),
            custom_text: DEFAULT_CUSTOM_TEXT.to_string(),
            minutes_text: DEFAULT_MINUTES_TEXT.to_string(),
            seconds_text: DEFAULT_SECONDS_TEXT.to_string(),
            display_seconds: false,
            excluded_post_types: BTreeSet::new(),
        }
    }
}

impl Settings {
    /// Reading speed to estimate with; `0` falls back to the default.
    pub const fn effective_speed(&self) -> u32 {
        if self.reading_speed == 0 {
            DEFAULT_READING_SPEED
        } else {
            self.reading_speed
        }
    }

    /// Returns `true` if `post_type` is excluded from the reading time.
    pub fn is_excluded(&self, post_type: &str) -> bool {
        self.excluded_post_types.contains(post_type)
    }

    /// Build a snapshot from the option store.
    ///
    /// Never fails. Missing keys take their defaults; malformed values are
    /// replaced by defaults and logged at `warn`.
    #[tracing::instrument(skip_all)]
    pub fn load<S: OptionStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();
        let settings = Self {
            reading_speed: store
                .get(&SettingsField::ReadingSpeed.option_key())
                .map_or(defaults.reading_speed, |v| stored_speed(&v)),
            placement: store
                .get(&SettingsField::Placement.option_key())
                .map_or(defaults.placement, |v| stored_placement(&v)),
            custom_text: stored_text(store, SettingsField::CustomText, defaults.custom_text),
            minutes_text: stored_text(store, SettingsField::MinutesText, defaults.minutes_text),
            seconds_text: stored_text(store, SettingsField::SecondsText, defaults.seconds_text),
            display_seconds: store
                .get(&SettingsField::DisplaySeconds.option_key())
                .is_some_and(|v| stored_flag(&v)),
            excluded_post_types: store
                .get(&SettingsField::ExcludedPostTypes.option_key())
                .map_or(defaults.excluded_post_types, |v| stored_post_types(&v)),
        };
        tracing::debug!(
            reading_speed = settings.reading_speed,
            placement = %settings.placement,
            display_seconds = settings.display_seconds,
            excluded = settings.excluded_post_types.len(),
            "settings loaded"
        );
        settings
    }

    /// Check the bounds enforced by the settings form.
    pub fn validate(&self) -> SettingsResult<()> {
        SettingsField::ALL
            .into_iter()
            .try_for_each(|field| self.validate_field(field))
    }

    /// Check the form bounds of a single field.
    pub fn validate_field(&self, field: SettingsField) -> SettingsResult<()> {
        match field {
            SettingsField::ReadingSpeed => {
                check_speed(i64::from(self.reading_speed))?;
            }
            SettingsField::Placement if !self.placement.is_known() => {
                return Err(SettingsError::UnknownPlacement(
                    self.placement.as_str().to_string(),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    /// Validate and write one field, leaving the other stored keys untouched.
    #[tracing::instrument(skip(self, store))]
    pub fn save_field<S: OptionStore + ?Sized>(
        &self,
        store: &mut S,
        field: SettingsField,
    ) -> SettingsResult<()> {
        self.validate_field(field)?;
        store.set(&field.option_key(), self.stored_value(field))?;
        tracing::info!(value = %self.display_value(field), "setting saved");
        Ok(())
    }

    /// Validate and write every field to the option store.
    #[tracing::instrument(skip_all)]
    pub fn save<S: OptionStore + ?Sized>(&self, store: &mut S) -> SettingsResult<()> {
        self.validate()?;
        for field in SettingsField::ALL {
            store.set(&field.option_key(), self.stored_value(field))?;
        }
        tracing::info!(
            reading_speed = self.reading_speed,
            placement = %self.placement,
            "settings saved"
        );
        Ok(())
    }

    /// Assign one field from a raw form value.
    ///
    /// - `reading_speed`: integer between 50 and 1000
    /// - `placement`: `before`, `after` or `manual`
    /// - `display_seconds`: `yes`/`no` (also `true`/`false`, `on`/`off`, `1`/`0`)
    /// - `excluded_post_types`: comma-separated list; empty clears it
    /// - text fields: taken verbatim
    pub fn apply(&mut self, field: SettingsField, raw: &str) -> SettingsResult<()> {
        match field {
            SettingsField::ReadingSpeed => {
                let value: i64 = raw.trim().parse().map_err(|_| SettingsError::InvalidValue {
                    field: field.as_str(),
                    value: raw.to_string(),
                })?;
                self.reading_speed = check_speed(value)?;
            }
            SettingsField::Placement => {
                let placement = Placement::parse(raw.trim());
                if !placement.is_known() {
                    return Err(SettingsError::UnknownPlacement(raw.to_string()));
                }
                self.placement = placement;
            }
            SettingsField::CustomText => self.custom_text = raw.to_string(),
            SettingsField::MinutesText => self.minutes_text = raw.to_string(),
            SettingsField::SecondsText => self.seconds_text = raw.to_string(),
            SettingsField::DisplaySeconds => {
                self.display_seconds = match raw.trim().to_ascii_lowercase().as_str() {
                    "yes" | "true" | "on" | "1" => true,
                    "no" | "false" | "off" | "0" | "" => false,
                    _ => {
                        return Err(SettingsError::InvalidValue {
                            field: field.as_str(),
                            value: raw.to_string(),
                        });
                    }
                };
            }
            SettingsField::ExcludedPostTypes => {
                self.excluded_post_types = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
        }
        Ok(())
    }

    /// Render one field the way the settings form shows it.
    pub fn display_value(&self, field: SettingsField) -> String {
        match field {
            SettingsField::ReadingSpeed => self.reading_speed.to_string(),
            SettingsField::Placement => self.placement.to_string(),
            SettingsField::CustomText => self.custom_text.clone(),
            SettingsField::MinutesText => self.minutes_text.clone(),
            SettingsField::SecondsText => self.seconds_text.clone(),
            SettingsField::DisplaySeconds => yes_no(self.display_seconds).to_string(),
            SettingsField::ExcludedPostTypes => self
                .excluded_post_types
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn stored_value(&self, field: SettingsField) -> Value {
        match field {
            SettingsField::ReadingSpeed => json!(self.reading_speed),
            SettingsField::Placement => json!(self.placement.as_str()),
            SettingsField::CustomText => json!(self.custom_text),
            SettingsField::MinutesText => json!(self.minutes_text),
            SettingsField::SecondsText => json!(self.seconds_text),
            SettingsField::DisplaySeconds => json!(yes_no(self.display_seconds)),
            SettingsField::ExcludedPostTypes => json!(self.excluded_post_types),
        }
    }
}

/// Remove every stored setting so all fields fall back to their defaults.
pub fn reset<S: OptionStore + ?Sized>(store: &mut S) -> StoreResult<()> {
    for field in SettingsField::ALL {
        store.delete(&field.option_key())?;
    }
    tracing::info!("settings reset to defaults");
    Ok(())
}

/// Seed the option store on first activation.
///
/// Writes the default reading speed if none is stored yet. Returns `true` if
/// anything was written.
pub fn activate<S: OptionStore + ?Sized>(store: &mut S) -> StoreResult<bool> {
    let key = SettingsField::ReadingSpeed.option_key();
    if store.get(&key).is_some() {
        return Ok(false);
    }
    store.set(&key, json!(DEFAULT_READING_SPEED))?;
    tracing::info!(reading_speed = DEFAULT_READING_SPEED, "seeded default reading speed");
    Ok(true)
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn check_speed(value: i64) -> SettingsResult<u32> {
    if (i64::from(MIN_READING_SPEED)..=i64::from(MAX_READING_SPEED)).contains(&value) {
        // In range, so the cast is lossless.
        Ok(value as u32)
    } else {
        Err(SettingsError::SpeedOutOfRange {
            value,
            min: MIN_READING_SPEED,
            max: MAX_READING_SPEED,
        })
    }
}

fn stored_speed(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed.and_then(|n| u32::try_from(n).ok()).filter(|&n| n > 0) {
        Some(speed) => speed,
        None => {
            tracing::warn!(stored = %value, fallback = DEFAULT_READING_SPEED, "invalid reading speed");
            DEFAULT_READING_SPEED
        }
    }
}

fn stored_placement(value: &Value) -> Placement {
    let placement = match value {
        Value::String(s) => Placement::parse(s),
        other => Placement::Other(other.to_string()),
    };
    if !placement.is_known() {
        tracing::warn!(stored = %value, "unknown placement, reading time will not be injected");
    }
    placement
}

fn stored_text<S: OptionStore + ?Sized>(store: &S, field: SettingsField, default: String) -> String {
    match store.get(&field.option_key()) {
        None => default,
        Some(Value::String(s)) => s,
        Some(other) => {
            tracing::warn!(field = field.as_str(), stored = %other, "non-text value, using default");
            default
        }
    }
}

fn stored_flag(value: &Value) -> bool {
    match value {
        Value::String(s) => s == "yes",
        Value::Bool(b) => *b,
        _ => false,
    }
}

fn stored_post_types(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        other => {
            tracing::warn!(stored = %other, "excluded post types is not a list, excluding nothing");
            BTreeSet::new()
        }
    }
}
