//! Settings: the user-tunable energy budget.

use serde::{Deserialize, Serialize};

/// Default cap on total powered-on wattage.
pub const DEFAULT_MAX_ENERGY: u32 = 2000;

/// Default peak-hours label.
pub const DEFAULT_PEAK_HOURS: &str = "18:00-22:00";

/// Process-wide energy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Cap on the sum of rated power over powered-on devices, in watts.
    pub max_energy: u32,
    /// Free-form label shown on the dashboard. Not used by any rule.
    pub peak_hours: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_energy: DEFAULT_MAX_ENERGY,
            peak_hours: DEFAULT_PEAK_HOURS.to_string(),
        }
    }
}

impl Settings {
    /// Apply an update, keeping the current value for every absent field.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(max_energy) = update.max_energy {
            self.max_energy = max_energy;
        }
        if let Some(peak_hours) = update.peak_hours {
            self.peak_hours = peak_hours;
        }
    }
}

/// A partial change to [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsUpdate {
    pub max_energy: Option<u32>,
    pub peak_hours: Option<String>,
}

impl SettingsUpdate {
    /// Coerce raw form input into an update.
    ///
    /// Inputs that cannot be used are dropped silently so the current
    /// value is kept: a cap that does not start with a positive integer,
    /// or a blank peak-hours label.
    #[must_use]
    pub fn from_raw(max_energy: &str, peak_hours: &str) -> Self {
        Self::coerce(leading_integer(max_energy), Some(peak_hours.to_string()))
    }

    /// Same as [`from_raw`](Self::from_raw) for already-typed input.
    #[must_use]
    pub fn coerce(max_energy: Option<i64>, peak_hours: Option<String>) -> Self {
        Self {
            max_energy: max_energy
                .filter(|watts| *watts > 0)
                .and_then(|watts| u32::try_from(watts).ok()),
            peak_hours: peak_hours
                .map(|label| label.trim().to_string())
                .filter(|label| !label.is_empty()),
        }
    }
}

/// Parse the integer prefix of `input`, ignoring leading whitespace and any
/// trailing garbage (`"2500W"` is 2500).
#[must_use]
pub fn leading_integer(input: &str) -> Option<i64> {
    let input = input.trim_start();
    let (sign, digits) = match input.as_bytes().first() {
        Some(b'-') => (-1, &input[1..]),
        Some(b'+') => (1, &input[1..]),
        _ => (1, input),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}
