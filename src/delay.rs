//! Human-readable delay expressions (`250`, `500ms`, `2s`, `1m`, `1h`).
//!
//! Parsing never fails: anything unrecognized falls back to [`DEFAULT_DELAY_MS`] after a warning.

// std
use std::time::Duration as StdDuration;

/// Delay applied when the expression is absent, empty, or malformed.
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Time unit suffix accepted by [`parse_delay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayUnit {
	/// `ms`, the implicit unit.
	Milliseconds,
	/// `s`.
	Seconds,
	/// `m`.
	Minutes,
	/// `h`.
	Hours,
}
impl DelayUnit {
	/// Parses a case-insensitive suffix; an empty suffix means milliseconds.
	pub fn from_suffix(suffix: &str) -> Option<Self> {
		match suffix.to_ascii_lowercase().as_str() {
			"" | "ms" => Some(Self::Milliseconds),
			"s" => Some(Self::Seconds),
			"m" => Some(Self::Minutes),
			"h" => Some(Self::Hours),
			_ => None,
		}
	}

	/// Returns the number of milliseconds in one unit.
	pub const fn multiplier(self) -> u64 {
		match self {
			Self::Milliseconds => 1,
			Self::Seconds => 1_000,
			Self::Minutes => 60_000,
			Self::Hours => 3_600_000,
		}
	}
}

/// Parses a delay expression into milliseconds.
pub fn parse_delay(raw: Option<&str>) -> u64 {
	let Some(raw) = raw.filter(|value| !value.is_empty()) else {
		return DEFAULT_DELAY_MS;
	};

	match parse_strict(raw) {
		Some(ms) => ms,
		None => {
			#[cfg(feature = "tracing")]
			tracing::warn!(
				delay = raw,
				default_ms = DEFAULT_DELAY_MS,
				"Invalid delay format, using the default delay."
			);

			DEFAULT_DELAY_MS
		},
	}
}

/// Same as [`parse_delay`] but returns a sleepable duration.
pub fn parse_delay_duration(raw: Option<&str>) -> StdDuration {
	StdDuration::from_millis(parse_delay(raw))
}

fn parse_strict(raw: &str) -> Option<u64> {
	let digits_end = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());

	if digits_end == 0 {
		return None;
	}

	let (digits, suffix) = raw.split_at(digits_end);
	let unit = DelayUnit::from_suffix(suffix)?;

	digits.parse::<u64>().ok()?.checked_mul(unit.multiplier())
}
