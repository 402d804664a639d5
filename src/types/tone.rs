//! Tone coordinates and the instruction text they map to.
//!
//! A tone is a point on a 3×3 grid: `x` picks a [`Formality`] level and
//! `y` picks a [`Warmth`] level. Coordinates arrive from callers as raw
//! integers and are clamped to `0..=2` only when mapped to words, so any
//! integer is accepted.

use std::fmt;

/// Highest grid index on either axis.
const MAX_LEVEL: i32 = 2;

/// Formality axis (`x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formality {
    VeryFormal,
    Formal,
    Casual,
}

impl Formality {
    /// Map a raw grid index to a level, clamping out-of-range values to
    /// the nearest edge.
    pub fn from_level(level: i32) -> Self {
        match level.clamp(0, MAX_LEVEL) {
            0 => Formality::VeryFormal,
            1 => Formality::Formal,
            _ => Formality::Casual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Formality::VeryFormal => "very formal",
            Formality::Formal => "formal",
            Formality::Casual => "casual",
        }
    }
}

impl fmt::Display for Formality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warmth axis (`y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warmth {
    Stern,
    Neutral,
    Warm,
}

impl Warmth {
    /// Map a raw grid index to a level, clamping out-of-range values to
    /// the nearest edge.
    pub fn from_level(level: i32) -> Self {
        match level.clamp(0, MAX_LEVEL) {
            0 => Warmth::Stern,
            1 => Warmth::Neutral,
            _ => Warmth::Warm,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Warmth::Stern => "stern",
            Warmth::Neutral => "neutral",
            Warmth::Warm => "warm",
        }
    }
}

impl fmt::Display for Warmth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested tone, as sent by the caller.
///
/// Holds the raw coordinates; the cache key is built from these unclamped
/// values while the instruction uses the clamped levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ToneCoordinate {
    pub x: i32,
    pub y: i32,
}

impl ToneCoordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn formality(&self) -> Formality {
        Formality::from_level(self.x)
    }

    pub fn warmth(&self) -> Warmth {
        Warmth::from_level(self.y)
    }

    /// The rewrite instruction for this tone.
    pub fn instruction(&self) -> String {
        format!(
            "Rewrite the user's text with tone: {} and {}. Preserve meaning. \
             Do not add explanations, questions, or extra commentary. \
             Return only the rewritten text.",
            self.formality(),
            self.warmth()
        )
    }
}

/// Build the rewrite instruction for raw coordinates `(x, y)`.
pub fn instruction_for(x: i32, y: i32) -> String {
    ToneCoordinate::new(x, y).instruction()
}
