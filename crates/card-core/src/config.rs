//! Per-card options.
//!
//! The web front-end reads these from `data-*` attributes on the card element;
//! anything else can build a [`CardConfig`] directly.

use crate::constants::{DEFAULT_INTENSITY, DEFAULT_ZOOM_SIZE};
use crate::error::{CardError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct CardConfig {
    /// Depth the card rises to while hovered.
    pub zoom_size: f64,
    /// Amplitude scale of the ambient motion.
    pub intensity: f64,
    /// Phase offset of the ambient motion. `None` makes the card purely
    /// pointer-driven.
    pub ambient_offset: Option<f64>,
    pub debug: bool,
    /// Whether the card can be enlarged into a centered presentation.
    pub enlarge: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            zoom_size: DEFAULT_ZOOM_SIZE,
            intensity: DEFAULT_INTENSITY,
            ambient_offset: None,
            debug: false,
            enlarge: false,
        }
    }
}

impl CardConfig {
    pub fn ambient_enabled(&self) -> bool {
        self.ambient_offset.is_some()
    }

    /// Set the ambient offset; negative values disable ambient mode.
    pub fn with_ambient_offset(mut self, offset: f64) -> Self {
        self.ambient_offset = (offset >= 0.0).then_some(offset);
        self
    }

    /// Build a config from a key lookup (e.g. `data-*` attributes).
    ///
    /// Malformed values are logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(raw) = lookup("zoom-size") {
            match parse_number("zoom-size", &raw) {
                Ok(v) => cfg.zoom_size = v,
                Err(e) => log::warn!("[config] {e}"),
            }
        }
        if let Some(raw) = lookup("intensity") {
            match parse_number("intensity", &raw) {
                Ok(v) => cfg.intensity = v,
                Err(e) => log::warn!("[config] {e}"),
            }
        }
        if let Some(raw) = lookup("ambient-offset") {
            match parse_number("ambient-offset", &raw) {
                Ok(v) => cfg = cfg.with_ambient_offset(v),
                Err(e) => log::warn!("[config] {e}"),
            }
        }
        if let Some(raw) = lookup("debug") {
            match parse_flag("debug", &raw) {
                Ok(v) => cfg.debug = v,
                Err(e) => log::warn!("[config] {e}"),
            }
        }
        if let Some(raw) = lookup("enlarge") {
            match parse_flag("enlarge", &raw) {
                Ok(v) => cfg.enlarge = v,
                Err(e) => log::warn!("[config] {e}"),
            }
        }
        cfg
    }
}

pub fn parse_number(name: &'static str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CardError::InvalidOption {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Presence-style flags: an empty attribute counts as `true`.
pub fn parse_flag(name: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CardError::InvalidOption {
            name,
            value: raw.to_string(),
        }),
    }
}
