//! User-adjustable rendering options.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Process-wide options. Every flag defaults to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix each barcode with a black/white "10" marker (10 pixels instead of 8)
    pub leading_frame_bit: bool,
    /// Red outline around the barcode on document pages
    pub show_border: bool,
    /// Text label above the barcode on document pages
    pub show_label: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { leading_frame_bit: true, show_border: true, show_label: true }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply the fields set in `update`, returning what changed.
    pub fn apply(&mut self, update: ConfigUpdate) -> Changes {
        let before = *self;
        if let Some(v) = update.leading_frame_bit { self.leading_frame_bit = v; }
        if let Some(v) = update.show_border { self.show_border = v; }
        if let Some(v) = update.show_label { self.show_label = v; }
        Changes {
            rasters: update.leading_frame_bit.is_some(),
            document: !update.is_empty(),
            differs: before != *self,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yn = |b: bool| if b { 'y' } else { 'n' };
        writeln!(f, "  {}\tBarcode: Add Leading '10'", yn(self.leading_frame_bit))?;
        writeln!(f, "  {}\tPDF: borders", yn(self.show_border))?;
        write!(f, "  {}\tPDF: labels", yn(self.show_label))
    }
}

/// Partial update for [`Config`]; `None` leaves a flag alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub leading_frame_bit: Option<bool>,
    pub show_border: Option<bool>,
    pub show_label: Option<bool>,
}

impl ConfigUpdate {
    pub fn leading_frame_bit(mut self, on: bool) -> Self {
        self.leading_frame_bit = Some(on);
        self
    }

    pub fn show_border(mut self, on: bool) -> Self {
        self.show_border = Some(on);
        self
    }

    pub fn show_label(mut self, on: bool) -> Self {
        self.show_label = Some(on);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.leading_frame_bit.is_none() && self.show_border.is_none() && self.show_label.is_none()
    }
}

/// Which derived artifacts an update touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Changes {
    pub rasters: bool,
    pub document: bool,
    /// Whether any flag actually took a new value
    pub differs: bool,
}
