//! The core as seen by an interactive shell: current options, the derived
//! rasters and document, preview and export.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::barcode::byte_labels;
use crate::builder::{DocumentState, DocumentStatus};
use crate::config::{Config, ConfigUpdate};
use crate::consts::{DISPLAY_SCALE_X, DISPLAY_SCALE_Y, IMAGE_DIR, PDF_NAME};
use crate::error::{Error, Result};
use crate::export::{export_document, export_images, ImageExport};
use crate::graphics::{build_raster_set, render_display_raster, Raster, RasterSet};

/// Byte currently browsed in the shell. Stepping past either end clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection(u8);

impl Default for Selection {
    fn default() -> Self {
        Selection(b'A')
    }
}

impl Selection {
    pub fn new(value: u8) -> Self {
        Selection(value)
    }

    /// Select `value`, clamped to 0..=255.
    pub fn clamped(value: i64) -> Self {
        Selection(value.clamp(0, u8::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Self {
        Selection(self.0.saturating_add(1))
    }

    pub fn prev(self) -> Self {
        Selection(self.0.saturating_sub(1))
    }
}

/// What an export wrote.
#[derive(Debug)]
pub struct ExportSummary {
    pub images: ImageExport,
    /// PDF path and size in bytes; `None` when skipped after an image failure
    pub pdf: Option<(PathBuf, u64)>,
}

/// Options plus everything derived from them. Regeneration happens inside
/// [`Session::set_configuration`]: rasters first, then the document.
#[derive(Debug)]
pub struct Session {
    config: Config,
    labels: Vec<String>,
    rasters: RasterSet,
    document: DocumentState,
}

impl Session {
    pub fn new(config: Config) -> Result<Self> {
        let rasters = build_raster_set(config.leading_frame_bit)?;
        let mut session = Session { config, labels: byte_labels(), rasters, document: DocumentState::Stale };
        session.document.regenerate(&session.rasters, &session.config);
        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply `update` and rebuild what depends on it. A composition failure is
    /// not returned here; it is held in [`Session::document`].
    pub fn set_configuration(&mut self, update: ConfigUpdate) -> Result<DocumentStatus> {
        let mut next = self.config;
        let changes = next.apply(update);
        debug!(?update, ?changes, "configuration updated");

        // config is only committed once its rasters exist
        if changes.rasters {
            let rasters = build_raster_set(next.leading_frame_bit)?;
            self.document.invalidate();
            self.rasters = rasters;
        }
        self.config = next;
        if changes.document {
            self.document.regenerate(&self.rasters, &self.config);
        }
        Ok(self.document.status())
    }

    pub fn raster_set(&self) -> &RasterSet {
        &self.rasters
    }

    /// Enlarged barcode for the browsed byte.
    pub fn display_raster(&self, selection: Selection) -> Result<Raster> {
        render_display_raster(&self.rasters, selection.value(), DISPLAY_SCALE_X, DISPLAY_SCALE_Y)
    }

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    /// Labels for all 256 values, indexed by value.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn export_images(&self, dir: &Path) -> Result<ImageExport> {
        export_images(&self.rasters, dir)
    }

    pub fn export_document(&self, path: &Path) -> Result<u64> {
        let doc = self.document.document().ok_or(Error::DocumentNotReady)?;
        export_document(doc, path)
    }

    /// Write `root/images/<n>.png`, then `root/barcodes.pdf`. The PDF is skipped
    /// if any image failed.
    pub fn export(&self, root: &Path) -> Result<ExportSummary> {
        if !self.document.is_ready() {
            return Err(Error::DocumentNotReady);
        }
        info!("Export:\n{}", self.config);

        let images = self.export_images(&root.join(IMAGE_DIR))?;
        if let Some((value, err)) = images.first_failure() {
            warn!(value, %err, "skipping PDF after image failure");
            return Ok(ExportSummary { images, pdf: None });
        }

        let pdf_path = root.join(PDF_NAME);
        let size = self.export_document(&pdf_path)?;
        Ok(ExportSummary { images, pdf: Some((pdf_path, size)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_clamps() {
        assert_eq!(Selection::default().value(), 65);
        assert_eq!(Selection::new(255).next().value(), 255);
        assert_eq!(Selection::new(0).prev().value(), 0);
        assert_eq!(Selection::new(9).next().value(), 10);
        assert_eq!(Selection::clamped(300).value(), 255);
        assert_eq!(Selection::clamped(-4).value(), 0);
    }

    #[test]
    fn starts_ready_with_defaults() {
        let s = Session::new(Config::default()).unwrap();
        assert_eq!(s.document().status(), DocumentStatus::Ready);
        assert_eq!(s.raster_set().width(), 10);
        assert_eq!(s.labels()[65], "065 \\x41 'A'");
    }

    #[test]
    fn display_raster_uses_fixed_scale() {
        let s = Session::new(Config::default()).unwrap();
        let big = s.display_raster(Selection::default()).unwrap();
        assert_eq!((big.width(), big.height()), (10 * 30, 60));
    }

    #[test]
    fn lead_bit_toggle_rebuilds_rasters_and_document() {
        let mut s = Session::new(Config::default()).unwrap();
        let status = s.set_configuration(ConfigUpdate::default().leading_frame_bit(false)).unwrap();
        assert_eq!(status, DocumentStatus::Ready);
        assert_eq!(s.raster_set().width(), 8);
        let doc = s.document().document().unwrap();
        assert!(!doc.config().leading_frame_bit);
        assert_eq!(doc.pages()[3].raster.width(), 8);
    }

    #[test]
    fn config_and_rasters_change_together() {
        let mut s = Session::new(Config::default()).unwrap();
        let update = ConfigUpdate::default().leading_frame_bit(false).show_label(false);
        s.set_configuration(update).unwrap();
        assert!(!s.config().leading_frame_bit && !s.config().show_label);
        assert_eq!(s.raster_set().leading_frame_bit(), s.config().leading_frame_bit);
        assert_eq!(s.document().document().unwrap().config(), s.config());

        s.set_configuration(ConfigUpdate::default()).unwrap();
        assert_eq!(s.raster_set().leading_frame_bit(), s.config().leading_frame_bit);
    }

    #[test]
    fn border_toggle_keeps_rasters() {
        let mut s = Session::new(Config::default()).unwrap();
        let before = s.raster_set().clone();
        s.set_configuration(ConfigUpdate::default().show_border(false)).unwrap();
        assert_eq!(s.raster_set(), &before);
        assert!(s.document().document().unwrap().pages().iter().all(|p| p.border.is_none()));
    }
}
