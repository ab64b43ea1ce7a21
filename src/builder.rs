//! Page layout and document assembly.
//!
//! Geometry is in PDF points with the origin at the bottom-left corner of a
//! landscape A4 page. The barcode's pixel row runs along the long (horizontal)
//! axis and is stretched to the full printable width; its single row is
//! stretched over the printable height.

use tracing::{debug, error};

use crate::barcode::{check_width, describe_byte};
use crate::config::Config;
use crate::consts::{
    ACCENT_RGB, BORDER_W, LABEL_FONT, LABEL_FONT_PT, LABEL_INSET, LABEL_RGB, MARGIN, PAGE_H, PAGE_W,
};
use crate::error::{Error, Result};
use crate::graphics::{Raster, RasterSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Grow by `d` on every side.
    pub fn outset(&self, d: f32) -> Rect {
        Rect { x: self.x - d, y: self.y - d, w: self.w + 2.0 * d, h: self.h + 2.0 * d }
    }
}

/// Unfilled stroked rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub rect: Rect,
    pub line_width: f32,
    pub rgb: [u8; 3],
}

/// One line of text; `(x, y)` is the left end of the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font: &'static str,
    pub size: f32,
    pub rgb: [u8; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub value: u8,
    pub raster: Raster,
    /// Where the barcode is drawn
    pub image: Rect,
    pub border: Option<Border>,
    pub label: Option<Label>,
}

/// The full page area inside the margins.
pub fn printable_rect() -> Rect {
    Rect { x: MARGIN, y: MARGIN, w: PAGE_W - 2.0 * MARGIN, h: PAGE_H - 2.0 * MARGIN }
}

/// Barcode placement for the given options. A label takes a strip off the top.
pub fn image_rect(config: &Config) -> Rect {
    let mut r = printable_rect();
    if config.show_label {
        r.h -= LABEL_INSET;
    }
    r
}

/// Lay out the page for one byte value.
pub fn compose_page(rasters: &RasterSet, value: u8, config: &Config) -> Result<Page> {
    let raster = rasters.get(value);
    check_width(raster.width())?;
    if raster.width() != rasters.width() || raster.height() != 1 {
        return Err(Error::UnsupportedWidth { width: raster.width() });
    }

    let image = image_rect(config);
    let border = config.show_border.then(|| Border {
        rect: image.outset(BORDER_W),
        line_width: BORDER_W,
        rgb: ACCENT_RGB,
    });
    let label = config.show_label.then(|| {
        let area = printable_rect();
        Label {
            text: describe_byte(value),
            x: area.x,
            y: area.y + area.h,
            font: LABEL_FONT,
            size: LABEL_FONT_PT,
            rgb: LABEL_RGB,
        }
    });

    Ok(Page { value, raster: raster.clone(), image, border, label })
}

/// 256 laid-out pages, value 0 first. Only exists once every page succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    config: Config,
    pages: Vec<Page>,
}

impl Document {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Compose every page in ascending order. The first failing page aborts the
/// build and nothing is kept.
pub fn compose_document(rasters: &RasterSet, config: &Config) -> Result<Document> {
    let pages = (0..=u8::MAX)
        .map(|value| {
            compose_page(rasters, value, config)
                .map_err(|e| Error::CompositionFailure { value, source: Box::new(e) })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Document { config: *config, pages })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    Stale,
    Generating,
    Ready,
    Failed,
}

/// Readiness of the composed document.
#[derive(Debug, Default)]
pub enum DocumentState {
    #[default]
    Stale,
    Generating,
    Ready(Document),
    Failed(Error),
}

impl DocumentState {
    pub fn status(&self) -> DocumentStatus {
        match self {
            DocumentState::Stale => DocumentStatus::Stale,
            DocumentState::Generating => DocumentStatus::Generating,
            DocumentState::Ready(_) => DocumentStatus::Ready,
            DocumentState::Failed(_) => DocumentStatus::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DocumentState::Ready(_))
    }

    pub fn document(&self) -> Option<&Document> {
        match self {
            DocumentState::Ready(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            DocumentState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Mark the current document out of date (e.g. the rasters changed).
    pub fn invalidate(&mut self) {
        *self = DocumentState::Stale;
    }

    /// Discard whatever is held and compose from scratch.
    pub fn regenerate(&mut self, rasters: &RasterSet, config: &Config) -> DocumentStatus {
        *self = DocumentState::Generating;
        debug!(?config, "composing document");
        *self = match compose_document(rasters, config) {
            Ok(doc) => DocumentState::Ready(doc),
            Err(err) => {
                error!(%err, "document composition failed");
                DocumentState::Failed(err)
            }
        };
        self.status()
    }
}
