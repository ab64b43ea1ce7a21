//! Byte barcode chart generator.
//! - Encodes each byte value 0..=255 as a row of black/white pixels (MSB first)
//! - Optional leading "10" frame marker (10 pixels instead of 8)
//! - Lays out one landscape A4 page per byte with optional border and label
//! - Exports `images/<n>.png` and a 256-page `barcodes.pdf`

pub mod barcode;
pub mod builder;
pub mod config;
pub mod consts;
pub mod error;
pub mod export;
pub mod graphics;
pub mod opener;
pub mod pdf;
pub mod session;

pub use barcode::{byte_labels, byte_value, describe_byte, encode_pattern};
pub use builder::{compose_document, Document, DocumentState, DocumentStatus, Page};
pub use config::{Config, ConfigUpdate};
pub use error::{Error, Result};
pub use export::{export_document, export_images, ImageExport};
pub use graphics::{build_raster_set, render_display_raster, render_page_preview, Raster, RasterSet};
pub use opener::{PathOpener, SystemOpener};
pub use session::{ExportSummary, Selection, Session};
