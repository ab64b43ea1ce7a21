// Page geometry and rendering constants (PDF units: points)
pub const CM: f32 = 72.0 / 2.54;
pub const MM: f32 = CM / 10.0;

// A4 landscape
pub const PAGE_W: f32 = 29.7 * CM;
pub const PAGE_H: f32 = 21.0 * CM;

pub const MARGIN: f32 = 1.0 * CM;       // all four sides
pub const LABEL_INSET: f32 = 1.0 * CM;  // taken off the barcode height when labels are on
pub const BORDER_W: f32 = 0.5 * MM;     // stroke width and outset

pub const LABEL_FONT: &str = "Helvetica";
pub const LABEL_FONT_PT: f32 = 12.0;

pub const ACCENT_RGB: [u8; 3] = [255, 0, 0]; // border stroke
pub const LABEL_RGB: [u8; 3] = [0, 0, 0];

// Preview rescale factors for the browsed barcode
pub const DISPLAY_SCALE_X: u32 = 30;
pub const DISPLAY_SCALE_Y: u32 = 60;

pub const MAX_PREVIEW_PX: u32 = 16384; // longest side of a page preview

// Barcode row widths (data bits, data bits + leading "10")
pub const DATA_BITS: u32 = 8;
pub const FRAMED_BITS: u32 = 10;

pub const BLACK: u8 = 0;
pub const WHITE: u8 = 255;

// Export layout
pub const IMAGE_DIR: &str = "images";
pub const IMAGE_EXT: &str = "png";
pub const PDF_NAME: &str = "barcodes.pdf";
