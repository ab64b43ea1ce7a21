use image::{DynamicImage, ImageBuffer, Luma, Rgb, RgbImage};
use rusttype::{point, Font, Scale};
use tracing::debug;

use crate::barcode::{check_width, encode_pattern, pattern_width};
use crate::builder::{Page, Rect};
use crate::consts::{MAX_PREVIEW_PX, PAGE_H, PAGE_W};
use crate::error::{Error, Result};

/// Single-channel image, 0 = black, 255 = white.
pub type Raster = ImageBuffer<Luma<u8>, Vec<u8>>;

/// One 1-pixel-tall barcode per byte value, all the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSet {
    width: u32,
    rasters: Vec<Raster>,
}

impl RasterSet {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn leading_frame_bit(&self) -> bool {
        self.width == pattern_width(true)
    }

    pub fn get(&self, value: u8) -> &Raster {
        &self.rasters[value as usize]
    }

    /// Pixel row of one barcode.
    pub fn row(&self, value: u8) -> &[u8] {
        self.get(value).as_raw()
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// `(value, raster)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Raster)> {
        (0..=u8::MAX).zip(self.rasters.iter())
    }

    #[cfg(test)]
    pub(crate) fn from_rasters(width: u32, rasters: Vec<Raster>) -> Self {
        assert_eq!(rasters.len(), 256);
        Self { width, rasters }
    }
}

/// Wrap an encoded pixel row as a `width x 1` raster.
pub fn raster_from_row(row: Vec<u8>) -> Result<Raster> {
    let width = check_width(row.len() as u32)?;
    ImageBuffer::from_raw(width, 1, row).ok_or(Error::UnsupportedWidth { width })
}

/// Encode all 256 values. Always a full replacement of any previous set.
pub fn build_raster_set(leading_frame_bit: bool) -> Result<RasterSet> {
    debug!(leading_frame_bit, "generating barcode rasters");
    let width = check_width(pattern_width(leading_frame_bit))?;
    let rasters = (0..=u8::MAX)
        .map(|v| raster_from_row(encode_pattern(v, leading_frame_bit)))
        .collect::<Result<Vec<_>>>()?;
    Ok(RasterSet { width, rasters })
}

/// Enlarge one barcode by pixel replication for on-screen preview.
pub fn render_display_raster(rasters: &RasterSet, value: u8, scale_x: u32, scale_y: u32) -> Result<Raster> {
    if scale_x == 0 || scale_y == 0 {
        return Err(Error::InvalidScale { x: scale_x, y: scale_y });
    }
    let src = rasters.get(value);
    let (w, h) = src
        .width()
        .checked_mul(scale_x)
        .zip(src.height().checked_mul(scale_y))
        .ok_or(Error::InvalidScale { x: scale_x, y: scale_y })?;
    Ok(ImageBuffer::from_fn(w, h, |x, y| {
        *src.get_pixel(x / scale_x, y / scale_y)
    }))
}

/// Nearest-neighbour stretch to an arbitrary size (no blending).
fn stretch_nearest(src: &Raster, w: u32, h: u32) -> Raster {
    let (sw, sh) = (src.width() as u64, src.height() as u64);
    ImageBuffer::from_fn(w.max(1), h.max(1), |x, y| {
        let sx = (x as u64 * sw / w.max(1) as u64).min(sw - 1);
        let sy = (y as u64 * sh / h.max(1) as u64).min(sh - 1);
        *src.get_pixel(sx as u32, sy as u32)
    })
}

/// Text rendered as a tight 1-bit bitmap.
pub struct TextLine {
    pub image: Raster,
    /// Row of the baseline inside `image`
    pub baseline: u32,
}

/// Render one line of text as a tight black-on-white bitmap.
pub fn render_text_line(text: &str, font_bytes: &[u8], font_px: f32, pad_lr: u32) -> Result<TextLine> {
    let font = Font::try_from_bytes(font_bytes).ok_or(Error::Font)?;

    let scale = Scale { x: font_px, y: font_px };
    let vm = font.v_metrics(scale);
    let ascent = vm.ascent.ceil();
    let descent = vm.descent.floor();
    let line_h = (ascent - descent).ceil().max(1.0) as u32;

    // Measure tight width
    let glyphs: Vec<_> = font.layout(text, scale, point(pad_lr as f32, ascent)).collect();
    let text_w = glyphs.iter().rev()
        .find_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x as f32))
        .unwrap_or(0.0)
        .ceil() as u32;

    let w = (text_w + pad_lr).max(2);
    let mut img = ImageBuffer::from_pixel(w, line_h, Luma([255u8]));

    // Hard threshold keeps the bitmap pure black/white
    for g in glyphs {
        if let Some(bb) = g.pixel_bounding_box() {
            g.draw(|x, y, v| {
                if v > 0.5 {
                    let px = x as i32 + bb.min.x;
                    let py = y as i32 + bb.min.y;
                    if px >= 0 && py >= 0 && (px as u32) < w && (py as u32) < line_h {
                        img.put_pixel(px as u32, py as u32, Luma([0]));
                    }
                }
            });
        }
    }

    Ok(TextLine { image: img, baseline: ascent as u32 })
}

// Page rect (points, origin bottom-left) -> pixel box (x0, y0, x1, y1), origin top-left
fn to_pixels(r: &Rect, px_per_pt: f32) -> (i64, i64, i64, i64) {
    let x0 = (r.x * px_per_pt).round() as i64;
    let x1 = ((r.x + r.w) * px_per_pt).round() as i64;
    let y0 = ((PAGE_H - r.y - r.h) * px_per_pt).round() as i64;
    let y1 = ((PAGE_H - r.y) * px_per_pt).round() as i64;
    (x0, y0, x1, y1)
}

fn fill_rect(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for y in y0.max(0)..y1.min(h) {
        for x in x0.max(0)..x1.min(w) {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Rasterise one composed page for print preview.
/// The label is drawn only when a TrueType font is supplied.
pub fn render_page_preview(page: &Page, px_per_pt: f32, font_bytes: Option<&[u8]>) -> Result<RgbImage> {
    if !px_per_pt.is_finite() || px_per_pt <= 0.0 || PAGE_W * px_per_pt > MAX_PREVIEW_PX as f32 {
        return Err(Error::InvalidPreviewScale(px_per_pt));
    }
    let w = (PAGE_W * px_per_pt).round().max(1.0) as u32;
    let h = (PAGE_H * px_per_pt).round().max(1.0) as u32;
    let mut canvas = RgbImage::from_pixel(w, h, Rgb([255, 255, 255]));

    let (x0, y0, x1, y1) = to_pixels(&page.image, px_per_pt);
    let bars = stretch_nearest(&page.raster, (x1 - x0).max(1) as u32, (y1 - y0).max(1) as u32);
    let bars = DynamicImage::ImageLuma8(bars).to_rgb8();
    image::imageops::overlay(&mut canvas, &bars, x0, y0);

    if let Some(border) = &page.border {
        let (bx0, by0, bx1, by1) = to_pixels(&border.rect, px_per_pt);
        let t = (border.line_width * px_per_pt).round().max(1.0) as i64;
        let half = t / 2;
        let color = Rgb(border.rgb);
        fill_rect(&mut canvas, bx0 - half, by0 - half, bx1 + half + 1, by0 - half + t, color);
        fill_rect(&mut canvas, bx0 - half, by1 - half, bx1 + half + 1, by1 - half + t, color);
        fill_rect(&mut canvas, bx0 - half, by0 - half, bx0 - half + t, by1 + half + 1, color);
        fill_rect(&mut canvas, bx1 - half, by0 - half, bx1 - half + t, by1 + half + 1, color);
    }

    if let (Some(label), Some(font)) = (&page.label, font_bytes) {
        let line = render_text_line(&label.text, font, label.size * px_per_pt, 0)?;
        let left = (label.x * px_per_pt).round() as i64;
        let top = ((PAGE_H - label.y) * px_per_pt).round() as i64 - line.baseline as i64;
        for (x, y, px) in line.image.enumerate_pixels() {
            let (cx, cy) = (left + x as i64, top + y as i64);
            if px.0[0] < 128 && cx >= 0 && cy >= 0 && cx < w as i64 && cy < h as i64 {
                canvas.put_pixel(cx as u32, cy as u32, Rgb(label.rgb));
            }
        }
    }

    debug!(value = page.value, width = w, height = h, "rendered page preview");
    Ok(canvas)
}
