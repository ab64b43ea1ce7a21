//! Writing rasters and the composed document to disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::builder::Document;
use crate::consts::IMAGE_EXT;
use crate::error::{Error, Result};
use crate::graphics::RasterSet;
use crate::pdf::write_pdf;

/// Per-image outcome of [`export_images`], in ascending value order.
#[derive(Debug)]
pub struct ImageExport {
    pub dir: PathBuf,
    pub results: Vec<(u8, Result<PathBuf>)>,
}

impl ImageExport {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }

    pub fn written(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn first_failure(&self) -> Option<(u8, &Error)> {
        self.results.iter().find_map(|(v, r)| r.as_ref().err().map(|e| (*v, e)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (u8, &Error)> {
        self.results.iter().filter_map(|(v, r)| r.as_ref().err().map(|e| (*v, e)))
    }
}

/// `<dir>/<value>.png`
pub fn image_path(dir: &Path, value: u8) -> PathBuf {
    dir.join(format!("{}.{}", value, IMAGE_EXT))
}

/// Write every raster as its own image. A failed write is recorded and the
/// remaining images are still attempted. Only failing to create `dir` is fatal.
pub fn export_images(rasters: &RasterSet, dir: &Path) -> Result<ImageExport> {
    fs::create_dir_all(dir).map_err(|e| Error::ExportIo { path: dir.to_path_buf(), source: Box::new(e.into()) })?;

    let results: Vec<_> = rasters
        .iter()
        .map(|(value, raster)| {
            let path = image_path(dir, value);
            let res = raster
                .save(&path)
                .map(|_| path.clone())
                .map_err(|e| Error::ExportIo { path: path.clone(), source: Box::new(e.into()) });
            if let Err(err) = &res {
                warn!(%err, value, "image write failed");
            }
            (value, res)
        })
        .collect();

    let export = ImageExport { dir: dir.to_path_buf(), results };
    if export.is_success() {
        info!("Saved: {}/*.{}", dir.display(), IMAGE_EXT);
    }
    Ok(export)
}

/// Serialise the document to `path` and return the file size in bytes.
pub fn export_document(doc: &Document, path: &Path) -> Result<u64> {
    let wrap = |e: Error| Error::ExportIo { path: path.to_path_buf(), source: Box::new(e) };

    let file = File::create(path).map_err(|e| wrap(e.into()))?;
    let mut out = BufWriter::new(file);
    write_pdf(doc, &mut out).map_err(wrap)?;
    out.flush().map_err(|e| wrap(e.into()))?;

    let size = fs::metadata(path).map_err(|e| wrap(e.into()))?.len();
    info!("Saved: {} ({:.2}KB)", path.display(), size as f64 / 1024.0);
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::compose_document;
    use crate::config::Config;
    use crate::graphics::build_raster_set;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("byte_barcode_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn writes_one_png_per_value() {
        let dir = scratch("export_all");
        let set = build_raster_set(true).unwrap();
        let export = export_images(&set, &dir).unwrap();
        assert!(export.is_success());
        assert_eq!(export.written(), 256);

        let img = image::open(image_path(&dir, 65)).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (10, 1));
        assert_eq!(img.as_raw(), set.row(65));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn one_failed_write_does_not_stop_the_rest() {
        let dir = scratch("export_partial");
        fs::create_dir_all(image_path(&dir, 7)).unwrap();

        let set = build_raster_set(false).unwrap();
        let export = export_images(&set, &dir).unwrap();
        assert!(!export.is_success());
        assert_eq!(export.written(), 255);
        let (value, err) = export.first_failure().unwrap();
        assert_eq!(value, 7);
        assert!(matches!(err, Error::ExportIo { .. }));
        assert!(image_path(&dir, 8).is_file());
        assert!(image_path(&dir, 255).is_file());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn document_export_reports_size() {
        let dir = scratch("export_pdf");
        fs::create_dir_all(&dir).unwrap();
        let set = build_raster_set(true).unwrap();
        let doc = compose_document(&set, &Config::default()).unwrap();
        let path = dir.join("out.pdf");
        let size = export_document(&doc, &path).unwrap();
        assert_eq!(size, fs::metadata(&path).unwrap().len());
        assert!(size > 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn document_export_into_missing_dir_fails() {
        let dir = scratch("export_missing");
        let set = build_raster_set(true).unwrap();
        let doc = compose_document(&set, &Config::default()).unwrap();
        let err = export_document(&doc, &dir.join("nope").join("out.pdf")).unwrap_err();
        assert!(matches!(err, Error::ExportIo { .. }));
    }
}
