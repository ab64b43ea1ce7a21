//! End-to-end behaviour through the session API: reconfigure, browse, export.

use std::fs;
use std::path::PathBuf;

use byte_barcode::{pdf::pdf_bytes, Config, ConfigUpdate, DocumentStatus, Selection, Session};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("byte_barcode_it_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_rows_follow_lead_bit_setting() {
    let mut session = Session::new(Config::default()).expect("session");

    session.set_configuration(ConfigUpdate::default().leading_frame_bit(true)).unwrap();
    assert_eq!(session.raster_set().row(65), &[0, 255, 255, 0, 255, 255, 255, 255, 255, 0]);

    session.set_configuration(ConfigUpdate::default().leading_frame_bit(false)).unwrap();
    // 0 has no set bits, so every pixel is white
    assert_eq!(session.raster_set().row(0), &[255; 8]);
    assert_eq!(session.raster_set().row(255), &[0; 8]);
    assert!(session.raster_set().iter().all(|(_, r)| r.width() == 8));
}

#[test]
fn test_same_configuration_gives_identical_output() {
    let mut session = Session::new(Config::default()).expect("session");
    let rasters = session.raster_set().clone();
    let pdf = pdf_bytes(session.document().document().unwrap()).unwrap();

    let same = ConfigUpdate::default().leading_frame_bit(true).show_border(true).show_label(true);
    assert_eq!(session.set_configuration(same).unwrap(), DocumentStatus::Ready);

    assert_eq!(session.raster_set(), &rasters);
    assert_eq!(pdf_bytes(session.document().document().unwrap()).unwrap(), pdf);
}

#[test]
fn test_toggle_and_back_restores_document() {
    let mut session = Session::new(Config::default()).expect("session");
    let initial = pdf_bytes(session.document().document().unwrap()).unwrap();

    session.set_configuration(ConfigUpdate::default().show_label(false)).unwrap();
    let unlabeled = pdf_bytes(session.document().document().unwrap()).unwrap();
    assert_ne!(unlabeled, initial);

    session.set_configuration(ConfigUpdate::default().show_label(true)).unwrap();
    assert_eq!(pdf_bytes(session.document().document().unwrap()).unwrap(), initial);
}

#[test]
fn test_browse_preview() {
    let session = Session::new(Config { leading_frame_bit: false, ..Config::default() }).expect("session");
    let sel = Selection::default().next(); // 'B' = 0b01000010
    let big = session.display_raster(sel).unwrap();
    assert_eq!((big.width(), big.height()), (8 * 30, 60));
    let column = |bit: u32| big.get_pixel(bit * 30 + 15, 30).0[0];
    assert_eq!(column(0), 255);
    assert_eq!(column(1), 0);
    assert_eq!(column(6), 0);
    assert_eq!(column(7), 255);
}

#[test]
fn test_full_export() {
    let root = scratch("full_export");
    let session = Session::new(Config::default()).expect("session");

    let summary = session.export(&root).expect("export");
    assert!(summary.images.is_success());
    let (pdf_path, size) = summary.pdf.expect("pdf written");
    assert_eq!(pdf_path, root.join("barcodes.pdf"));
    assert_eq!(size, fs::metadata(&pdf_path).unwrap().len());

    for v in [0u32, 65, 255] {
        assert!(root.join("images").join(format!("{}.png", v)).is_file());
    }

    let parsed = lopdf::Document::load(&pdf_path).unwrap();
    assert_eq!(parsed.get_pages().len(), 256);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_pdf_skipped_after_image_failure() {
    let root = scratch("partial_export");
    fs::create_dir_all(root.join("images").join("3.png")).unwrap();

    let session = Session::new(Config::default()).expect("session");
    let summary = session.export(&root).expect("export");
    assert_eq!(summary.images.first_failure().map(|(v, _)| v), Some(3));
    assert_eq!(summary.images.written(), 255);
    assert!(summary.pdf.is_none());
    assert!(!root.join("barcodes.pdf").exists());

    fs::remove_dir_all(&root).unwrap();
}
