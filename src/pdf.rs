use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};

use crate::builder::{Document, Page};
use crate::consts::{LABEL_FONT, PAGE_H, PAGE_W};
use crate::error::Result;
use crate::graphics::Raster;

const FONT_KEY: &str = "F1";
const IMAGE_KEY: &str = "Im0";

fn op(name: &str, operands: Vec<Object>) -> Operation {
    Operation::new(name, operands)
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

fn rgb_operands(rgb: [u8; 3]) -> Vec<Object> {
    rgb.iter().map(|&c| real(c as f32 / 255.0)).collect()
}

/// Drawing operators for one page: barcode, then border, then label.
pub fn page_content(page: &Page) -> Content {
    let r = page.image;
    let mut ops = vec![
        op("q", vec![]),
        op("cm", vec![real(r.w), real(0.0), real(0.0), real(r.h), real(r.x), real(r.y)]),
        op("Do", vec![Object::Name(IMAGE_KEY.into())]),
        op("Q", vec![]),
    ];

    if let Some(border) = &page.border {
        let b = border.rect;
        ops.extend([
            op("q", vec![]),
            op("RG", rgb_operands(border.rgb)),
            op("w", vec![real(border.line_width)]),
            op("re", vec![real(b.x), real(b.y), real(b.w), real(b.h)]),
            op("S", vec![]),
            op("Q", vec![]),
        ]);
    }

    if let Some(label) = &page.label {
        ops.extend([
            op("q", vec![]),
            op("rg", rgb_operands(label.rgb)),
            op("BT", vec![]),
            op("Tf", vec![Object::Name(FONT_KEY.into()), real(label.size)]),
            op("Td", vec![real(label.x), real(label.y)]),
            op("Tj", vec![Object::string_literal(label.text.as_str())]),
            op("ET", vec![]),
            op("Q", vec![]),
        ]);
    }

    Content { operations: ops }
}

// 8-bit greyscale image XObject, drawn with hard pixel edges
fn image_xobject(raster: &Raster) -> Stream {
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => raster.width() as i64,
        "Height" => raster.height() as i64,
        "ColorSpace" => "DeviceGray",
        "BitsPerComponent" => 8i64,
        "Interpolate" => false,
    };
    Stream::new(dict, raster.as_raw().clone())
}

fn add_page(doc: &mut lopdf::Document, page: &Page, pages_id: ObjectId, font_id: ObjectId) -> Result<ObjectId> {
    let image_id = doc.add_object(image_xobject(&page.raster));
    let content = page_content(page).encode()?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    let resources = dictionary! {
        "Font" => dictionary! { FONT_KEY => font_id },
        "XObject" => dictionary! { IMAGE_KEY => image_id },
    };
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_W), real(PAGE_H)],
        "Contents" => content_id,
        "Resources" => resources,
    }))
}

/// Serialise a composed document as PDF, one page per byte value.
/// Content streams are left uncompressed.
pub fn write_pdf<W: Write>(doc: &Document, out: &mut W) -> Result<()> {
    let mut pdf = lopdf::Document::with_version("1.4");
    let pages_id = pdf.new_object_id();

    // All labels share one font
    let font_name = doc.pages().iter().find_map(|p| p.label.as_ref().map(|l| l.font)).unwrap_or(LABEL_FONT);
    let font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font_name,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(doc.len());
    for page in doc.pages() {
        kids.push(add_page(&mut pdf, page, pages_id, font_id)?.into());
    }

    let count = kids.len() as i64;
    pdf.objects.insert(pages_id, Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
    }));
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    pdf.save_to(out)?;
    Ok(())
}

pub fn pdf_bytes(doc: &Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_pdf(doc, &mut buf)?;
    Ok(buf)
}
