//! In-memory PDF fixtures built with lopdf.

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// Content placed on a fixture page.
#[derive(Clone)]
pub enum PageSpec {
    /// Uncompressed DeviceRGB image filled with one color.
    Rgb([u8; 3]),
    /// Uncompressed DeviceGray image.
    Gray(u8),
    /// DeviceCMYK image; the raw bytes are given per pixel.
    Cmyk([u8; 4]),
    /// JPEG-encoded RGB image filled with one color.
    JpegRgb([u8; 3]),
    /// JPEG-encoded grayscale image.
    JpegGray(u8),
    /// FlateDecode-compressed DeviceRGB image.
    FlateRgb([u8; 3]),
    /// FlateDecode-compressed DeviceGray image.
    FlateGray(u8),
    /// One-bit stencil mask without a color space.
    StencilMask,
    /// RGB image whose declared size overflows any sample buffer.
    OversizedRgb,
    /// Text only, no images.
    Blank,
}

const SIDE: u32 = 16;

fn image_stream(spec: &PageSpec) -> Option<Stream> {
    let base = |color_space: &str, bits: i64| -> Dictionary {
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => SIDE as i64,
            "Height" => SIDE as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => bits,
        }
    };
    let pixels = (SIDE * SIDE) as usize;

    match spec {
        PageSpec::Rgb(rgb) => Some(Stream::new(base("DeviceRGB", 8), rgb.repeat(pixels))),
        PageSpec::Gray(level) => Some(Stream::new(base("DeviceGray", 8), vec![*level; pixels])),
        PageSpec::Cmyk(cmyk) => Some(Stream::new(base("DeviceCMYK", 8), cmyk.repeat(pixels))),
        PageSpec::JpegRgb(rgb) => {
            let img = ImageBuffer::from_pixel(SIDE, SIDE, Rgb(*rgb));
            let mut dict = base("DeviceRGB", 8);
            dict.set("Filter", "DCTDecode");
            Some(Stream::new(dict, encode_jpeg(DynamicImage::ImageRgb8(img))))
        }
        PageSpec::JpegGray(level) => {
            let img = ImageBuffer::from_pixel(SIDE, SIDE, Luma([*level]));
            let mut dict = base("DeviceGray", 8);
            dict.set("Filter", "DCTDecode");
            Some(Stream::new(dict, encode_jpeg(DynamicImage::ImageLuma8(img))))
        }
        PageSpec::FlateRgb(rgb) => Some(compressed(base("DeviceRGB", 8), rgb.repeat(pixels))),
        PageSpec::FlateGray(level) => {
            Some(compressed(base("DeviceGray", 8), vec![*level; pixels]))
        }
        PageSpec::StencilMask => {
            let dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => SIDE as i64,
                "Height" => SIDE as i64,
                "ImageMask" => true,
            };
            Some(Stream::new(dict, vec![0xAA; pixels / 8]))
        }
        PageSpec::OversizedRgb => {
            let mut dict = base("DeviceRGB", 8);
            dict.set("Width", i64::from(u32::MAX));
            dict.set("Height", i64::from(u32::MAX));
            Some(Stream::new(dict, vec![0; 3]))
        }
        PageSpec::Blank => None,
    }
}

fn compressed(dict: Dictionary, content: Vec<u8>) -> Stream {
    let mut stream = Stream::new(dict, content);
    stream.compress().expect("compress stream");
    assert!(stream.dict.has(b"Filter"), "fixture stream left uncompressed");
    stream
}

fn encode_jpeg(img: DynamicImage) -> Vec<u8> {
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), ImageFormat::Jpeg)
        .expect("encode jpeg");
    data
}

/// Build a PDF with one page per spec.
pub fn build_pdf(specs: &[PageSpec]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();

    for spec in specs {
        let mut resources = Dictionary::new();
        let content: &[u8] = if let Some(stream) = image_stream(spec) {
            let image_id = doc.add_object(stream);
            resources.set("XObject", dictionary! { "Im0" => image_id });
            b"q 595 0 0 842 0 0 cm /Im0 Do Q"
        } else {
            b"BT ET"
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.to_vec()));
        let resources_id = doc.add_object(resources);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::from(page_id));
    }

    finish(doc, pages_id, kids, Dictionary::new())
}

/// Build a one-page PDF whose image resources live on the page tree root.
pub fn build_pdf_with_inherited_resources(spec: &PageSpec) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(image_stream(spec).expect("spec with an image"));
    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        b"q 595 0 0 842 0 0 cm /Im0 Do Q".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let inherited = dictionary! {
        "Resources" => dictionary! { "XObject" => dictionary! { "Im0" => image_id } },
    };
    finish(doc, pages_id, vec![page_id.into()], inherited)
}

fn finish(
    mut doc: Document,
    pages_id: lopdf::ObjectId,
    kids: Vec<Object>,
    mut pages: Dictionary,
) -> Vec<u8> {
    pages.set("Type", "Pages");
    pages.set("Count", kids.len() as i64);
    pages.set("Kids", kids);
    pages.set(
        "MediaBox",
        vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(595),
            Object::Integer(842),
        ],
    );
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).expect("save pdf");
    data
}
