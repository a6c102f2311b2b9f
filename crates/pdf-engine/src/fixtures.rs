//! Small PDFs built in memory, for tests.

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// A document with `pages` empty pages, each with a `width` x `height` media box.
pub fn sample_pdf(pages: u32, width: f32, height: f32) -> Vec<u8> {
    build(pages, |pages_id, content_id| {
        dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                dimension(width),
                dimension(height),
            ],
        }
    })
}

/// A document whose pages carry no media box at all.
pub fn sample_pdf_without_media_box(pages: u32) -> Vec<u8> {
    build(pages, |pages_id, content_id| {
        dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }
    })
}

/// Whole-point sizes are written as integers, the way most producers do.
fn dimension(points: f32) -> Object {
    if points.fract() == 0.0 && points.abs() < i64::MAX as f32 {
        Object::Integer(points as i64)
    } else {
        Object::Real(points.into())
    }
}

fn build(pages: u32, page: impl Fn(ObjectId, ObjectId) -> lopdf::Dictionary) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(pages as usize);
    for _ in 0..pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(page(pages_id, content_id));
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => i64::from(pages),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("in-memory fixture should serialize");
    bytes
}
