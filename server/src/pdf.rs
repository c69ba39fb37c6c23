use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use paindraw_shared::{DataUrl, ExportRequest};

use crate::error::SubmitError;

pub const PAGE_WIDTH: i64 = 600;
pub const PAGE_HEIGHT: i64 = 800;
/// Placement of the drawing on the page: `[x, y, width, height]`.
pub const IMAGE_BOX: [i64; 4] = [50, 0, 500, 700];
pub const FONT_SIZE: i64 = 12;

const IMAGE_NAME: &str = "Im1";
const FONT_NAME: &str = "F1";

/// Baseline origin for each labelled field, above the drawing.
fn field_origin(label: &str) -> Option<(i64, i64)> {
    match label {
        "Name" => Some((50, 770)),
        "Date" => Some((320, 770)),
        "DOB" => Some((50, 750)),
        "Examiner" => Some((320, 750)),
        _ => None,
    }
}

/// Standard 14 fonts only cover a single-byte encoding; anything beyond
/// Latin-1 becomes `?`.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

fn add_image(doc: &mut Document, image: &DynamicImage) -> ObjectId {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8i64,
    };
    if image.color().has_alpha() {
        let alpha = image
            .to_rgba8()
            .pixels()
            .map(|pixel| pixel[3])
            .collect::<Vec<u8>>();
        let mask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
            },
            alpha,
        ));
        image_dict.set("SMask", mask_id);
    }
    doc.add_object(Stream::new(image_dict, rgb.into_raw()))
}

fn page_content(fields: &[(&str, &str)]) -> Result<Vec<u8>, SubmitError> {
    let [x, y, width, height] = IMAGE_BOX;
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0i64.into(),
                0i64.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ];
    for (label, value) in fields {
        let Some((x, y)) = field_origin(label) else {
            continue;
        };
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_NAME.as_bytes().to_vec()), FONT_SIZE.into()],
            ),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(latin1(&format!("{label}: {value}")))],
            ),
            Operation::new("ET", vec![]),
        ]);
    }
    Ok(Content { operations }.encode()?)
}

/// Renders the single-page PDF for an export request: the drawing stretched
/// over `IMAGE_BOX` plus any filled-in text fields.
pub fn build_pdf(request: &ExportRequest) -> Result<Vec<u8>, SubmitError> {
    let payload = DataUrl::parse(&request.image)?;
    if payload.bytes.is_empty() {
        return Err(SubmitError::BadRequest("image payload is empty".to_string()));
    }
    let decoded = image::load_from_memory(&payload.bytes)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let image_id = add_image(&mut doc, &decoded);
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        page_content(&request.text_fields())?,
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
            "Font" => dictionary! { FONT_NAME => font_id },
        },
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    tracing::debug!(
        width = decoded.width(),
        height = decoded.height(),
        bytes = out.len(),
        "pdf assembled"
    );
    Ok(out)
}
