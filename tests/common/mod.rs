//! Synthetic PDFs for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

const FONT_SIZE: i64 = 12;

/// A piece of text placed at an absolute position.
pub struct Placed {
    pub text: String,
    pub x: i64,
    pub y: i64,
}

pub fn at(text: &str, x: i64, y: i64) -> Placed {
    Placed {
        text: text.to_string(),
        x,
        y,
    }
}

/// Page whose lines are stacked at the left margin, top to bottom.
pub fn text_page(lines: &[&str]) -> Vec<Placed> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| at(line, 72, 750 - 20 * i as i64))
        .collect()
}

/// Page holding one grid: rows 20pt apart, columns 130pt apart.
pub fn table_page(rows: &[&[&str]], top: i64) -> Vec<Placed> {
    let mut placed = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            placed.push(at(cell, 72 + 130 * c as i64, top - 20 * r as i64));
        }
    }
    placed
}

/// Build a PDF where every placed string is its own `BT ... ET` block.
pub fn build_pdf(pages: &[Vec<Placed>]) -> Vec<u8> {
    let pages: Vec<Vec<Operation>> = pages
        .iter()
        .map(|page| {
            let mut operations = Vec::new();
            for item in page {
                operations.push(Operation::new("BT", vec![]));
                operations.push(set_font());
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Integer(item.x), Object::Integer(item.y)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(item.text.as_str())],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            operations
        })
        .collect();
    build_pdf_from_operations(&pages)
}

/// `/F1 12 Tf`, the font every synthetic page uses.
pub fn set_font() -> Operation {
    Operation::new(
        "Tf",
        vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)],
    )
}

/// Build a PDF from raw content stream operations, one list per page.
pub fn build_pdf_from_operations(pages: &[Vec<Operation>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content {
            operations: operations.clone(),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}
