//! Minimal PDF writer for marker sheets.
//!
//! Every raster becomes a DeviceGray 8-bit image XObject (Flate compressed)
//! that pages reference by placement. Page coordinates are given in
//! millimetres from the top-left corner and converted to PDF points with the
//! y axis flipped.

use crate::{PageGeometry, Placement, SheetError};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GrayImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use std::path::Path;

const PT_PER_MM: f64 = 72.0 / 25.4;

fn real(v: f64) -> Object {
    Object::Real(v as _)
}

/// Incrementally builds a multi-page PDF of placed images.
pub struct PdfSheetWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    geometry: PageGeometry,
}

impl PdfSheetWriter {
    pub fn new(geometry: PageGeometry) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            geometry,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Embed `img` once; the returned id can be placed on any number of pages.
    pub fn add_image(&mut self, img: &GrayImage) -> Result<ObjectId, SheetError> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(img.as_raw())?;
        let data = enc.finish()?;

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(img.width() as i64),
                "Height" => Object::Integer(img.height() as i64),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "FlateDecode",
            },
            data,
        );
        Ok(self.doc.add_object(stream))
    }

    /// Append a page drawing each image at its placement.
    pub fn add_page(&mut self, items: &[(ObjectId, Placement)]) -> Result<(), SheetError> {
        let page_h = self.geometry.height_mm;
        let mut xobjects = Dictionary::new();
        let mut operations = Vec::with_capacity(items.len() * 4);

        for &(image_id, p) in items {
            let name = format!("M{}", image_id.0);
            xobjects.set(name.clone(), Object::Reference(image_id));

            let side = p.size_mm * PT_PER_MM;
            let x = p.x_mm * PT_PER_MM;
            let y = (page_h - p.y_mm - p.size_mm) * PT_PER_MM;
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![real(side), real(0.0), real(0.0), real(side), real(x), real(y)],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "XObject" => xobjects },
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Finish the page tree and write the document to `path`.
    pub fn save(mut self, path: impl AsRef<Path>) -> Result<(), SheetError> {
        let media_box = vec![
            real(0.0),
            real(0.0),
            real(self.geometry.width_mm * PT_PER_MM),
            real(self.geometry.height_mm * PT_PER_MM),
        ];
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(self.page_ids.len() as i64),
            "MediaBox" => media_box,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.save(path.as_ref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn placement(x_mm: f64, y_mm: f64) -> Placement {
        Placement {
            page: 0,
            x_mm,
            y_mm,
            size_mm: 70.0,
            request_index: 0,
        }
    }

    fn count_images(doc: &Document) -> usize {
        doc.objects
            .values()
            .filter(|o| match o {
                Object::Stream(s) => {
                    let subtype = s.dict.get(b"Subtype");
                    matches!(subtype, Ok(Object::Name(n)) if n.as_slice() == b"Image")
                }
                _ => false,
            })
            .count()
    }

    #[test]
    fn writes_pages_sharing_one_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sheet.pdf");

        let mut writer = PdfSheetWriter::new(PageGeometry::a4());
        let img = GrayImage::from_pixel(16, 16, Luma([0]));
        let id = writer.add_image(&img).expect("image");
        writer
            .add_page(&[(id, placement(15.0, 15.0)), (id, placement(85.0, 15.0))])
            .expect("page 1");
        writer.add_page(&[(id, placement(15.0, 15.0))]).expect("page 2");
        assert_eq!(writer.page_count(), 2);
        writer.save(&path).expect("save");

        let doc = Document::load(&path).expect("reload");
        assert_eq!(doc.get_pages().len(), 2);
        assert_eq!(count_images(&doc), 1);
    }

    #[test]
    fn empty_page_is_still_a_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.pdf");
        let mut writer = PdfSheetWriter::new(PageGeometry::a4());
        writer.add_page(&[]).expect("page");
        writer.save(&path).expect("save");

        let doc = Document::load(&path).expect("reload");
        assert_eq!(doc.get_pages().len(), 1);
    }
}
