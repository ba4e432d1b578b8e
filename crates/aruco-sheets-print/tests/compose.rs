use aruco_sheets_print::{
    canvas_side, compose_sheet, marker_file_name, MarkerRequest, PageGeometry, SheetComposer,
    SheetConfig,
};
use approx::{assert_abs_diff_eq, assert_relative_eq};
use lopdf::content::Content;
use lopdf::Document;
use std::collections::BTreeSet;

const PT_PER_MM: f64 = 72.0 / 25.4;

/// Decode the `cm` operands and `Do` names of every page, in page order.
fn page_draws(doc: &Document) -> Vec<Vec<([f64; 6], Vec<u8>)>> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let bytes = doc.get_page_content(page_id).expect("page content");
            let content = Content::decode(&bytes).expect("decode content");
            let mut draws = Vec::new();
            let mut matrix = None;
            for op in &content.operations {
                match op.operator.as_str() {
                    "cm" => {
                        let mut m = [0.0; 6];
                        for (slot, operand) in m.iter_mut().zip(&op.operands) {
                            *slot = operand.as_float().expect("numeric operand") as f64;
                        }
                        matrix = Some(m);
                    }
                    "Do" => {
                        let name = op.operands[0].as_name().expect("xobject name").to_vec();
                        draws.push((matrix.take().expect("cm before Do"), name));
                    }
                    _ => {}
                }
            }
            draws
        })
        .collect()
}

fn pairs(n: usize, resolution: u32) -> Vec<MarkerRequest> {
    (0..n)
        .flat_map(|_| {
            [
                MarkerRequest::new(4, 2, resolution),
                MarkerRequest::new(4, 1, resolution),
            ]
        })
        .collect()
}

#[test]
fn thirty_markers_produce_five_pdf_pages_and_two_pngs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_dir = dir.path().join("ArucoMarkers");
    let requests = pairs(15, 200);

    let out = compose_sheet(&requests, 70.0, &out_dir).expect("compose");
    assert_eq!(out.layout.page_count(), 5);
    assert_eq!(out.marker_paths.len(), 30);
    assert_eq!(out.pdf_path, out_dir.join("ArucoMarkers.pdf"));

    let doc = lopdf::Document::load(&out.pdf_path).expect("reload pdf");
    assert_eq!(doc.get_pages().len(), 5);

    for id in [1, 2] {
        let png = image::open(out_dir.join(marker_file_name(id))).expect("png");
        let side = canvas_side(200, 4);
        assert_eq!((png.width(), png.height()), (side, side));
    }
    let pngs = std::fs::read_dir(&out_dir)
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "png"))
        .count();
    assert_eq!(pngs, 2);
}

#[test]
fn page_content_places_markers_row_major_in_points() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = compose_sheet(&pairs(4, 120), 70.0, dir.path()).expect("compose");
    let doc = Document::load(&out.pdf_path).expect("reload pdf");
    let pages = page_draws(&doc);

    // 2 per row, 3 rows: 6 on the first page, 2 on the second.
    assert_eq!(pages.iter().map(Vec::len).collect::<Vec<_>>(), vec![6, 2]);

    let side = 70.0 * PT_PER_MM;
    let (m, _) = &pages[0][0];
    let expected = [side, 0.0, 0.0, side, 15.0 * PT_PER_MM, 212.0 * PT_PER_MM];
    for (got, want) in m.iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 0.01);
    }
    assert_abs_diff_eq!(m[4], 42.52, epsilon = 0.01);
    assert_abs_diff_eq!(m[5], 600.94, epsilon = 0.01);

    // Origins walk left to right, then down the page (PDF y grows upwards).
    let origins: Vec<(f64, f64)> = pages[0].iter().map(|(m, _)| (m[4], m[5])).collect();
    for (k, &(x, y)) in origins.iter().enumerate() {
        let (row, col) = (k / 2, k % 2);
        assert_abs_diff_eq!(x, (15.0 + 70.0 * col as f64) * PT_PER_MM, epsilon = 0.01);
        assert_abs_diff_eq!(y, (212.0 - 70.0 * row as f64) * PT_PER_MM, epsilon = 0.01);
    }

    // Requests alternate ids 2 and 1; each id draws one shared XObject.
    let names: Vec<&[u8]> = pages.iter().flatten().map(|(_, n)| n.as_slice()).collect();
    assert_eq!(names.iter().collect::<BTreeSet<_>>().len(), 2);
    for pair in names.chunks(2) {
        assert_ne!(pair[0], pair[1]);
    }
    assert!(names.iter().step_by(2).all(|n| *n == names[0]));
}

#[test]
fn composition_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let requests = pairs(4, 120);
    let a = compose_sheet(&requests, 55.0, dir.path()).expect("first run");
    let b = compose_sheet(&requests, 55.0, dir.path()).expect("second run");
    assert_eq!(a.layout, b.layout);
}

#[test]
fn custom_geometry_changes_packing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let geometry = PageGeometry {
        width_mm: 100.0,
        height_mm: 100.0,
        margin_mm: 10.0,
    };
    let out = SheetComposer::new()
        .with_geometry(geometry)
        .compose(&pairs(3, 120), 40.0, dir.path())
        .expect("compose");
    // 2 x 2 per page.
    assert_eq!(out.layout.page_count(), 2);
    let last = out.layout.pages[1][1];
    assert_eq!(last.request_index, 5);
    assert_relative_eq!(last.x_mm, 50.0);
    assert_relative_eq!(last.y_mm, 10.0);
}

#[test]
fn config_file_drives_a_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg_path = dir.path().join("sheet.json");
    let cfg = SheetConfig {
        markers: pairs(1, 150),
        size_mm: 50.0,
        output_dir: dir.path().join("out"),
        pdf_name: Some("two.pdf".to_string()),
        page: None,
        marker: None,
    };
    cfg.write_json(&cfg_path).expect("write config");

    let loaded = SheetConfig::load_json(&cfg_path).expect("load config");
    let out = loaded.run().expect("run");
    assert!(out.pdf_path.ends_with("two.pdf"));
    assert!(out.pdf_path.exists());
    assert_eq!(out.layout.page_count(), 1);
}
