use aruco_sheets_aruco::{render_marker, PredefinedDictionary};
use aruco_sheets_live::{
    run_live, DirectorySink, ImageSequence, LiveConfig, MarkerDetector, StopReason,
};
use image::{imageops, DynamicImage, Rgb, RgbImage};

fn frame_with_markers(ids: &[u32]) -> RgbImage {
    let dict = PredefinedDictionary::Dict4x4_50.dictionary();
    let mut frame = RgbImage::from_pixel(80 + 100 * ids.len() as u32, 160, Rgb([255, 255, 255]));
    for (k, &id) in ids.iter().enumerate() {
        let marker = DynamicImage::ImageLuma8(render_marker(&dict, id, 60, 1).expect("render"));
        imageops::replace(&mut frame, &marker.to_rgb8(), 40 + 100 * k as i64, 50);
    }
    frame
}

#[test]
fn directory_frames_are_detected_and_annotated() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    frame_with_markers(&[3, 8])
        .save(input.path().join("000.png"))
        .expect("save frame");
    frame_with_markers(&[21])
        .save(input.path().join("001.png"))
        .expect("save frame");

    let cfg = LiveConfig::default();
    let detector = MarkerDetector::new(cfg.dictionary.dictionary(), cfg.detector.clone())
        .expect("detector");

    let first = detector.detect_rgb(&frame_with_markers(&[3, 8]));
    let mut ids: Vec<u32> = first.iter().map(|d| d.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![3, 8]);

    let frames = ImageSequence::open(input.path()).expect("frames");
    let mut sink = DirectorySink::create(output.path()).expect("sink");
    let summary = run_live(frames, &detector, &mut sink, &cfg).expect("run");

    assert_eq!(summary.stop, StopReason::Exhausted);
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.detections, 3);
    assert!(sink.frame_path(1).exists());

    let annotated = image::open(sink.frame_path(0)).expect("annotated").to_rgb8();
    assert!(annotated.pixels().any(|p| *p == Rgb([0, 255, 0])));
}
