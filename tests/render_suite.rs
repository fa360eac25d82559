use std::path::Path;

use pcb_svg_renderer::{BoardView, Config, PayloadError};

fn render_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    let mut view = BoardView::new(Config::default());
    view.update(&input).expect("render failed").to_string()
}

fn assert_valid_svg(svg: &str) {
    assert!(svg.starts_with("<svg"), "missing <svg tag");
    assert!(svg.ends_with("</svg>"), "missing </svg tag");
    assert!(svg.contains("viewBox="), "missing viewBox");
}

#[test]
fn renders_board_fixture() {
    let svg = render_fixture("board.json");
    assert_valid_svg(&svg);

    // One primitive per recognized silkscreen record.
    assert!(svg.contains("d=\"M 1 1 L 4 1 L 4 4\""));
    assert!(svg.contains("<line x1=\"0\" y1=\"0\" x2=\"20\" y2=\"0\""));
    assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"10\" height=\"5\""));
    assert!(svg.contains("<circle cx=\"15\" cy=\"10\" r=\"2\""));
    assert!(svg.contains("<polygon points=\"5,5 8,5 8,8 5,8\""));
    assert!(svg.contains(">U1</text>"));
    assert!(svg.contains(">100nF</text>"));
    // `ref` wins over `val` when both are present.
    assert!(!svg.contains("MCU"));

    // Through-hole pad with size renders; smd and sizeless pads do not,
    // and neither does the footprint without a bbox position.
    assert!(svg.contains("<circle cx=\"1\" cy=\"1\" r=\"2\""));
    assert!(!svg.contains("cx=\"6\""));
    assert!(!svg.contains("cx=\"3\""));
    assert!(!svg.contains("cx=\"50\""));

    // Board edges: segment plus the reconstructed arc; the spline record
    // is skipped.
    assert!(svg.contains("<line x1=\"-2\" y1=\"-2\" x2=\"22\" y2=\"-2\" stroke=\"#800080\" stroke-width=\"0.3\""));
    assert!(svg.contains("d=\"M 10 0 A 5 5 0 0 1 5 5\""));

    // Fabrication is parsed but not drawn by default.
    assert!(!svg.contains("x1=\"2\""));
}

#[test]
fn rendering_twice_is_identical() {
    assert_eq!(render_fixture("board.json"), render_fixture("board.json"));
}

#[test]
fn malformed_records_do_not_abort_the_batch() {
    let svg = render_fixture("board.json");
    // The segment missing its end and the one with a junk start both
    // dropped silently; the rest of the layer still rendered.
    assert!(!svg.contains("x1=\"9\""));
    assert!(svg.contains("<rect"));
}

#[test]
fn error_status_leaves_no_surface() {
    let mut view = BoardView::new(Config::default());
    let err = view
        .update(r#"{"status": "error", "message": "pcbdata not found in file."}"#)
        .unwrap_err();
    assert!(matches!(err, PayloadError::Status(_)));
    assert_eq!(view.current(), None);
}
