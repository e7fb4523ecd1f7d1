// Word-wrap layout and caret geometry with fixed-width metrics

use note_editor_wasm::models::{Document, FormatKind, Fragment};
use note_editor_wasm::renderers::{FixedWidthMetrics, LayoutConfig, LayoutEngine};
use note_editor_wasm::text::navigation::{offset_to_point, point_to_offset};

fn engine() -> LayoutEngine<FixedWidthMetrics> {
    LayoutEngine::new(FixedWidthMetrics::new(10.0))
}

#[test]
fn test_hello_world_wraps_between_words() {
    // wrap limit 90 - 10 - 10 = 70: "hello " ends exactly there
    let layout = engine().compute_layout(&Document::plain("hello world"), &LayoutConfig::with_width(90.0));

    assert_eq!(layout.line_count, 2);
    for offset in 0..5 {
        assert_eq!(layout.placements[offset].line, 0, "offset {}", offset);
    }
    assert_eq!(layout.placements[6].line, 1);
    assert_eq!(layout.placements[6].x, 10.0);
}

#[test]
fn test_one_placement_per_offset_plus_virtual_end() {
    let doc = Document::from_fragments(vec![
        Fragment::plain("a\tb "),
        Fragment::styled("bold", &[FormatKind::Bold]),
        Fragment::plain("\nend"),
    ]);
    let layout = engine().compute_layout(&doc, &LayoutConfig::default());

    let len = doc.char_len();
    assert_eq!(layout.placements.len(), len + 1);
    for (index, placement) in layout.placements.iter().enumerate() {
        assert_eq!(placement.offset, index);
    }
    assert!(layout.placements[len].is_virtual);
    assert!(layout.placements[1].is_tab);
}

#[test]
fn test_long_word_is_never_split() {
    let layout = engine().compute_layout(&Document::plain("a supercalifragilistic b"), &LayoutConfig::with_width(60.0));
    let word_lines: Vec<usize> = layout.placements[2..22].iter().map(|p| p.line).collect();
    assert!(word_lines.iter().all(|&line| line == word_lines[0]));
    assert_eq!(layout.placements[2].x, 10.0);
}

#[test]
fn test_points_inside_text_map_back_to_same_line() {
    let layout = engine().compute_layout(
        &Document::plain("the quick brown fox jumps over the lazy dog"),
        &LayoutConfig::with_width(120.0),
    );
    assert!(layout.line_count > 1);

    for line in 0..layout.line_count {
        let baseline = layout.line_y(line).unwrap();
        for x in [0.0, 15.0, 47.0, 90.0, 119.0] {
            let offset = point_to_offset(&layout, x, baseline - 2.0);
            assert_eq!(offset_to_point(&layout, offset).1, baseline);
        }
    }
}
