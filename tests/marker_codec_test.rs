// Marker text encode/decode behavior through the public API

use note_editor_wasm::models::{Document, FormatKind, Fragment};
use note_editor_wasm::parse::{decode_document, decode_fragments, decode_text};
use note_editor_wasm::renderers::encode;

fn styled(text: &str, kinds: &[FormatKind]) -> Fragment {
    Fragment::styled(text, kinds)
}

#[test]
fn test_bold_and_italic_scenario() {
    let decoded = decode_text("**bold** and *italic*");
    assert_eq!(
        decoded.fragments,
        vec![
            styled("bold", &[FormatKind::Bold]),
            Fragment::plain(" and "),
            styled("italic", &[FormatKind::Italic]),
        ]
    );
    assert_eq!(encode(&decoded.fragments), "**bold** and *italic*");
}

#[test]
fn test_decode_of_encode_restores_documents() {
    let documents = vec![
        Document::from_fragments(vec![
            Fragment::plain("Plan "),
            styled("release", &[FormatKind::Bold, FormatKind::Italic]),
            Fragment::plain(" after "),
            styled("review", &[FormatKind::Underline]),
        ]),
        Document::from_fragments(vec![
            styled("old", &[FormatKind::Strikethrough]),
            Fragment::plain(" -> "),
            styled("new", &[FormatKind::Underline, FormatKind::Bold]),
            Fragment::plain("\n"),
            styled("note", &[FormatKind::Italic]),
        ]),
        Document::plain("nothing special here"),
    ];

    for doc in documents {
        let text = encode(doc.fragments());
        assert_eq!(decode_document(&text), doc, "round trip of {:?}", text);
    }
}

/// Every ordered list of distinct kinds with 1 to 4 entries
fn ordered_format_lists() -> Vec<Vec<FormatKind>> {
    fn extend(prefix: Vec<FormatKind>, out: &mut Vec<Vec<FormatKind>>) {
        for kind in FormatKind::ALL {
            if prefix.contains(&kind) {
                continue;
            }
            let mut next = prefix.clone();
            next.push(kind);
            out.push(next.clone());
            extend(next, out);
        }
    }
    let mut out = Vec::new();
    extend(Vec::new(), &mut out);
    out
}

#[test]
fn test_every_format_combination_survives_encode_decode() {
    let lists = ordered_format_lists();
    assert_eq!(lists.len(), 4 + 12 + 24 + 24);

    for kinds in lists {
        let doc = Document::from_fragments(vec![
            Fragment::plain("a "),
            styled("x", &kinds),
            Fragment::plain(" b"),
        ]);
        let text = encode(doc.fragments());
        let decoded = decode_document(&text);

        assert_eq!(decoded.display_text(), "a x b", "{:?} encoded as {:?}", kinds, text);
        assert_eq!(decoded.fragments().len(), 3, "{:?} encoded as {:?}", kinds, text);
        // `***` always decodes as Bold then Italic, so compare kinds, not order
        assert!(
            decoded.fragments()[1].formats.same_kinds(&doc.fragments()[1].formats),
            "{:?} encoded as {:?}",
            kinds,
            text
        );
    }
}

#[test]
fn test_bold_italic_written_as_triple_marker_in_either_order() {
    let a = styled("x", &[FormatKind::Italic, FormatKind::Bold]);
    let b = styled("x", &[FormatKind::Bold, FormatKind::Italic]);
    assert_eq!(encode(&[a]), "***x***");
    assert_eq!(encode(&[b]), "***x***");
}

#[test]
fn test_decoding_twice_changes_nothing() {
    let first = decode_fragments(&[Fragment::plain("a __b__ ~~c~~ _d_")]);
    assert!(first.found_marker);
    let second = decode_fragments(&first.fragments);
    assert!(!second.found_marker);
    assert_eq!(second.fragments, first.fragments);
}

#[test]
fn test_literal_markers_without_pairs_survive() {
    for text in ["5 * 4", "snake_case", "~ approx", "**", "a ** b"] {
        let decoded = decode_text(text);
        assert!(!decoded.found_marker, "{:?}", text);
        assert_eq!(decoded.fragments, vec![Fragment::plain(text)]);
    }
}
