//! Scenario tests against a real font file. They exercise the whole
//! pipeline (parse, metric lookups, subsetting, table round-trips, subset
//! emission) and skip quietly when the testdata font is not checked out.

use std::fs;
use std::path::Path;

use subfont::{Font, TableTag};

fn crimson() -> Option<Vec<u8>> {
    let _ = env_logger::builder().is_test(true).try_init();

    let path = Path::new("testdata").join("CrimsonPro-Regular.ttf");
    match fs::read(&path) {
        Ok(data) => Some(data),
        Err(_) => {
            eprintln!("skipping: {} not present", path.display());
            None
        }
    }
}

#[test]
fn subset_descriptor_values() {
    let Some(data) = crimson() else { return };
    let mut font = Font::parse(&data).unwrap();

    font.subset(&[0, 76, 280, 340, 362, 625]).unwrap();

    let name = font.pdf_name();
    assert_eq!(name, "/FICEFI-CrimsonPro-Regular");

    assert_eq!(font.ascender(), 918);
    assert_eq!(font.descender(), -220);
    assert_eq!(font.bounding_box(), "[0 -220 1000 918]");
    assert_eq!(font.flags(), 4);
    assert_eq!(font.italic_angle(), 0);
    assert_eq!(font.stem_v(), 0);
    assert_eq!(font.x_height(), 425);
    assert_eq!(font.cap_height(), 587);
}

#[test]
fn glyph_advances() {
    let Some(data) = crimson() else { return };
    let font = Font::parse(&data).unwrap();

    assert_eq!(font.glyph_advance(76).unwrap(), 672);
    assert_eq!(font.glyph_advance(280).unwrap(), 450);
    assert_eq!(font.glyph_advance(340).unwrap(), 269);
}

#[test]
fn codepoint_lookups() {
    let Some(data) = crimson() else { return };
    let font = Font::parse(&data).unwrap();

    assert_eq!(font.glyph_index('H'), Some(76));
    assert_eq!(font.glyph_index('e'), Some(280));
    assert_eq!(font.glyph_index('l'), Some(340));
    assert_eq!(font.codepoints(&['H', 'e', 'l']), vec![76, 280, 340]);
}

#[test]
fn tables_round_trip() {
    let Some(data) = crimson() else { return };
    let mut font = Font::parse(&data).unwrap();

    for tag in [
        TableTag::HHEA,
        TableTag::HEAD,
        TableTag::MAXP,
        TableTag::LOCA,
        TableTag::HMTX,
        TableTag::FPGM,
        TableTag::CVT,
        TableTag::PREP,
        TableTag::GLYF,
    ] {
        let Some(original) = font.table_data(tag) else {
            continue;
        };
        let original = original.to_vec();

        let mut reencoded = Vec::new();
        font.write_table(tag, &mut reencoded).unwrap();

        assert_eq!(reencoded.len(), original.len(), "length of {}", tag);
        assert_eq!(reencoded, original, "bytes of {}", tag);
    }
}

#[test]
fn written_subset_is_a_valid_font() {
    let Some(data) = crimson() else { return };
    let mut font = Font::parse(&data).unwrap();

    font.subset(&[0, 76, 280, 340, 362, 625]).unwrap();

    let mut out = Vec::new();
    font.write_subset(&mut out).unwrap();

    let reparsed = Font::parse(&out).unwrap();
    assert_eq!(reparsed.num_glyphs(), 626);
    assert_eq!(reparsed.glyph_advance(76).unwrap(), 672);

    // the requested glyphs all survive; everything else was zeroed
    let kept: std::collections::BTreeSet<u16> = font.subset_glyphs().iter().copied().collect();
    for requested in [0, 76, 280, 340, 362, 625] {
        assert!(kept.contains(&requested));
    }
    for gid in 0..626 {
        if !kept.contains(&gid) {
            assert_eq!(reparsed.glyph_advance(gid).unwrap(), 0, "glyph {}", gid);
        }
    }

    let cmap = font.cmap();
    assert!(cmap.contains("beginbfchar"));

    let widths = font.widths();
    assert!(widths.starts_with("[0[") && widths.ends_with(']'));
}
