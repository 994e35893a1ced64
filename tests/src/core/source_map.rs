use gasline_core::pc_map::PcIndexMap;
use gasline_core::result::Error;
use gasline_core::source_map::decode_source_map;

#[test]
fn decoded_length_matches_instruction_count() {
    // PUSH1 0x01, PUSH1 0x02, ADD, STOP — four instructions, four segments
    let map = PcIndexMap::new(&[0x60, 0x01, 0x60, 0x02, 0x01, 0x00]).expect("map");
    let entries = decode_source_map("0:4:0:-;5:4;10:4;10:4").expect("decode");
    assert_eq!(entries.len(), map.len());
}

#[test]
fn every_field_is_explicit_or_inherited() {
    let raw = "7:12:0:i;9;:5;::1:o;";
    let entries = decode_source_map(raw).expect("decode");
    assert_eq!(entries.len(), 5);

    let explicit = [
        (Some(7), Some(12), Some(0), Some('i')),
        (Some(9), None, None, None),
        (None, Some(5), None, None),
        (None, None, Some(1), Some('o')),
        (None, None, None, None),
    ];
    for (idx, entry) in entries.iter().enumerate() {
        let (s, l, f, j) = explicit[idx];
        assert_eq!(entry.offset, s.unwrap_or(entries[idx - 1].offset));
        assert_eq!(entry.length, l.unwrap_or(entries[idx - 1].length));
        assert_eq!(entry.file, f.unwrap_or(entries[idx - 1].file));
        assert_eq!(entry.jump, j.unwrap_or(entries[idx - 1].jump));
    }
}

#[test]
fn negative_offsets_and_files_are_permitted() {
    let entries = decode_source_map("-1:-1:-1:-").expect("decode");
    assert_eq!(entries[0].offset, -1);
    assert!(entries[0].is_synthetic());
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let entries = decode_source_map("\n  0:1:0:-;3:1  \n").expect("decode");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].offset, 3);
}

#[test]
fn non_numeric_field_is_malformed() {
    let err = decode_source_map("0:1:0:-;abc").unwrap_err();
    assert!(matches!(err, Error::SourceMapMalformed { segment: 1, .. }));
}
