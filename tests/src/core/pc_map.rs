use gasline_core::pc_map::PcIndexMap;
use gasline_core::result::Error;

// PUSH1 0x01, PUSH1 0x02, ADD, STOP
const BYTECODE: &[u8] = &[0x60, 0x01, 0x60, 0x02, 0x01, 0x00];

#[test]
fn instruction_indices_are_contiguous_from_zero() {
    let map = PcIndexMap::new(BYTECODE).expect("map");
    let mut indices: Vec<usize> = map.iter().map(|(_, idx)| idx).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn rerunning_the_walk_is_deterministic() {
    let first = PcIndexMap::new(BYTECODE).expect("map");
    let second = PcIndexMap::new(BYTECODE).expect("map");
    let mut a: Vec<(usize, usize)> = first.iter().collect();
    let mut b: Vec<(usize, usize)> = second.iter().collect();
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
}

#[test]
fn push32_consumes_its_full_immediate() {
    // PUSH32 <32 bytes>, STOP
    let mut code = vec![0x7f];
    code.extend(std::iter::repeat_n(0xee, 32));
    code.push(0x00);
    let map = PcIndexMap::new(&code).expect("map");
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(0), Some(0));
    assert_eq!(map.get(33), Some(1));
    assert_eq!(map.get(16), None);
}

#[test]
fn push_past_end_is_truncated_bytecode() {
    let err = PcIndexMap::new(&[0x60]).unwrap_err();
    assert!(matches!(err, Error::BytecodeTruncated { pc: 0, .. }));
}

#[test]
fn empty_bytecode_yields_empty_map() {
    let map = PcIndexMap::new(&[]).expect("map");
    assert!(map.is_empty());
}
