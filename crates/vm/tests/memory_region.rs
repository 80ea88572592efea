use vm::MemoryRegion;

#[test]
fn bounds_are_half_open() {
    let mem = MemoryRegion::zeroed(16);
    assert!(mem.contains(0));
    assert!(mem.contains(15));
    assert!(!mem.contains(16));
    assert!(mem.contains_range(8, 8));
    assert!(!mem.contains_range(9, 8));
    assert!(!mem.contains_range(usize::MAX, 2));
}

#[test]
fn word_access_is_little_endian_and_checked() {
    let mut mem = MemoryRegion::zeroed(16);
    assert!(mem.write_u64_le(8, 0x0102_0304_0506_0708));
    assert_eq!(mem.read_u8(8), Some(0x08));
    assert_eq!(mem.read_u8(15), Some(0x01));
    assert_eq!(mem.read_u64_le(8), Some(0x0102_0304_0506_0708));

    assert!(!mem.write_u64_le(9, 1));
    assert_eq!(mem.read_u64_le(9), None);
    assert!(!mem.write_u8(16, 1));
    assert_eq!(mem.read_u8(16), None);
}

#[test]
fn fallible_allocation_is_zero_filled() {
    let mem = MemoryRegion::try_zeroed(64).expect("small allocation succeeds");
    assert_eq!(mem.len(), 64);
    assert!(mem.as_bytes().iter().all(|&b| b == 0));
    assert!(MemoryRegion::try_zeroed(usize::MAX).is_err());
}

#[test]
fn slice_from_stops_at_the_end() {
    let mem = MemoryRegion::zeroed(4);
    assert_eq!(mem.slice_from(1).map(|s| s.len()), Some(3));
    assert_eq!(mem.slice_from(4).map(|s| s.len()), Some(0));
    assert!(mem.slice_from(5).is_none());
}
