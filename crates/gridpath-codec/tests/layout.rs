//! Wire layout properties: round trips through arena placement and the
//! C struct layout the module side reads by raw offset arithmetic.

use gridpath_arena::{Arena, LinearMemory};
use gridpath_codec::wire::{read_i32_le, read_u32_le};
use gridpath_codec::{fetch, place, ArrayHeader, Point, PointArray};
use proptest::prelude::*;

fn arb_point() -> impl Strategy<Value = Point> {
    (any::<i32>(), any::<i32>()).prop_map(|(x, y)| Point::new(x, y))
}

fn arb_array() -> impl Strategy<Value = PointArray> {
    (proptest::collection::vec(arb_point(), 0..64), 0u32..16).prop_map(|(items, spare)| {
        let capacity = items.len() as u32 + spare;
        PointArray::from_parts(items, capacity).unwrap()
    })
}

/// Walk an encoded array the way C code would: follow the header pointer
/// and step 8 bytes per record.
fn read_like_c(buf: &[u8], at: u32) -> Vec<(i32, i32)> {
    let items = read_u32_le(buf, at).unwrap();
    let count = read_u32_le(buf, at + 4).unwrap();
    (0..count)
        .map(|i| {
            let rec = items + i * 8;
            (
                read_i32_le(buf, rec).unwrap(),
                read_i32_le(buf, rec + 4).unwrap(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn point_round_trips_through_arena(p in arb_point(), base in 0u32..512) {
        let mut arena = Arena::new(LinearMemory::with_pages(1).unwrap(), base).unwrap();
        let off = place(&mut arena, &p).unwrap();
        prop_assert_eq!(off.addr(), base);
        prop_assert_eq!(fetch::<Point, _>(&arena, off).unwrap(), p);
    }

    #[test]
    fn array_round_trips_through_arena(arr in arb_array(), base in 0u32..512) {
        let mut arena = Arena::new(LinearMemory::with_pages(1).unwrap(), base).unwrap();
        let off = place(&mut arena, &arr).unwrap();
        prop_assert_eq!(arena.used(), 12 + arr.capacity() * 8);
        let back: PointArray = fetch(&arena, off).unwrap();
        prop_assert_eq!(back, arr);
    }

    #[test]
    fn c_view_matches_items(arr in arb_array()) {
        let mut buf = vec![0u8; arr.wire_size().unwrap() as usize + 32];
        arr.encode(&mut buf, 32).unwrap();
        let header = ArrayHeader::read(&buf, 32).unwrap();
        prop_assert_eq!(header.items_offset, 44);
        prop_assert_eq!(header.count, arr.count());
        prop_assert_eq!(header.capacity, arr.capacity());
        let expected: Vec<(i32, i32)> = arr.iter().map(|p| (p.x, p.y)).collect();
        prop_assert_eq!(read_like_c(&buf, 32), expected);
    }
}

#[test]
fn several_arguments_share_one_arena() {
    let mut arena = Arena::new(LinearMemory::with_pages(1).unwrap(), 1024).unwrap();
    let obstacles = PointArray::new(vec![Point::new(3, 0), Point::new(4, 0)]);
    let start = Point::new(0, 0);
    let end = Point::new(6, 3);
    let output = PointArray::with_capacity(28);

    let o = place(&mut arena, &obstacles).unwrap();
    let s = place(&mut arena, &start).unwrap();
    let e = place(&mut arena, &end).unwrap();
    let out = place(&mut arena, &output).unwrap();

    assert_eq!(o.addr(), 1024);
    assert_eq!(s.addr(), 1024 + 12 + 16);
    assert_eq!(e.addr(), s.addr() + 8);
    assert_eq!(out.addr(), e.addr() + 8);
    assert_eq!(arena.cursor(), out.addr() + 12 + 28 * 8);

    assert_eq!(fetch::<PointArray, _>(&arena, o).unwrap(), obstacles);
    assert_eq!(fetch::<Point, _>(&arena, e).unwrap(), end);
    let empty: PointArray = fetch(&arena, out).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.capacity(), 28);
}
