use tracewalk_core::analysis::remap::rebase_address;
use tracewalk_core::model::{AddressRange, RemappedRegion};

fn region_slid_down_by_0x4000() -> RemappedRegion {
    // Binary span [0x1000, 0x1008], slide -0x4000 => runtime [0x5000, 0x5008].
    RemappedRegion::from_binary_span(AddressRange::new(0x1000, 0x1008), -0x4000)
}

#[test]
fn region_construction_shifts_by_negated_slide() {
    let region = region_slid_down_by_0x4000();
    assert_eq!(region.runtime, AddressRange::new(0x5000, 0x5008));
    assert_eq!(region.binary.len(), region.runtime.len());

    let positive = RemappedRegion::from_binary_span(AddressRange::new(0x9000, 0x9008), 0x4000);
    assert_eq!(positive.runtime, AddressRange::new(0x5000, 0x5008));
}

#[test]
fn rebases_in_both_directions() {
    let regions = [region_slid_down_by_0x4000()];

    // Binary-space address shifts up into trace-space.
    assert_eq!(rebase_address(&regions, 0x1004), 0x5004);
    // Trace-space address shifts back down.
    assert_eq!(rebase_address(&regions, 0x5004), 0x1004);
}

/// Rebasing is its own inverse for every address inside the binary interval.
#[test]
fn rebase_round_trips_inside_the_region() {
    let regions = [region_slid_down_by_0x4000()];

    for address in 0x1000..=0x1008u64 {
        let rebased = rebase_address(&regions, address);
        assert_ne!(rebased, address);
        assert_eq!(rebase_address(&regions, rebased), address);
    }
}

/// Addresses outside every interval pass through unchanged: stack, heap, and
/// unmapped code are deliberately left alone.
#[test]
fn addresses_outside_all_regions_pass_through() {
    let regions = [region_slid_down_by_0x4000()];

    for address in [0x0, 0x0FFF, 0x1009, 0x4FFF, 0x5009, 0x9999, u64::MAX] {
        assert_eq!(rebase_address(&regions, address), address);
    }
}

#[test]
fn empty_region_list_is_identity() {
    assert_eq!(rebase_address(&[], 0x1234), 0x1234);
}

/// Regions are tested in insertion order; the first interval match wins even
/// when a later region also covers the address.
#[test]
fn first_matching_region_wins() {
    let first = RemappedRegion::from_binary_span(AddressRange::new(0x1000, 0x1FFF), -0x10000);
    let second = RemappedRegion::from_binary_span(AddressRange::new(0x1000, 0x2FFF), -0x20000);

    assert_eq!(rebase_address(&[first, second], 0x1500), 0x11500);
    assert_eq!(rebase_address(&[second, first], 0x1500), 0x21500);

    // An address only the second region covers still remaps.
    assert_eq!(rebase_address(&[first, second], 0x2500), 0x22500);
}
