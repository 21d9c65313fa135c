use crate::domain::changes::ChangeFlags;

#[test]
fn named_bits_match_the_stored_values() {
    assert_eq!(ChangeFlags::SHIPPING.bits(), 1);
    assert_eq!(ChangeFlags::PRICE.bits(), 2);
    assert_eq!(ChangeFlags::UNITS_SOLD.bits(), 4);
}

#[test]
fn with_accumulates_and_without_clears() {
    let flags = ChangeFlags::empty()
        .with(ChangeFlags::PRICE)
        .with(ChangeFlags::SHIPPING);

    assert!(flags.contains(ChangeFlags::PRICE));
    assert!(flags.contains(ChangeFlags::SHIPPING));
    assert!(!flags.contains(ChangeFlags::UNITS_SOLD));
    assert_eq!(flags.bits(), 3);

    let flags = flags.without(ChangeFlags::PRICE);
    assert!(!flags.contains(ChangeFlags::PRICE));
    assert!(flags.contains(ChangeFlags::SHIPPING));

    // clearing an unset bit is a no-op
    assert_eq!(flags.without(ChangeFlags::PRICE), flags);
}

#[test]
fn setting_a_bit_twice_is_a_no_op() {
    let once = ChangeFlags::empty().with(ChangeFlags::PRICE);
    assert_eq!(once.with(ChangeFlags::PRICE), once);
}

#[test]
fn round_trips_through_the_integer_column() {
    let flags = ChangeFlags::empty()
        .with(ChangeFlags::UNITS_SOLD)
        .with(ChangeFlags::SHIPPING);
    assert_eq!(ChangeFlags::from_bits(flags.bits()), flags);
}

#[test]
fn display_names_the_set_bits() {
    assert_eq!(ChangeFlags::empty().to_string(), "none");
    let flags = ChangeFlags::empty()
        .with(ChangeFlags::PRICE)
        .with(ChangeFlags::SHIPPING);
    assert_eq!(flags.to_string(), "price+shipping");
}
