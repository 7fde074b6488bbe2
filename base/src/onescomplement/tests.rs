use test_strategy::proptest;

use super::*;
use crate::bitasserts::BitAssertionFailed;

macro_rules! assert_octal_eq {
    ($left:expr, $right:expr $(,)?) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    panic!(
                        "Assertion failed: {:>#08o} != {:>#08o}",
                        left_val, right_val
                    );
                }
            }
        }
    }};
}

fn ok(r: Result<Word, BitAssertionFailed>) -> Word {
    r.expect("test data should be in range")
}

#[test]
fn test_cycle_right() {
    assert_octal_eq!(ok(cycle_right(0o2)), 0o1);
    assert_octal_eq!(ok(cycle_right(0o6)), 0o3);
    assert_octal_eq!(ok(cycle_right(0o1)), 0o40000);
    assert_octal_eq!(ok(cycle_right(0o12345)), 0o45162);
}

#[test]
fn test_cycle_left() {
    assert_octal_eq!(ok(cycle_left(0o1)), 0o2);
    assert_octal_eq!(ok(cycle_left(0o3)), 0o6);
    assert_octal_eq!(ok(cycle_left(0o47)), 0o116);
    assert_octal_eq!(ok(cycle_left(0o40000)), 0o1);
    assert_octal_eq!(ok(cycle_left(0o12345)), 0o24712);
}

#[test]
fn test_edop() {
    assert_octal_eq!(ok(edop(0o175)), 0);
    assert_octal_eq!(ok(edop(0)), 0);
    assert_octal_eq!(ok(edop(0o12345)), 0o51);
}

#[test]
fn test_shift_right() {
    assert_octal_eq!(ok(shift_right(0o12345)), 0o5162);
    assert_octal_eq!(ok(shift_right(0o1)), 0);
}

#[test]
fn test_sign_extend() {
    assert_octal_eq!(ok(sign_extend(0o1)), 0o1);
    assert_octal_eq!(ok(sign_extend(0o77776)), 0o177776);
    assert_octal_eq!(ok(sign_extend(0o40000)), 0o140000);
    assert_octal_eq!(ok(sign_extend(0o37777)), 0o37777);
}

#[test]
fn test_transforms_reject_16_bit_input() {
    let too_wide = Err(BitAssertionFailed::ValueTooWide {
        value: 0o100000,
        max_width: 15,
    });
    assert_eq!(sign_extend(0o100000), too_wide);
    assert_eq!(cycle_right(0o100000), too_wide);
    assert_eq!(cycle_left(0o100000), too_wide);
    assert_eq!(shift_right(0o100000), too_wide);
    assert_eq!(edop(0o100000), too_wide);
}

#[test]
fn test_end_around_carry() {
    // (+1) + (-1) = -0
    assert_octal_eq!(ok(add_end_around(0o1, 0o177776, 16)), 0o177777);
    // (-1) + (-1) = -2, via the end-around carry.
    assert_octal_eq!(ok(add_end_around(0o77776, 0o77776, 15)), 0o77775);
    // (-0) + (+1) = +1
    assert_octal_eq!(ok(add_end_around(0o77777, 0o1, 15)), 0o1);
    // Operands must fit the adder.
    assert!(add_end_around(0o200000, 0, 16).is_err());
    assert!(add_end_around(0, 0o100000, 15).is_err());
}

#[test]
fn test_complement() {
    assert_octal_eq!(ok(complement(0, 15)), 0o77777);
    assert_octal_eq!(ok(complement(0o12345, 15)), 0o65432);
    assert_octal_eq!(ok(complement(0o100000, 16)), 0o77777);
    assert!(complement(0o100000, 15).is_err());
}

#[test]
fn test_sign_and_zero_predicates() {
    assert!(is_zero(0, 15));
    assert!(is_zero(0o77777, 15));
    assert!(!is_zero(0o77777, 16));
    assert!(is_zero(0o177777, 16));
    assert!(is_negative(0o40000, 15));
    assert!(!is_negative(0o40000, 16));
    assert_octal_eq!(minus_one(15), 0o77776);
    assert_octal_eq!(minus_one(16), 0o177776);
}

#[test]
fn test_overflow_detection() {
    assert!(!has_overflowed(0o000001));
    assert!(!has_overflowed(0o177776));
    // Positive overflow: bit 16 clear, bit 15 set.
    assert!(has_overflowed(0o050000));
    // Negative overflow: bit 16 set, bit 15 clear.
    assert!(has_overflowed(0o110000));
}

#[proptest]
fn sign_extension_copies_bit_15(#[strategy(0u32..=0o77777)] w: u32) {
    let extended = ok(sign_extend(w));
    assert_eq!((extended >> 15) & 1, (extended >> 14) & 1);
    assert_eq!(extended & WORD_MASK, w);
    assert!(!has_overflowed(extended));
}

#[proptest]
fn cycling_is_reversible(#[strategy(0u32..=0o77777)] w: u32) {
    assert_eq!(ok(cycle_right(ok(cycle_left(w)))), w);
    assert_eq!(ok(cycle_left(ok(cycle_right(w)))), w);
}

#[proptest]
fn adding_negation_gives_minus_zero(#[strategy(0u32..=0o77777)] w: u32) {
    let negated = ok(complement(w, WORD_BITS));
    assert_octal_eq!(ok(add_end_around(w, negated, WORD_BITS)), WORD_MASK);
}

#[proptest]
fn end_around_sum_stays_in_width(
    #[strategy(0u32..=0o177777)] left: u32,
    #[strategy(0u32..=0o177777)] right: u32,
) {
    let sum = ok(add_end_around(left, right, REGISTER_BITS));
    assert!(sum <= REGISTER_MASK);
}
