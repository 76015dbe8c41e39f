use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

use super::*;

fn item(price: Value, quantity: Value) -> CartItem {
	CartItem {
		price: crate::RawNumber(price),
		quantity: crate::RawNumber(quantity),
		..CartItem::default()
	}
}

#[test]
fn decimal_readings() {
	assert_eq!(parse_decimal(&json!(10)), 10.0);
	assert_eq!(parse_decimal(&json!(2.5)), 2.5);
	assert_eq!(parse_decimal(&json!("10")), 10.0);
	assert_eq!(parse_decimal(&json!("  7.25")), 7.25);
	assert_eq!(parse_decimal(&json!("12.5 EUR")), 12.5);
	assert_eq!(parse_decimal(&json!(".5")), 0.5);
	assert_eq!(parse_decimal(&json!("5.")), 5.0);
	assert_eq!(parse_decimal(&json!("-3")), -3.0);
	assert_eq!(parse_decimal(&json!("1e2")), 100.0);
	assert_eq!(parse_decimal(&json!("1e")), 1.0);
	assert_eq!(parse_decimal(&json!("1e999")), 0.0);
}

#[test]
fn decimal_garbage_reads_as_zero() {
	for raw in [json!(""), json!("abc"), json!("."), json!("-"), json!("$5"), json!(null), json!(true), json!([1]), json!({"v": 1})] {
		assert_eq!(parse_decimal(&raw), 0.0, "{raw}");
	}
}

#[test]
fn integer_readings() {
	assert_eq!(parse_integer(&json!(2)), 2);
	assert_eq!(parse_integer(&json!(2.9)), 2);
	assert_eq!(parse_integer(&json!(-2.9)), -2);
	assert_eq!(parse_integer(&json!("2")), 2);
	assert_eq!(parse_integer(&json!("2.9")), 2);
	assert_eq!(parse_integer(&json!(" 3 units")), 3);
	assert_eq!(parse_integer(&json!("+4")), 4);
	assert_eq!(parse_integer(&json!("x3")), 0);
	assert_eq!(parse_integer(&json!("99999999999999999999")), 0);
	assert_eq!(parse_integer(&json!(false)), 0);
}

#[test]
fn total_sums_lines() {
	let items = vec![item(json!("10"), json!("2")), item(json!(5), json!(1)), item(json!("2.50"), json!(4))];
	assert_eq!(cart_total(&items), 35.0);
	assert_eq!(cart_total(&[]), 0.0);
}

#[test]
fn malformed_line_contributes_zero() {
	let items = vec![item(json!("10"), json!(2)), item(json!("n/a"), json!(3)), item(json!(4), json!("many"))];
	assert_eq!(cart_total(&items), 20.0);
}

#[test]
fn overflowing_line_contributes_zero() {
	let items = vec![item(json!(1e308), json!(10)), item(json!(1), json!(1))];
	assert_eq!(cart_total(&items), 1.0);
}

/// Quarter-unit prices keep every partial sum exactly representable, so
/// reordering cannot change the result through rounding.
fn arb_item() -> impl Strategy<Value = CartItem> {
	let price = prop_oneof![
		(0u32..40_000).prop_map(|q| json!(f64::from(q) / 4.0)),
		(0u32..40_000).prop_map(|q| json!(format!("{}", f64::from(q) / 4.0))),
		"[a-z]{0,4}".prop_map(Value::from),
	];
	let quantity = prop_oneof![(0i64..50).prop_map(Value::from), (0i64..50).prop_map(|q| json!(q.to_string())), Just(json!(null)),];
	(price, quantity).prop_map(|(price, quantity)| item(price, quantity))
}

proptest! {
	/// The total equals the sum of independently parsed lines.
	#[test]
	fn prop_total_is_sum_of_lines(items in prop::collection::vec(arb_item(), 0..20)) {
		let expected: f64 = items
			.iter()
			.map(|i| parse_decimal(&i.price.0) * parse_integer(&i.quantity.0) as f64)
			.sum();
		prop_assert_eq!(cart_total(&items), expected);
	}

	/// Permuting items leaves the total unchanged, and recomputation is stable.
	#[test]
	fn prop_total_is_order_independent(items in prop::collection::vec(arb_item(), 0..20), seed in any::<u64>()) {
		let mut shuffled = items.clone();
		let len = shuffled.len();
		if len > 1 {
			let mut state = seed;
			for i in (1..len).rev() {
				state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
				let j = (state >> 33) as usize % (i + 1);
				shuffled.swap(i, j);
			}
		}
		prop_assert_eq!(cart_total(&items), cart_total(&shuffled));
		prop_assert_eq!(cart_total(&items), cart_total(&items));
	}
}
