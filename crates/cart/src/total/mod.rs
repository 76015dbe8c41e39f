//! Total calculation.
//!
//! Numbers are read the way a browser's `parseFloat`/`parseInt` read them:
//! leading whitespace is skipped and the longest numeric prefix wins, so
//! `"12.5 EUR"` is 12.5 and `"3 units"` is 3. Input without a numeric prefix,
//! non-finite results and non-numeric JSON types all read as zero.

use serde_json::Value;

use crate::CartItem;

/// Σ(price × quantity) over `items`.
pub fn cart_total(items: &[CartItem]) -> f64 {
	items.iter().map(CartItem::line_total).sum()
}

/// Decimal reading of a raw JSON value.
pub fn parse_decimal(value: &Value) -> f64 {
	let parsed = match value {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => decimal_prefix(text),
		_ => None,
	};
	parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Integer reading of a raw JSON value, truncated toward zero.
///
/// Strings outside the `i64` range read as zero.
pub fn parse_integer(value: &Value) -> i64 {
	match value {
		Value::Number(number) => number
			.as_i64()
			.or_else(|| number.as_f64().map(|v| v.trunc() as i64))
			.unwrap_or(0),
		Value::String(text) => integer_prefix(text).unwrap_or(0),
		_ => 0,
	}
}

fn scan_digits(bytes: &[u8], mut at: usize) -> usize {
	while at < bytes.len() && bytes[at].is_ascii_digit() {
		at += 1;
	}
	at
}

fn scan_sign(bytes: &[u8]) -> usize {
	usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn decimal_prefix(text: &str) -> Option<f64> {
	let text = text.trim_start();
	let bytes = text.as_bytes();

	let int_start = scan_sign(bytes);
	let mut end = scan_digits(bytes, int_start);
	let mut digits = end - int_start;

	if bytes.get(end) == Some(&b'.') {
		let frac_end = scan_digits(bytes, end + 1);
		digits += frac_end - (end + 1);
		if digits > 0 {
			end = frac_end;
		}
	}
	if digits == 0 {
		return None;
	}

	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let mut exp = end + 1;
		if matches!(bytes.get(exp), Some(b'+' | b'-')) {
			exp += 1;
		}
		let exp_end = scan_digits(bytes, exp);
		if exp_end > exp {
			end = exp_end;
		}
	}

	text[..end].parse().ok()
}

fn integer_prefix(text: &str) -> Option<i64> {
	let text = text.trim_start();
	let bytes = text.as_bytes();
	let start = scan_sign(bytes);
	let end = scan_digits(bytes, start);
	if end == start {
		return None;
	}
	text[..end].parse().ok()
}

#[cfg(test)]
mod tests;
