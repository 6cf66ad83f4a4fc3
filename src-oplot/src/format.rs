//! Human readable rendering of trial values for hover labels

use crate::trial::ParamValue;

const SMALL: f64 = 0.001;
const LARGE: f64 = 10000.0;

/// Format a value for display.
///
/// Numbers with a magnitude below 0.001 or above 10000 use scientific
/// notation with two fractional digits (`1.23e-04`), other floats get four
/// fractional digits, everything else uses its natural representation.
/// Zero counts as in range.
pub fn format_value(value: &ParamValue) -> String {
	match value {
		ParamValue::Int(v) => {
			let f = *v as f64;
			if out_of_range(f) { scientific(f) } else { v.to_string() }
		}
		ParamValue::Float(v) => {
			if out_of_range(*v) {
				scientific(*v)
			} else if v.is_finite() {
				format!("{:.4}", v)
			} else {
				v.to_string()
			}
		}
		other => other.to_string(),
	}
}

fn out_of_range(v: f64) -> bool {
	let a = v.abs();
	v != 0.0 && (a < SMALL || a > LARGE)
}

/// `{:.2e}` with a signed exponent of at least two digits
fn scientific(v: f64) -> String {
	let raw = format!("{:.2e}", v);
	let Some((mantissa, exponent)) = raw.split_once('e') else {
		// inf has no exponent
		return raw;
	};
	match exponent.parse::<i32>() {
		Ok(e) => {
			let sign = if e < 0 { '-' } else { '+' };
			format!("{}e{}{:02}", mantissa, sign, e.abs())
		}
		Err(_) => raw,
	}
}
