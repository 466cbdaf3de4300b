//! Decomposes a numeric lexeme into integer/fraction/exponent subfields and
//! reduces them to an `f64`.

use crate::tables::{NumAction, NUMBER_TABLE};

struct Subfields<'a> {
    int: &'a [u8],
    frac: Option<&'a [u8]>,
    exp: Option<&'a [u8]>,
}

/// Splits `lexeme` into integer/fraction/exponent byte ranges by scanning it
/// once through the number decomposition table. Returns `None` only if a
/// `.` appears a second time or after an `e`/`E`; any other byte just
/// advances the current subfield (digit extraction happens later, in
/// [`stoi`]).
fn split(lexeme: &[u8]) -> Option<Subfields<'_>> {
    #[derive(PartialEq)]
    enum Segment {
        Int,
        Frac,
        Exp,
    }

    let mut segment = Segment::Int;
    let mut int_end = lexeme.len();
    let mut frac_start = 0;
    let mut frac_end = 0;
    let mut exp_start = 0;
    let mut exp_end = 0;
    let mut saw_frac = false;
    let mut saw_exp = false;

    for (i, &b) in lexeme.iter().enumerate() {
        match NUMBER_TABLE[b as usize] {
            NumAction::Loop => {}
            NumAction::FloatPoint => {
                if saw_frac || saw_exp {
                    return None;
                }
                saw_frac = true;
                int_end = i;
                frac_start = i + 1;
                frac_end = lexeme.len();
                segment = Segment::Frac;
            }
            NumAction::Exponent => {
                if saw_exp {
                    return None;
                }
                saw_exp = true;
                match segment {
                    Segment::Int => int_end = i,
                    Segment::Frac => frac_end = i,
                    Segment::Exp => {}
                }
                exp_start = i + 1;
                exp_end = lexeme.len();
                segment = Segment::Exp;
            }
            NumAction::Break => {
                match segment {
                    Segment::Int => int_end = i,
                    Segment::Frac => frac_end = i,
                    Segment::Exp => exp_end = i,
                }
                break;
            }
        }
    }

    Some(Subfields {
        int: &lexeme[..int_end.min(lexeme.len())],
        frac: saw_frac.then(|| &lexeme[frac_start..frac_end]),
        exp: saw_exp.then(|| &lexeme[exp_start..exp_end]),
    })
}

/// Builds a signed integer from `bytes`, skipping any non-digit byte
/// silently (including a stray `-`/`+` past the first position). This
/// mirrors the shipped permissiveness: `"1a2"` converts to `12`, and `"1-2"`
/// converts to `12` as well since only the leading sign byte is significant.
fn stoi(bytes: &[u8]) -> (i64, bool) {
    let negative = bytes.first() == Some(&b'-');
    let mut n: i64 = 0;
    for &b in bytes {
        if b.is_ascii_digit() {
            n = n.wrapping_mul(10).wrapping_add(i64::from(b - b'0'));
        }
    }
    (n, negative)
}

fn frac_value(bytes: &[u8]) -> f64 {
    let mut f = 0.0;
    for (k, &b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let digit = f64::from(b - b'0');
            f += digit * 10f64.powi(-(k as i32 + 1));
        }
    }
    f
}

/// `10^|e|` via exponentiation-by-squaring on an integer accumulator,
/// inverted when `e < 0`.
fn pow10(e: i64) -> f64 {
    let mut base: f64 = 10.0;
    let mut n = e.unsigned_abs();
    let mut acc: f64 = 1.0;
    while n > 0 {
        if n & 1 == 1 {
            acc *= base;
        }
        base *= base;
        n >>= 1;
    }
    if e < 0 {
        1.0 / acc
    } else {
        acc
    }
}

/// Converts a numeric lexeme (as produced by the scanner for a `Number`
/// token) into an `f64`. Returns `None` if the lexeme's structure is
/// malformed: a repeated `.`, or a `.` after an `e`/`E`.
pub fn convert(lexeme: &[u8]) -> Option<f64> {
    let fields = split(lexeme)?;

    let (i, negative) = stoi(fields.int);
    let f = fields.frac.map(frac_value).unwrap_or(0.0);
    let mut magnitude = i as f64 + f;
    if negative {
        magnitude = -magnitude;
    }

    let p = match fields.exp {
        Some(exp_bytes) => {
            let (e, exp_negative) = stoi(exp_bytes);
            let e = if exp_negative { -e } else { e };
            pow10(e)
        }
        None => 1.0,
    };

    Some(magnitude * p)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_integer() {
        assert_eq!(convert(b"42"), Some(42.0));
        assert_eq!(convert(b"-42"), Some(-42.0));
    }

    #[test]
    fn fraction() {
        assert_eq!(convert(b"3.5"), Some(3.5));
        assert_eq!(convert(b"-0.25"), Some(-0.25));
    }

    #[test]
    fn exponent() {
        assert_eq!(convert(b"1e2"), Some(100.0));
        assert_eq!(convert(b"1.5e-1"), Some(0.15));
    }

    #[test]
    fn double_dot_fails() {
        assert_eq!(convert(b"1..2"), None);
    }

    #[test]
    fn dot_after_exponent_fails() {
        assert_eq!(convert(b"1e2.5"), None);
    }

    #[test]
    fn skips_non_digit_bytes_in_integer_part() {
        // Intentionally shipped permissiveness: non-digits are skipped, not rejected.
        assert_eq!(convert(b"1a2"), Some(12.0));
    }

    #[test]
    fn embedded_dash_is_skipped_not_rejected() {
        assert_eq!(convert(b"1-2"), Some(12.0));
    }

    proptest! {
        #[test]
        fn plain_digit_strings_round_trip(n in 0i64..1_000_000) {
            let s = n.to_string();
            let got = convert(s.as_bytes()).unwrap();
            prop_assert!((got - n as f64).abs() < 1e-9);
        }
    }
}
