use std::path::Path;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Num, Zero};

use crate::rrv::STDIN_PATH;

pub fn simplify_file_name(path: &str) -> String {
    if path == STDIN_PATH {
        return "stdin".to_string();
    }
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Reads the content of a score cell.
///
/// Accepted forms: integers (`7`), fractions (`7/2`) and decimal numbers (`3.5`).
/// An empty cell is a score of zero. The sign is kept: rejecting negative
/// scores is left to the caller.
pub fn parse_score(cell: &str) -> Option<BigRational> {
    let s = cell.trim();
    if s.is_empty() {
        return Some(BigRational::zero());
    }
    if let Some((num, den)) = s.split_once('/') {
        let n = parse_integer(num.trim())?;
        let d = parse_integer(den.trim())?;
        if d.is_zero() {
            return None;
        }
        return Some(BigRational::new(n, d));
    }
    if let Some((int_part, frac_part)) = s.split_once('.') {
        let (negative, int_digits) = match int_part.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, int_part.strip_prefix('+').unwrap_or(int_part)),
        };
        let all_digits = |x: &str| x.chars().all(|c| c.is_ascii_digit());
        if frac_part.is_empty() || !all_digits(int_digits) || !all_digits(frac_part) {
            return None;
        }
        let numer = BigInt::from_str_radix(&format!("{}{}", int_digits, frac_part), 10).ok()?;
        let denom = BigInt::from(10u32).pow(frac_part.len() as u32);
        let value = BigRational::new(numer, denom);
        return Some(if negative { -value } else { value });
    }
    parse_integer(s).map(BigRational::from_integer)
}

fn parse_integer(s: &str) -> Option<BigInt> {
    let digits = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    BigInt::from_str_radix(s, 10).ok()
}
