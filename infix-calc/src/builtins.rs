//! Checked integer arithmetic behind the evaluator's binary operators.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithError {
    DivisionByZero,
    Overflow,
}

/// Truncating division, `b / a`.
pub fn div(b: i64, a: i64) -> Result<i64, ArithError> {
    if a == 0 {
        return Err(ArithError::DivisionByZero);
    }
    b.checked_div(a).ok_or(ArithError::Overflow)
}

/// `b` raised to `a`, truncated toward zero the way `(long)pow(b, a)` is.
///
/// Non-negative exponents are computed exactly. A negative exponent leaves a
/// fraction for every base except 1 and -1, which truncates to 0; zero
/// to a negative power is infinite.
pub fn pow(b: i64, a: i64) -> Result<i64, ArithError> {
    if a >= 0 {
        let exp = u32::try_from(a).map_err(|_| ArithError::Overflow);
        return match b {
            0 | 1 => Ok(if a == 0 { 1 } else { b }),
            -1 => Ok(if a % 2 == 0 { 1 } else { -1 }),
            _ => b.checked_pow(exp?).ok_or(ArithError::Overflow),
        };
    }

    match b {
        0 => Err(ArithError::DivisionByZero),
        1 => Ok(1),
        -1 => Ok(if a % 2 == 0 { 1 } else { -1 }),
        _ => Ok(0),
    }
}
