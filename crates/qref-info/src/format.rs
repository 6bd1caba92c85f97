//! Number formatting shared by the `Display` impls.

use num_complex::Complex64;

/// Format a real number with at most `decimals` digits, trimming trailing
/// zeros. Negative zero prints as `0`.
pub fn format_real(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let trimmed = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format a complex number as `a`, `bi` or `a+bi`.
pub fn format_complex(value: Complex64, decimals: usize) -> String {
    let re = format_real(value.re, decimals);
    let im = format_real(value.im, decimals);
    match (re == "0", im == "0") {
        (_, true) => re,
        (true, false) => format!("{im}i"),
        (false, false) if im.starts_with('-') => format!("{re}{im}i"),
        (false, false) => format!("{re}+{im}i"),
    }
}
