use libc::{c_char, c_int, c_longlong, size_t};

/// Copy `error` into the caller's buffer, truncating it to fit and
/// terminating it with a NUL byte.
unsafe fn fill_error_buffer(output_error: *mut c_char, output_error_len: size_t, error: &str) {
    if output_error.is_null() || output_error_len == 0 {
        return;
    }

    let output_error = std::slice::from_raw_parts_mut(output_error as *mut u8, output_error_len);
    let len = error.len().min(output_error_len - 1);
    output_error[..len].copy_from_slice(&error.as_bytes()[..len]);
    output_error[len] = 0;
}

/// Evaluate an arithmetic expression.
///
/// # Arguments
///
/// * `input` - NUL-terminated expression to evaluate.
/// * `result` - Where the result is written on success.
/// * `output_error` - The buffer to write the error message to. May be null.
/// * `output_error_len` - The length of the error buffer.
///
/// # Returns
///
/// 0 on success, -1 if the expression could not be evaluated. On failure
/// `result` is left untouched and the error message is written to
/// `output_error`.
///
/// # Safety
///
/// `input` must point to a NUL-terminated string, `result` must be valid for
/// writes, and `output_error` must be null or valid for `output_error_len`
/// bytes.
#[no_mangle]
pub unsafe extern "C" fn evaluate_expression(
    input: *const c_char,
    result: *mut c_longlong,
    output_error: *mut c_char,
    output_error_len: size_t,
) -> c_int {
    if input.is_null() {
        fill_error_buffer(output_error, output_error_len, "Invalid input string pointer!");
        return -1;
    }

    if result.is_null() {
        fill_error_buffer(output_error, output_error_len, "Invalid result pointer!");
        return -1;
    }

    let input = match std::ffi::CStr::from_ptr(input).to_str() {
        Ok(input) => input,
        Err(_) => {
            fill_error_buffer(
                output_error,
                output_error_len,
                "Failed to convert the input string to a Rust string!",
            );
            return -1;
        }
    };

    match crate::evaluate(input) {
        Ok(value) => {
            *result = value;
            0
        }
        Err(e) => {
            fill_error_buffer(output_error, output_error_len, &e.to_string());
            -1
        }
    }
}
