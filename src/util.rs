/// Character-indexed substring that clamps to the input, like a lenient slice.
pub fn slice_chars(input: &str, start: usize, end: Option<usize>) -> String {
    let iter = input.chars().skip(start);
    match end {
        Some(end) => iter.take(end.saturating_sub(start)).collect(),
        None => iter.collect(),
    }
}

/// Makes a value usable as a file name component.
pub fn sanitize_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
        } else {
            out.push('-');
        }
    }
    if out.is_empty() {
        "UNKNOWN".to_string()
    } else {
        out
    }
}
