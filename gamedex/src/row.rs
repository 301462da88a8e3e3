//! Quote-aware row decoding.
//!
//! Rows are single lines of delimited text. A field wrapped in double
//! quotes may contain the separator, and a doubled quote (`""`) inside a
//! quoted field stands for one literal quote. Fields that span lines are
//! not supported.

/// Splits one line into fields.
///
/// The final field is always emitted, so an empty line decodes to a single
/// empty field and a trailing separator produces a trailing empty field.
///
/// ```rust
/// use gamedex::row::decode_row;
///
/// let fields = decode_row(r#"a,"b, c","say ""hi""""#, ',');
/// assert_eq!(fields, vec!["a", "b, c", r#"say "hi""#]);
/// ```
pub fn decode_row(line: &str, separator: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == separator && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    fields.push(current);
    fields
}
