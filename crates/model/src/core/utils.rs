//! Escaping rules for the InfluxDB line protocol.

/// Escapes a measurement name: commas and spaces are significant.
pub fn escape_measurement(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            ',' | ' ' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' => escaped.push_str(r"\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escapes tag keys, tag values and field keys.
pub fn escape_key(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            ',' | '=' | ' ' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' => escaped.push_str(r"\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Quotes a string field value, escaping `"` and `\`.
pub fn quote_string_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_escapes_commas_and_spaces_only() {
        assert_eq!(escape_measurement("cpu load,x=1"), r"cpu\ load\,x=1");
    }

    #[test]
    fn keys_escape_equals_too() {
        assert_eq!(escape_key("a=b c,d"), r"a\=b\ c\,d");
    }

    #[test]
    fn string_fields_are_quoted() {
        assert_eq!(quote_string_field(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
    }
}
