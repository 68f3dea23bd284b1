use std::fmt;

/// Escape text for XML character data and attribute values.
pub fn escape_xml(text: &str) -> String {
    EscapeXml(text).to_string()
}

/// Lazily escaped text, for use directly in `write!` arguments.
///
/// Characters that XML 1.0 cannot carry at all are replaced with U+FFFD.
pub struct EscapeXml<'a>(pub &'a str);

impl fmt::Display for EscapeXml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0;
        let mut start = 0usize;
        for (i, ch) in text.char_indices() {
            let esc = match ch {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                '"' => "&quot;",
                '\'' => "&#39;",
                '\r' => "&#xD;",
                '\t' | '\n' => continue,
                c if is_forbidden(c) => "\u{FFFD}",
                _ => continue,
            };
            if start < i {
                f.write_str(&text[start..i])?;
            }
            f.write_str(esc)?;
            start = i + ch.len_utf8();
        }
        if start < text.len() {
            f.write_str(&text[start..])?;
        }
        Ok(())
    }
}

fn is_forbidden(c: char) -> bool {
    (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}'
}
