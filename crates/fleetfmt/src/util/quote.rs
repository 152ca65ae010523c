use crate::syntax::{SyntaxKind, SyntaxToken};
use yaml_rust2::{Yaml, YamlLoader};

/// The surface representation of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|`
    Literal,
    /// `>`
    Folded,
}

impl ScalarStyle {
    pub fn of(token: &SyntaxToken) -> Option<Self> {
        match token.kind() {
            SyntaxKind::PLAIN => Some(Self::Plain),
            SyntaxKind::SINGLE_QUOTED => Some(Self::SingleQuoted),
            SyntaxKind::DOUBLE_QUOTED => Some(Self::DoubleQuoted),
            SyntaxKind::BLOCK_SCALAR if token.text().starts_with('>') => Some(Self::Folded),
            SyntaxKind::BLOCK_SCALAR => Some(Self::Literal),
            _ => None,
        }
    }

    pub fn is_quoted(self) -> bool {
        matches!(self, Self::SingleQuoted | Self::DoubleQuoted)
    }

    pub fn is_block(self) -> bool {
        matches!(self, Self::Literal | Self::Folded)
    }
}

/// Decodes the text of a single scalar the way a YAML loader reads it
/// as a document of its own.
///
/// Returns `None` when the text is not exactly one scalar document.
pub fn decode(text: &str) -> Option<Yaml> {
    let docs = YamlLoader::load_from_str(text).ok()?;
    match docs.as_slice() {
        [Yaml::Hash(_)] | [Yaml::Array(_)] | [Yaml::Alias(_)] | [Yaml::BadValue] => None,
        [doc] => Some(doc.clone()),
        _ => None,
    }
}

/// Whether `text` read as a scalar gives back the string `value`.
pub fn decodes_to(text: &str, value: &str) -> bool {
    matches!(decode(text), Some(Yaml::String(s)) if s == value)
}

/// Renders `value` in the given style.
///
/// Block styles are not rendered and give `None`.
pub fn render(style: ScalarStyle, value: &str) -> Option<String> {
    match style {
        ScalarStyle::Plain => Some(value.to_string()),
        ScalarStyle::SingleQuoted => Some(format!("'{}'", value.replace('\'', "''"))),
        ScalarStyle::DoubleQuoted => Some(double_quote(value)),
        ScalarStyle::Literal | ScalarStyle::Folded => None,
    }
}

/// Escaping based on:
///
/// \0         - null            (U+0000)
/// \t         - tab             (U+0009)
/// \n         - linefeed        (U+000A)
/// \r         - carriage return (U+000D)
/// \"         - quote           (U+0022)
/// \\         - backslash       (U+005C)
/// \xXX       - other control characters
fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\0' => out.push_str(r"\0"),
            '\t' => out.push_str(r"\t"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '"' => out.push_str(r#"\""#),
            '\\' => out.push_str(r"\\"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!(r"\x{:02X}", c as u32))
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode() {
        assert_eq!(decode("'string'"), Some(Yaml::String("string".into())));
        assert_eq!(decode(r#""one\ntwo""#), Some(Yaml::String("one\ntwo".into())));
        assert_eq!(decode("1.2.3"), Some(Yaml::String("1.2.3".into())));
        assert_eq!(decode("1.2"), Some(Yaml::Real("1.2".into())));
        assert_eq!(decode("123"), Some(Yaml::Integer(123)));
        assert_eq!(decode("true"), Some(Yaml::Boolean(true)));
        assert_eq!(decode("~"), Some(Yaml::Null));
        assert_eq!(decode("multi\n  line"), Some(Yaml::String("multi line".into())));
        assert_eq!(decode(""), None);
        assert_eq!(decode("key: value"), None);
        assert_eq!(decode("- item"), None);
        assert_eq!(decode("'open"), None);
    }

    #[test]
    fn test_decodes_to() {
        assert!(decodes_to("string", "string"));
        assert!(decodes_to("'@timestamp'", "@timestamp"));
        assert!(!decodes_to("@timestamp", "@timestamp"));
        assert!(!decodes_to("1.2", "1.2"));
        assert!(!decodes_to("a # comment", "a # comment"));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(ScalarStyle::Plain, "a b").as_deref(), Some("a b"));
        assert_eq!(render(ScalarStyle::SingleQuoted, "it's").as_deref(), Some("'it''s'"));
        assert_eq!(
            render(ScalarStyle::DoubleQuoted, "say \"hi\"\n\\").as_deref(),
            Some(r#""say \"hi\"\n\\""#)
        );
        assert_eq!(
            render(ScalarStyle::DoubleQuoted, "bell\u{7}").as_deref(),
            Some(r#""bell\x07""#)
        );
        assert_eq!(render(ScalarStyle::Literal, "x"), None);
    }

    #[test]
    fn test_rendered_values_decode_back() {
        for value in ["it's", "tab\there", "line\nbreak", "quote \" and \\", ""] {
            let text = render(ScalarStyle::DoubleQuoted, value).unwrap();
            assert!(decodes_to(&text, value), "{text}");
        }
        assert!(decodes_to(&render(ScalarStyle::SingleQuoted, "it's").unwrap(), "it's"));
    }
}
