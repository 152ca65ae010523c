//! Canonical quote usage: quotes are removed where the plain scalar reads
//! back as the same string, otherwise single quotes replace double quotes
//! where they can.

use super::edits::Edits;
use crate::dom::Scalar;
use crate::syntax::SyntaxNode;
use crate::util::quote::{decodes_to, render, ScalarStyle};

use rowan::TextRange;
use std::collections::HashMap;
use yaml_rust2::Yaml;

/// Characters a plain key or flow scalar may not contain.
const UNSAFE_IN_KEY: &[char] = &[
    ' ', ':', '{', '}', '[', ']', ',', '&', '*', '#', '?', '|', '-', '<', '>', '=', '!', '%', '@',
    '\\', '\t', '\n',
];

/// Characters a plain value may not start with.
const UNSAFE_PREFIX: &[char] = &[
    ':', '{', '}', '[', ']', ',', '&', '*', '#', '?', '|', '-', '<', '>', '=', '!', '%', '@', '\\',
    '\'', '"', '`',
];

pub(crate) fn canonical_quotes(root: &SyntaxNode) -> Edits {
    let mut edits = Edits::default();
    // Styles chosen for keys, their values are visited after them.
    let mut styles: HashMap<TextRange, ScalarStyle> = HashMap::new();

    for scalar in root.descendants().filter_map(Scalar::cast) {
        let (token, style) = match scalar.token().and_then(|t| Some((t.clone(), ScalarStyle::of(&t)?))) {
            Some(v) => v,
            None => continue,
        };
        if style.is_block() {
            continue;
        }
        let value = match scalar.value() {
            Some(Yaml::String(value)) => value,
            _ => continue,
        };

        let target = if has_quoted_key(&scalar, &styles) {
            forced_quotes(style, &value)
        } else {
            canonical_style(&scalar, style, &value)
        };
        let text = match render(target, &value) {
            Some(text) if target != style && decodes_to(&text, &value) => text,
            _ => {
                styles.insert(scalar.syntax().text_range(), style);
                continue;
            }
        };
        tracing::trace!(from = ?style, to = ?target, value = %value, "restyled scalar");
        styles.insert(scalar.syntax().text_range(), target);
        edits.replace(token.text_range(), text);
    }
    edits
}

/// Whether the scalar is the value of an entry whose key ends up quoted.
///
/// Such values keep quotes so that both sides of the entry read alike.
fn has_quoted_key(scalar: &Scalar, styles: &HashMap<TextRange, ScalarStyle>) -> bool {
    if scalar.is_key() {
        return false;
    }
    let key = match scalar.entry().and_then(|e| e.key()) {
        Some(key) => key,
        None => return false,
    };
    styles
        .get(&key.syntax().text_range())
        .copied()
        .or_else(|| key.style())
        .map_or(false, ScalarStyle::is_quoted)
}

fn forced_quotes(style: ScalarStyle, value: &str) -> ScalarStyle {
    if style == ScalarStyle::SingleQuoted || can_single_quote(value) {
        ScalarStyle::SingleQuoted
    } else {
        ScalarStyle::DoubleQuoted
    }
}

fn canonical_style(scalar: &Scalar, style: ScalarStyle, value: &str) -> ScalarStyle {
    match style {
        ScalarStyle::Plain => ScalarStyle::Plain,
        _ if can_strip_quotes(scalar, value) => ScalarStyle::Plain,
        ScalarStyle::DoubleQuoted if can_single_quote(value) => ScalarStyle::SingleQuoted,
        _ => style,
    }
}

/// Whether `value` reads back as itself when written as a plain scalar
/// at the position of `scalar`.
fn can_strip_quotes(scalar: &Scalar, value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_control) {
        return false;
    }
    let safe = if scalar.is_key() || scalar.in_flow() {
        !value.contains(UNSAFE_IN_KEY)
    } else {
        value.trim() == value && !value.starts_with(UNSAFE_PREFIX)
    };
    safe && decodes_to(value, value)
}

/// Single quotes have no escapes, so values with control characters
/// or quotes keep their double quotes.
fn can_single_quote(value: &str) -> bool {
    !value.contains('\'') && !value.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use crate::formatter::{format, Options, Pass};
    use pretty_assertions::assert_eq;

    fn quotes(src: &str) -> String {
        format(src, &[Pass::CanonicalQuotes], &Options::default()).unwrap()
    }

    #[test]
    fn test_canonical_quotes() {
        let cases = [
            ("key: 'string'", "key: string"),
            ("key: \"string\"", "key: string"),
            ("key: ''", "key: ''"),
            ("key: \"\"", "key: ''"),
            ("key: 'string with space'", "key: string with space"),
            ("key: \"string with space\"", "key: string with space"),
            ("key: '@timestamp'", "key: '@timestamp'"),
            ("key: \"@timestamp\"", "key: '@timestamp'"),
            ("key: '1.2.3'", "key: 1.2.3"),
            ("key: \"1.2.3\"", "key: 1.2.3"),
            ("key: '^1.2.0'", "key: ^1.2.0"),
            ("key: \"1.2.3 || 2.0.0\"", "key: 1.2.3 || 2.0.0"),
            ("key: '1.2'", "key: '1.2'"),
            ("key: \"1.2\"", "key: '1.2'"),
            (r"key: 'one\ntwo'", r"key: one\ntwo"),
            (r#"key: "one\ntwo""#, r#"key: "one\ntwo""#),
            ("key: |\n  one\n  two'", "key: |\n  one\n  two'"),
            ("key: >\n  one\n  two'", "key: >\n  one\n  two'"),
            ("if: '!ok'", "if: '!ok'"),
            ("if: \"!ok\"", "if: '!ok'"),
            (r#"if: '!ok("string")'"#, r#"if: '!ok("string")'"#),
            (r#"if: "!ok('string')""#, r#"if: "!ok('string')""#),
            (r#"if: 'ok("string")'"#, r#"if: ok("string")"#),
            (r#"if: "ok('string')""#, r#"if: ok('string')"#),
            ("key: 'yes'", "key: yes"),
            ("key: \"No\"", "key: No"),
            ("key: \"y\"", "key: y"),
            ("key: \"true\"", "key: 'true'"),
            ("key: \"null\"", "key: 'null'"),
            ("key: \"~\"", "key: '~'"),
            ("key: \"value # not a comment\"", "key: 'value # not a comment'"),
            ("key: \" padded \"", "key: ' padded '"),
            ("key: \"a: b\"", "key: 'a: b'"),
        ];
        for (src, expected) in cases {
            assert_eq!(quotes(src), expected, "{src}");
        }
    }

    #[test]
    fn test_quoted_keys() {
        let cases = [
            ("'key with spaces': 'value'", "'key with spaces': 'value'"),
            ("\"key with spaces\": 'value'", "'key with spaces': 'value'"),
            (
                "map:\n  \"key1\": 'string1'\n  \"key2\": \"string2\"\n",
                "map:\n  key1: string1\n  key2: string2\n",
            ),
            (
                "map:\n  \"key 1\": \"string1\"\n  \"key 2\": 'string2'\n",
                "map:\n  'key 1': 'string1'\n  'key 2': 'string2'\n",
            ),
            (
                "map:\n  \"key 1\": \"string\\n1\"\n",
                "map:\n  'key 1': \"string\\n1\"\n",
            ),
            ("map:\n  \"key1\": string1\n", "map:\n  key1: string1\n"),
            ("\"key 1\": plain\n", "'key 1': 'plain'\n"),
            ("\"123\": \"string1\"\n", "'123': 'string1'\n"),
            ("\"port\": 8080\n", "port: 8080\n"),
            ("\"it's\": x\n", "it's: x\n"),
            ("\"it's here\": x\n", "\"it's here\": 'x'\n"),
            ("\"data-stream\": x\n", "'data-stream': 'x'\n"),
        ];
        for (src, expected) in cases {
            assert_eq!(quotes(src), expected, "{src}");
        }
    }

    #[test]
    fn test_flow_and_properties() {
        let cases = [
            ("tags: [\"a\", 'b c', \"d,e\"]\n", "tags: [a, 'b c', 'd,e']\n"),
            ("m: {\"k\": \"v\"}\n", "m: {k: v}\n"),
            ("tagged: !!str \"123\"\n", "tagged: !!str \"123\"\n"),
            ("anchored: &a \"x\"\nalias: *a\n", "anchored: &a \"x\"\nalias: *a\n"),
            ("- \"item\"\n- '-dash'\n", "- item\n- '-dash'\n"),
            ("number: \"10\"\nbool: \"true\"\n", "number: '10'\nbool: 'true'\n"),
        ];
        for (src, expected) in cases {
            assert_eq!(quotes(src), expected, "{src}");
        }
    }

    #[test]
    fn test_idempotent() {
        let src = "\"a b\": \"c\"\nd: \"e\\tf\"\ng: ['h', \"i j\"]\nk: \"multi\n  line\"\n";
        let once = quotes(src);
        assert_eq!(once, "'a b': 'c'\nd: \"e\\tf\"\ng: [h, 'i j']\nk: multi line\n");
        assert_eq!(quotes(&once), once);
    }
}
