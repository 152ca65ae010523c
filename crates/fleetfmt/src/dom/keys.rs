use super::error::QueryError;

use std::iter::{empty, once};
use std::str::FromStr;
use std::sync::Arc;

/// One segment of a [`Keys`] path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyOrIndex {
    Key(String),
    Index(usize),
    /// `[*]`, any index of a sequence.
    AnyIndex,
}

impl From<usize> for KeyOrIndex {
    fn from(v: usize) -> Self {
        Self::Index(v)
    }
}

impl From<&str> for KeyOrIndex {
    fn from(v: &str) -> Self {
        Self::Key(v.to_string())
    }
}

impl From<String> for KeyOrIndex {
    fn from(v: String) -> Self {
        Self::Key(v)
    }
}

impl core::fmt::Display for KeyOrIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyOrIndex::Key(k) if needs_quotes(k) => write!(f, "'{}'", k.replace('\'', "''")),
            KeyOrIndex::Key(k) => k.fmt(f),
            KeyOrIndex::Index(i) => write!(f, "[{}]", i),
            KeyOrIndex::AnyIndex => f.write_str("[*]"),
        }
    }
}

fn needs_quotes(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']', '\''])
}

impl KeyOrIndex {
    /// Returns `true` for [`Index`] and [`AnyIndex`].
    ///
    /// [`Index`]: KeyOrIndex::Index
    /// [`AnyIndex`]: KeyOrIndex::AnyIndex
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(..) | Self::AnyIndex)
    }

    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn to_join_string(&self) -> String {
        match self {
            KeyOrIndex::Key(_) => format!(".{}", self),
            _ => self.to_string(),
        }
    }
}

/// A path from the root of a document, `$.a.b[2].c`.
#[derive(Debug, Clone)]
pub struct Keys {
    dotted: Arc<str>,
    keys: Arc<[KeyOrIndex]>,
}

impl Keys {
    #[inline]
    pub fn root() -> Self {
        Self::new(empty())
    }

    pub fn new(keys: impl Iterator<Item = KeyOrIndex>) -> Self {
        let keys: Arc<[KeyOrIndex]> = keys.collect();
        let mut dotted = String::from("$");
        for k in keys.iter() {
            dotted.push_str(&k.to_join_string());
        }
        let dotted: Arc<str> = Arc::from(dotted);
        Self { keys, dotted }
    }

    pub fn join(&self, key: impl Into<KeyOrIndex>) -> Self {
        Self::new(self.keys.iter().cloned().chain(once(key.into())))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &KeyOrIndex> + DoubleEndedIterator {
        self.keys.iter()
    }

    /// The path with literal indices, `$.a[2].b`.
    pub fn dotted(&self) -> &str {
        &self.dotted
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.len() == 0
    }

    /// The same path with every index replaced by `[*]`.
    pub fn lookup(&self) -> Self {
        Self::new(self.keys.iter().map(|k| match k {
            KeyOrIndex::Index(_) => KeyOrIndex::AnyIndex,
            k => k.clone(),
        }))
    }

    /// Dot separated components of the path: the root and every key,
    /// each followed by its indices.
    pub fn components(&self) -> Vec<String> {
        let mut components = vec![String::from("$")];
        for k in self.keys.iter() {
            match k {
                KeyOrIndex::Key(_) => components.push(k.to_string()),
                _ => {
                    if let Some(last) = components.last_mut() {
                        last.push_str(&k.to_string())
                    }
                }
            }
        }
        components
    }

    /// Unrooted forms of the path, longest first: `*.b[*].c`, `*.c`.
    pub fn suffixes(&self) -> impl Iterator<Item = String> {
        let components = self.components();
        (1..components.len()).map(move |i| format!("*.{}", components[i..].join(".")))
    }
}

impl core::fmt::Display for Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.dotted().fmt(f)
    }
}

impl FromStr for Keys {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| QueryError::InvalidPath {
            expr: s.to_string(),
            reason,
        };
        let mut rest = s.strip_prefix('$').ok_or_else(|| invalid("must start with '$'"))?;
        let mut keys = Vec::new();
        while !rest.is_empty() {
            if let Some(r) = rest.strip_prefix(".'") {
                let (key, r) = unquote_key(r).ok_or_else(|| invalid("unterminated quoted key"))?;
                keys.push(KeyOrIndex::Key(key));
                rest = r;
            } else if let Some(r) = rest.strip_prefix('.') {
                let end = r.find(['.', '[']).unwrap_or(r.len());
                if end == 0 {
                    return Err(invalid("empty key"));
                }
                keys.push(KeyOrIndex::Key(r[..end].to_string()));
                rest = &r[end..];
            } else if let Some(r) = rest.strip_prefix('[') {
                let end = r.find(']').ok_or_else(|| invalid("unterminated index"))?;
                keys.push(match &r[..end] {
                    "*" => KeyOrIndex::AnyIndex,
                    index => KeyOrIndex::Index(index.parse().map_err(|_| invalid("invalid index"))?),
                });
                rest = &r[end + 1..];
            } else {
                return Err(invalid("expected '.' or '['"));
            }
        }
        Ok(Keys::new(keys.into_iter()))
    }
}

/// Reads a key quoted with `'` up to its closing quote, `''` escapes a quote.
fn unquote_key(s: &str) -> Option<(String, &str)> {
    let mut key = String::new();
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\'' {
            key.push(c);
        } else if s[i + 1..].starts_with('\'') {
            key.push('\'');
            chars.next();
        } else {
            return Some((key, &s[i + 1..]));
        }
    }
    None
}

impl PartialEq for Keys {
    fn eq(&self, other: &Self) -> bool {
        self.dotted == other.dotted
    }
}

impl Eq for Keys {}

impl std::hash::Hash for Keys {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.dotted.hash(state);
    }
}
