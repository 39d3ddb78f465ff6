//! Distinguished Name model and hierarchy-depth semantics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

use ldif_core::error::Error as CoreError;

/// Errors that can occur when parsing or manipulating distinguished names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistinguishedNameError {
    /// The distinguished name was empty.
    #[error("distinguished name cannot be empty")]
    Empty,
    /// A component in the distinguished name was invalid.
    #[error("invalid distinguished name component: {0}")]
    InvalidComponent(String),
    /// A component was missing the attribute name to the left of the `=`.
    #[error("distinguished name component missing attribute: {0}")]
    MissingAttribute(String),
    /// A component was missing the value to the right of the `=`.
    #[error("distinguished name component missing value for attribute {0}")]
    MissingValue(String),
    /// The distinguished name ended with an escape character.
    #[error("distinguished name contains an unterminated escape sequence")]
    UnterminatedEscape,
    /// A hex escape decoded to bytes that are not valid UTF-8.
    #[error("distinguished name contains an invalid escape sequence in {0}")]
    InvalidEscape(String),
}

impl From<DistinguishedNameError> for CoreError {
    fn from(err: DistinguishedNameError) -> Self {
        CoreError::InvalidDn(err.to_string())
    }
}

/// Relative distinguished name (single attribute/value pair).
///
/// Equality ignores the case of the attribute type and respects the case of the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeDistinguishedName {
    attribute: String,
    value: String,
}

impl RelativeDistinguishedName {
    /// Create a new relative distinguished name.
    #[must_use]
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Attribute portion of the RDN (e.g. `cn`).
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Attribute value portion of the RDN, with escapes decoded.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true if this RDN matches the provided attribute name (case-insensitive).
    #[must_use]
    pub fn matches_attribute(&self, attribute: &str) -> bool {
        self.attribute.eq_ignore_ascii_case(attribute)
    }
}

impl PartialEq for RelativeDistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.matches_attribute(&other.attribute) && self.value == other.value
    }
}

impl Eq for RelativeDistinguishedName {}

impl Hash for RelativeDistinguishedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.attribute.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        self.value.hash(state);
    }
}

/// Strongly-typed distinguished name wrapper.
///
/// The structure keeps a canonical string representation while providing convenient access to the
/// individual relative distinguished names. Parsing is intentionally strict to surface malformed
/// DNs early. Serialized as its canonical string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DistinguishedName {
    raw: String,
    rdns: Vec<Vec<RelativeDistinguishedName>>,
}

impl DistinguishedName {
    /// Parses a distinguished name from a string.
    ///
    /// # Errors
    ///
    /// Returns [`DistinguishedNameError`] if the distinguished name is empty or contains invalid
    /// syntax.
    pub fn parse(input: impl AsRef<str>) -> std::result::Result<Self, DistinguishedNameError> {
        let raw = input.as_ref().trim();
        if raw.is_empty() {
            return Err(DistinguishedNameError::Empty);
        }

        let mut rdns = Vec::new();
        for component in split_escaped(raw, ',')? {
            let mut rdn_components = Vec::new();
            for part in split_escaped(&component, '+')? {
                let (attribute, value) = split_attribute_value(&part)?;
                rdn_components.push(RelativeDistinguishedName::new(attribute, value));
            }

            if rdn_components.is_empty() {
                return Err(DistinguishedNameError::InvalidComponent(component));
            }

            rdns.push(rdn_components);
        }

        Ok(Self::from_rdns(rdns))
    }

    fn from_rdns(rdns: Vec<Vec<RelativeDistinguishedName>>) -> Self {
        Self {
            raw: rdns_to_string(&rdns),
            rdns,
        }
    }

    /// Borrows the canonical distinguished name string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of RDN components; a `+`-joined multi-valued RDN counts once.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.rdns.len()
    }

    /// Returns the RDN sets in order (each set represents a `+`-joined group).
    #[must_use]
    pub fn rdns(&self) -> &[Vec<RelativeDistinguishedName>] {
        &self.rdns
    }

    /// Returns an iterator over all relative distinguished names in order.
    #[must_use]
    pub fn components(&self) -> impl Iterator<Item = &RelativeDistinguishedName> + '_ {
        self.rdns.iter().flat_map(|rdn| rdn.iter())
    }

    /// Looks up the value for the first attribute that matches `attribute` (case-insensitive).
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.components()
            .find(|rdn| rdn.matches_attribute(attribute))
            .map(RelativeDistinguishedName::value)
    }

    /// Returns true if the distinguished name contains a matching attribute/value pair.
    #[must_use]
    pub fn contains(&self, attribute: &str, value: &str) -> bool {
        self.components()
            .any(|rdn| rdn.matches_attribute(attribute) && rdn.value.eq_ignore_ascii_case(value))
    }

    /// Returns the immediate parent, or `None` for a single-component DN.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.rdns.len() <= 1 {
            return None;
        }
        Some(Self::from_rdns(self.rdns[1..].to_vec()))
    }

    /// Returns true if `ancestor` is a strict suffix of this distinguished name.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: &DistinguishedName) -> bool {
        let depth = self.depth();
        let ancestor_depth = ancestor.depth();
        depth > ancestor_depth && self.rdns[depth - ancestor_depth..] == ancestor.rdns[..]
    }

    /// Creates a new distinguished name by prefixing the provided RDN.
    #[must_use]
    pub fn with_prefix(mut self, rdn: RelativeDistinguishedName) -> Self {
        self.rdns.insert(0, vec![rdn]);
        self.raw = rdns_to_string(&self.rdns);
        self
    }

    /// Creates a new distinguished name by appending another distinguished name.
    ///
    /// This is useful when combining an entry-specific RDN with a base DN.
    #[must_use]
    pub fn join(mut self, suffix: &DistinguishedName) -> Self {
        self.rdns.extend(suffix.rdns.iter().cloned());
        self.raw = rdns_to_string(&self.rdns);
        self
    }
}

impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.rdns == other.rdns
    }
}

impl Eq for DistinguishedName {}

impl Hash for DistinguishedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rdns.hash(state);
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for DistinguishedName {
    type Err = DistinguishedNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DistinguishedName> for String {
    fn from(value: DistinguishedName) -> Self {
        value.raw
    }
}

impl TryFrom<&str> for DistinguishedName {
    type Error = DistinguishedNameError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for DistinguishedName {
    type Error = DistinguishedNameError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Splits on unescaped `delimiter`, keeping escape sequences intact for later decoding.
fn split_escaped(
    input: &str,
    delimiter: char,
) -> std::result::Result<Vec<String>, DistinguishedNameError> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in input.chars() {
        if escape {
            current.push(ch);
            escape = false;
            continue;
        }

        if ch == '\\' {
            current.push(ch);
            escape = true;
            continue;
        }

        if ch == delimiter {
            parts.push(trim_component(&current).to_string());
            current.clear();
            continue;
        }

        current.push(ch);
    }

    if escape {
        return Err(DistinguishedNameError::UnterminatedEscape);
    }

    parts.push(trim_component(&current).to_string());
    if parts.iter().any(String::is_empty) {
        return Err(DistinguishedNameError::InvalidComponent(input.to_string()));
    }
    Ok(parts)
}

/// Trims surrounding whitespace without dropping an escaped trailing space (`\ `).
fn trim_component(input: &str) -> &str {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = bytes.len();

    while end > 0 && bytes[end - 1].is_ascii_whitespace() {
        let backslashes = bytes[..end - 1]
            .iter()
            .rev()
            .take_while(|b| **b == b'\\')
            .count();
        if backslashes % 2 == 1 {
            break;
        }
        end -= 1;
    }

    &trimmed[..end]
}

fn split_attribute_value(
    component: &str,
) -> std::result::Result<(String, String), DistinguishedNameError> {
    let mut escape = false;
    let mut index = None;

    for (i, ch) in component.char_indices() {
        if escape {
            escape = false;
            continue;
        }

        if ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '=' {
            index = Some(i);
            break;
        }
    }

    let idx =
        index.ok_or_else(|| DistinguishedNameError::InvalidComponent(component.to_string()))?;
    let attribute = component[..idx].trim();
    let value_part = component[idx + 1..].trim_start();

    if attribute.is_empty() {
        return Err(DistinguishedNameError::MissingAttribute(
            component.to_string(),
        ));
    }

    if value_part.is_empty() {
        return Err(DistinguishedNameError::MissingValue(attribute.to_string()));
    }

    Ok((attribute.to_string(), unescape(value_part)?))
}

/// Decodes `\c` and `\XX` escapes; hex pairs may form multi-byte UTF-8 sequences.
fn unescape(value: &str) -> std::result::Result<String, DistinguishedNameError> {
    let mut bytes = Vec::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let first = chars
            .next()
            .ok_or(DistinguishedNameError::UnterminatedEscape)?;
        let second = chars.peek().copied();

        match (first.to_digit(16), second.and_then(|c| c.to_digit(16))) {
            (Some(high), Some(low)) => {
                chars.next();
                // Both digits are < 16, so the pair always fits in a byte.
                bytes.push(u8::try_from(high * 16 + low).unwrap_or_default());
            }
            _ => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(first.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8(bytes).map_err(|_| DistinguishedNameError::InvalidEscape(value.to_string()))
}

/// Escapes RFC 4514 specials. Control characters, and whitespace that parsing would trim from
/// either end of the value, are written as `\XX` hex pairs so the canonical form re-parses.
fn escape(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut escaped = String::with_capacity(value.len());

    for (idx, ch) in value.chars().enumerate() {
        let is_first = idx == 0;
        let is_last = idx == last;

        if ch.is_control() || ((is_first || is_last) && ch.is_whitespace() && ch != ' ') {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                escaped.push_str(&format!("\\{byte:02X}"));
            }
            continue;
        }

        let needs_escape = matches!(ch, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=')
            || (is_first && (ch == ' ' || ch == '#'))
            || (is_last && ch == ' ');

        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    escaped
}

fn rdns_to_string(rdns: &[Vec<RelativeDistinguishedName>]) -> String {
    rdns.iter()
        .map(|rdn| {
            rdn.iter()
                .map(|component| format!("{}={}", component.attribute(), escape(component.value())))
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect::<Vec<_>>()
        .join(",")
}
