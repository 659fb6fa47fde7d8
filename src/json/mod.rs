//! Located JSON document tree.
//!
//! Manifests are parsed with `serde_json` and then lifted into [`JsonNode`], a
//! tagged tree in which every node remembers where it lives in its document.
//! The location is the node's JSON Pointer (RFC 6901), which is stable,
//! unambiguous and printable next to the file name in diagnostics:
//!
//! ```text
//! libs/my-plugin/generators.json:/generators/app/schema
//! ```
//!
//! Validators never index into a node blindly. They match on the node shape
//! and treat a wrong shape as something to report, not as a failure.
//!
//! # Examples
//!
//! ```rust
//! use plugin_checks::json::parse_document;
//!
//! let root = parse_document(r#"{"generators": {"app": {"schema": "./schema.json"}}}"#)?;
//! let schema = root
//!     .property("generators")
//!     .and_then(|p| p.value.property("app"))
//!     .and_then(|p| p.value.property("schema"))
//!     .unwrap();
//!
//! assert_eq!(schema.value.as_str(), Some("./schema.json"));
//! assert_eq!(schema.value.location().pointer(), "/generators/app/schema");
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// Position of a node inside its document, as a JSON Pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Location {
    pointer: String,
}

impl Location {
    /// The location of the document root (the empty pointer).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Location of a child reached through `segment` (an object key or an array index).
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let escaped = segment.replace('~', "~0").replace('/', "~1");
        Self {
            pointer: format!("{}/{}", self.pointer, escaped),
        }
    }

    /// The raw JSON Pointer string.
    #[must_use]
    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.pointer)
        }
    }
}

/// Scalar JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

/// One `key: value` member of an object node.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The member name.
    pub key: String,
    /// The member value; its location doubles as the property location.
    pub value: JsonNode,
}

impl Property {
    /// Location used when a diagnostic targets the property as a whole.
    #[must_use]
    pub fn location(&self) -> &Location {
        self.value.location()
    }
}

/// A node of a parsed JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    /// An object; members keep their document order.
    Object {
        properties: Vec<Property>,
        location: Location,
    },
    /// An array of nodes.
    Array {
        elements: Vec<JsonNode>,
        location: Location,
    },
    /// A string, number, boolean or null.
    Literal {
        value: Literal,
        location: Location,
    },
}

impl JsonNode {
    /// Lifts a `serde_json` value into a located tree rooted at `location`.
    #[must_use]
    pub fn from_value(value: Value, location: Location) -> Self {
        match value {
            Value::Object(map) => {
                let properties = map
                    .into_iter()
                    .map(|(key, value)| {
                        let child = location.child(&key);
                        Property {
                            key,
                            value: Self::from_value(value, child),
                        }
                    })
                    .collect();
                Self::Object {
                    properties,
                    location,
                }
            }
            Value::Array(items) => {
                let elements = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let child = location.child(&index.to_string());
                        Self::from_value(item, child)
                    })
                    .collect();
                Self::Array {
                    elements,
                    location,
                }
            }
            Value::String(s) => Self::literal(Literal::String(s), location),
            Value::Number(n) => Self::literal(Literal::Number(n), location),
            Value::Bool(b) => Self::literal(Literal::Bool(b), location),
            Value::Null => Self::literal(Literal::Null, location),
        }
    }

    fn literal(value: Literal, location: Location) -> Self {
        Self::Literal {
            value,
            location,
        }
    }

    /// Where this node sits in its document.
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::Object {
                location,
                ..
            }
            | Self::Array {
                location,
                ..
            }
            | Self::Literal {
                location,
                ..
            } => location,
        }
    }

    /// Object members, or `None` for arrays and literals.
    #[must_use]
    pub fn as_object(&self) -> Option<&[Property]> {
        match self {
            Self::Object {
                properties,
                ..
            } => Some(properties),
            _ => None,
        }
    }

    /// Array elements, or `None` for objects and literals.
    #[must_use]
    pub fn as_array(&self) -> Option<&[JsonNode]> {
        match self {
            Self::Array {
                elements,
                ..
            } => Some(elements),
            _ => None,
        }
    }

    /// The string value of a string literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Literal {
                value: Literal::String(s),
                ..
            } => Some(s),
            _ => None,
        }
    }

    /// `true` for object nodes.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// First member named `key`, if this is an object that has one.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.as_object()?.iter().find(|p| p.key == key)
    }

    /// First member whose name is any of `keys`, in member order.
    #[must_use]
    pub fn property_any(&self, keys: &[&str]) -> Option<&Property> {
        self.as_object()?.iter().find(|p| keys.contains(&p.key.as_str()))
    }

    /// Short shape name used in log output.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Object {
                ..
            } => "object",
            Self::Array {
                ..
            } => "array",
            Self::Literal {
                value: Literal::String(_),
                ..
            } => "string",
            Self::Literal {
                value: Literal::Number(_),
                ..
            } => "number",
            Self::Literal {
                value: Literal::Bool(_),
                ..
            } => "boolean",
            Self::Literal {
                value: Literal::Null,
                ..
            } => "null",
        }
    }
}

/// Parses JSON text into a located tree.
///
/// Comments and trailing commas are accepted, as in every JSON file the
/// workspace tooling reads (see [`from_jsonc`]).
///
/// # Errors
///
/// Returns the `serde_json` error when `text` is not a single valid JSON document.
pub fn parse_document(text: &str) -> Result<JsonNode, serde_json::Error> {
    let value: Value = from_jsonc(text)?;
    Ok(JsonNode::from_value(value, Location::root()))
}

/// Deserializes JSON text that may contain `//` and `/* */` comments and
/// trailing commas.
///
/// # Errors
///
/// Returns the `serde_json` error for anything else that is not valid JSON.
pub fn from_jsonc<T>(text: &str) -> Result<T, serde_json::Error>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(&strip_jsonc(text))
}

/// Blanks out comments and trailing commas so `serde_json` can read the text.
///
/// Removed characters become spaces and newlines are kept, so error positions
/// still point into the original text. An unterminated block comment is left
/// in place for the parser to reject.
#[must_use]
pub fn strip_jsonc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some((i, c)) = chars.next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        match (c, chars.peek().map(|&(_, next)| next)) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                out.push(' ');
                while let Some(&(_, next)) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    out.push(if next == '\r' { next } else { ' ' });
                    chars.next();
                }
            }
            ('/', Some('*')) => match text[i + 2..].find("*/") {
                Some(len) => {
                    let comment = &text[i..i + 2 + len + 2];
                    out.extend(comment.chars().map(|ch| if matches!(ch, '\n' | '\r') { ch } else { ' ' }));
                    while chars.peek().is_some_and(|&(j, _)| j < i + comment.len()) {
                        chars.next();
                    }
                }
                None => {
                    out.push_str(&text[i..]);
                    break;
                }
            },
            ('}' | ']', _) => {
                let trimmed = out.trim_end_matches(char::is_whitespace).len();
                let follows_value = out[..trimmed]
                    .strip_suffix(',')
                    .map(|before| before.trim_end_matches(char::is_whitespace))
                    .is_some_and(|before| !before.ends_with(['{', '[', ',', ':']));
                if follows_value {
                    out.replace_range(trimmed - 1..trimmed, " ");
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
