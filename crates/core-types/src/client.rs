use crate::error::ModelError;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A customer of the booking application.
///
/// The pair (`first_name`, `last_name`) is the natural key: it is unique among
/// persisted clients and it is the only thing equality looks at. The `id` is
/// assigned by the backend the first time the client is saved.
#[derive(Debug, Clone)]
pub struct Client {
    id: Option<Uuid>,
    first_name: String,
    last_name: String,
}

impl Client {
    /// Builds a client after validating and normalising both names.
    ///
    /// A valid name is non-empty and holds only alphabetic characters and
    /// horizontal whitespace. Surrounding whitespace is trimmed and internal
    /// runs are collapsed into a single space.
    pub fn new(first_name: &str, last_name: &str) -> Result<Self, ModelError> {
        let first_name = normalize_name(first_name, "name")?;
        let last_name = normalize_name(last_name, "surname")?;
        Ok(Self {
            id: None,
            first_name,
            last_name,
        })
    }

    /// Returns the same client carrying a backend-assigned identifier.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// A copy of this client under a new name, keeping its identifier.
    pub fn renamed(&self, first_name: &str, last_name: &str) -> Result<Self, ModelError> {
        let renamed = Self::new(first_name, last_name)?;
        Ok(Self {
            id: self.id,
            ..renamed
        })
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// The identifier, or `ModelError::MissingId` for a client never persisted.
    pub fn require_id(&self) -> Result<Uuid, ModelError> {
        self.id.ok_or_else(|| ModelError::MissingId(self.to_string()))
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.first_name == other.first_name && self.last_name == other.last_name
    }
}

impl Eq for Client {}

impl Hash for Client {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first_name.hash(state);
        self.last_name.hash(state);
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client [{} {}]", self.first_name, self.last_name)
    }
}

fn normalize_name(raw: &str, role: &'static str) -> Result<String, ModelError> {
    if raw.trim().is_empty() {
        return Err(ModelError::EmptyName(role));
    }
    if !raw
        .chars()
        .all(|c| c.is_alphabetic() || is_horizontal_whitespace(c))
    {
        return Err(ModelError::NotAlphabetic(role));
    }
    Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Whitespace that does not break a line (tab, space, and the Unicode spaces).
fn is_horizontal_whitespace(c: char) -> bool {
    c == '\t'
        || (c.is_whitespace()
            && !matches!(
                c,
                '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
            ))
}
