use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid Client ID format")]
pub struct ValidationError {
    pub input: String,
}

/// A client identifier that has passed [`validate`]; the only id type the fetchers accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ClientId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepts non-empty ASCII alphanumerics and hyphens, nothing else (no trimming).
pub fn validate(id: &str) -> Result<ClientId, ValidationError> {
    let ok = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !ok {
        return Err(ValidationError {
            input: id.to_string(),
        });
    }
    Ok(ClientId(id.to_string()))
}
