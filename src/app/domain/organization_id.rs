/// Organization ID domain type. Wraps ULID.
///
/// Ordered so scope sets iterate deterministically.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct OrganizationId(ulid::Ulid);

impl OrganizationId {
    /// Generate a new random ULID.
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get as string for storage/display.
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    /// Parse from string.
    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

impl Default for OrganizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_storage_form() {
        let id = OrganizationId::new();
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn parse_round_trips_through_storage_form() {
        let id = OrganizationId::new();
        assert_eq!(OrganizationId::from_string(&id.as_str()).unwrap(), id);
    }

    #[test]
    fn parse_rejects_non_ulid() {
        assert!(OrganizationId::from_string("org-acme-corp").is_err());
    }
}
