use validator::ValidationError;

/// Maximum email length per RFC 5321.
const MAX_EMAIL_LEN: usize = 254;

/// Email domain type. Once constructed, guaranteed to be trimmed, lowercase and shaped like
/// `local@domain.tld`. Login is by email alone, so this normalisation is what makes
/// `Jane.Smith@Acme.com ` and `jane.smith@acme.com` the same person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    pub fn new(email: String) -> Result<Self, ValidationError> {
        let normalized = email.trim().to_lowercase();

        if normalized.len() > MAX_EMAIL_LEN {
            let mut error = ValidationError::new("email_too_long");
            error.message = Some("Email address is too long".into());
            return Err(error);
        }

        let well_formed = match normalized.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !normalized.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if well_formed {
            Ok(Self(normalized))
        } else {
            let mut error = ValidationError::new("invalid_email");
            error.message = Some("Please enter your email address".into());
            Err(error)
        }
    }

    /// Get the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
