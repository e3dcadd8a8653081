use serde_json::{Map, Value};

/// Attributes returned by the identity provider after verifying a credential
/// or looking up an account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityClaims {
    /// Provider subject id (Clerk `sub`).
    pub subject_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// Every other claim in the token, passed through untouched.
    pub extra: Map<String, Value>,
}

impl IdentityClaims {
    #[must_use]
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Fill fields this set lacks from a second, more authoritative lookup.
    #[must_use]
    pub fn merged_with(mut self, other: Self) -> Self {
        if self.email.is_none() {
            self.email = other.email;
        }
        if self.display_name.is_none() {
            self.display_name = other.display_name;
        }
        if self.photo_url.is_none() {
            self.photo_url = other.photo_url;
        }
        for (k, v) in other.extra {
            self.extra.entry(k).or_insert(v);
        }
        self
    }

    /// Name to store for a new record: display name, else the email's local
    /// part, else the subject id.
    #[must_use]
    pub fn provisioning_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(maize_core::ids::email_local_part)
            })
            .unwrap_or(&self.subject_id)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_falls_back_to_email_local_part() {
        let claims = IdentityClaims::new("abc123").with_email("a@x.com");
        assert_eq!(claims.provisioning_name(), "a");
    }

    #[test]
    fn blank_display_name_is_ignored() {
        let claims = IdentityClaims::new("abc123")
            .with_email("joe@x.com")
            .with_display_name("   ");
        assert_eq!(claims.provisioning_name(), "joe");
    }

    #[test]
    fn name_falls_back_to_subject_without_email() {
        assert_eq!(IdentityClaims::new("user_2x").provisioning_name(), "user_2x");
    }

    #[test]
    fn merge_keeps_existing_fields() {
        let verified = IdentityClaims::new("s").with_display_name("Token Name");
        let fetched = IdentityClaims::new("s")
            .with_email("s@x.com")
            .with_display_name("Fetched Name");
        let merged = verified.merged_with(fetched);
        assert_eq!(merged.display_name.as_deref(), Some("Token Name"));
        assert_eq!(merged.email.as_deref(), Some("s@x.com"));
    }
}
