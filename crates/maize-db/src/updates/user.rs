//! User profile update.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl UserUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.photo_url.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.bio.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_client_field_names() {
        let update: UserUpdate =
            serde_json::from_str(r#"{"name":"Budi","photoURL":"https://img"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("Budi"));
        assert_eq!(update.photo_url.as_deref(), Some("https://img"));
        assert!(update.bio.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let update: UserUpdate = serde_json::from_str(r#"{"role":"admin"}"#).unwrap();
        assert!(update.is_empty());
    }
}
