//! ID prefix constants.
//!
//! Every persisted record gets an ID of the form `<prefix>-<8 hex chars>`,
//! generated by `maize-db`.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_PLANT: &str = "plt";
pub const PREFIX_DISEASE: &str = "dis";
pub const PREFIX_SOIL_READING: &str = "soi";
pub const PREFIX_NOTIFICATION: &str = "ntf";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_USER,
    PREFIX_PLANT,
    PREFIX_DISEASE,
    PREFIX_SOIL_READING,
    PREFIX_NOTIFICATION,
];

/// Local part of an email address (`"a"` for `"a@x.com"`).
///
/// Returns `None` when the local part would be empty.
#[must_use]
pub fn email_local_part(email: &str) -> Option<&str> {
    let local = email.split('@').next().unwrap_or_default().trim();
    if local.is_empty() { None } else { Some(local) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_part_of_plain_address() {
        assert_eq!(email_local_part("a@x.com"), Some("a"));
        assert_eq!(email_local_part("farmer.joe@maize.id"), Some("farmer.joe"));
    }

    #[test]
    fn local_part_without_at_sign_is_whole_string() {
        assert_eq!(email_local_part("nobody"), Some("nobody"));
    }

    #[test]
    fn empty_local_part_is_none() {
        assert_eq!(email_local_part("@x.com"), None);
        assert_eq!(email_local_part(""), None);
    }

    #[test]
    fn prefixes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for prefix in ALL_PREFIXES {
            assert!(seen.insert(*prefix), "duplicate prefix {prefix}");
        }
    }
}
