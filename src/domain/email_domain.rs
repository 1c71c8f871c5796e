//! Domain-restricted email pattern used for admission.

use regex::Regex;

/// The fixed identity domain participants must belong to.
///
/// An address is accepted when it has the shape `local-part@<domain>` where
/// the local part is one or more of `[A-Za-z0-9._%+-]` and the domain matches
/// exactly (case-sensitive).
#[derive(Debug, Clone)]
pub struct EmailDomain {
    domain: String,
    pattern: Regex,
}

impl EmailDomain {
    /// Builds the admission pattern for `domain` (e.g. `"vitbhopal.ac.in"`).
    ///
    /// # Errors
    ///
    /// Returns a [`regex::Error`] if the compiled pattern exceeds the regex
    /// size limits. The domain itself is escaped, so arbitrary input is safe.
    pub fn new(domain: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"^[a-zA-Z0-9._%+-]+@{}$",
            regex::escape(domain)
        ))?;
        Ok(Self {
            domain: domain.to_string(),
            pattern,
        })
    }

    /// Returns `true` if `email` belongs to this domain.
    #[must_use]
    pub fn accepts(&self, email: &str) -> bool {
        self.pattern.is_match(email)
    }

    /// The bare domain this pattern was built from.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn campus() -> EmailDomain {
        let Ok(domain) = EmailDomain::new("vitbhopal.ac.in") else {
            panic!("valid domain");
        };
        domain
    }

    #[test]
    fn accepts_addresses_in_domain() {
        let domain = campus();
        assert!(domain.accepts("a@vitbhopal.ac.in"));
        assert!(domain.accepts("first.last+tag@vitbhopal.ac.in"));
        assert!(domain.accepts("21BCE10042@vitbhopal.ac.in"));
    }

    #[test]
    fn rejects_other_domains() {
        let domain = campus();
        assert!(!domain.accepts("a@gmail.com"));
        assert!(!domain.accepts("a@vitbhopal.ac.in.evil.com"));
        assert!(!domain.accepts("a@sub.vitbhopal.ac.in"));
        assert!(!domain.accepts("a@vitbhopalXacXin"));
    }

    #[test]
    fn rejects_malformed_local_parts() {
        let domain = campus();
        assert!(!domain.accepts("@vitbhopal.ac.in"));
        assert!(!domain.accepts("a b@vitbhopal.ac.in"));
        assert!(!domain.accepts("a@b@vitbhopal.ac.in"));
        assert!(!domain.accepts(""));
    }

    #[test]
    fn domain_accessor() {
        assert_eq!(campus().domain(), "vitbhopal.ac.in");
    }
}
