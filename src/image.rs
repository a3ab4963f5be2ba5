//! Container image references

use std::fmt;
use std::str::FromStr;

/// Tag used when a reference names neither a tag nor a digest.
pub const DEFAULT_TAG: &str = "latest";

/// A remotely fetchable image, e.g. `swebench/sweb.eval.x86_64.astropy_1776_astropy-12907:latest`.
///
/// The original text is kept verbatim so that console output matches the
/// input list line for line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    raw: String,
    repository_end: usize,
    reference: Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Reference {
    Tag(usize),
    Digest(usize),
    Implicit,
}

impl ImageRef {
    /// Parse a single reference. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, String> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err("empty image reference".to_string());
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(format!("whitespace in image reference '{}'", raw));
        }

        let (repository_end, reference) = if let Some(at) = raw.find('@') {
            (at, Reference::Digest(at + 1))
        } else {
            let name_start = raw.rfind('/').map(|i| i + 1).unwrap_or(0);
            match raw[name_start..].rfind(':') {
                Some(colon) => {
                    let colon = name_start + colon;
                    (colon, Reference::Tag(colon + 1))
                }
                None => (raw.len(), Reference::Implicit),
            }
        };

        if repository_end == 0 {
            return Err(format!("missing repository in '{}'", raw));
        }
        match reference {
            Reference::Tag(start) | Reference::Digest(start) if start >= raw.len() => {
                return Err(format!("empty tag or digest in '{}'", raw));
            }
            _ => {}
        }

        Ok(Self {
            raw: raw.to_string(),
            repository_end,
            reference,
        })
    }

    /// The reference exactly as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Repository part, including any registry host
    pub fn repository(&self) -> &str {
        &self.raw[..self.repository_end]
    }

    /// Tag or digest to request from the registry.
    ///
    /// Falls back to `latest` so a pull never fetches every tag of a repository.
    pub fn tag(&self) -> &str {
        match self.reference {
            Reference::Tag(start) | Reference::Digest(start) => &self.raw[start..],
            Reference::Implicit => DEFAULT_TAG,
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ImageRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_reference() {
        let image = ImageRef::parse("swecompass/eval:django_django").unwrap();
        assert_eq!(image.repository(), "swecompass/eval");
        assert_eq!(image.tag(), "django_django");
    }

    #[test]
    fn test_implicit_latest() {
        let image = ImageRef::parse("ubuntu").unwrap();
        assert_eq!(image.repository(), "ubuntu");
        assert_eq!(image.tag(), "latest");
        assert_eq!(image.as_str(), "ubuntu");
    }

    #[test]
    fn test_registry_port_is_not_a_tag() {
        let image = ImageRef::parse("localhost:5000/team/app").unwrap();
        assert_eq!(image.repository(), "localhost:5000/team/app");
        assert_eq!(image.tag(), "latest");

        let image = ImageRef::parse("localhost:5000/team/app:v2").unwrap();
        assert_eq!(image.repository(), "localhost:5000/team/app");
        assert_eq!(image.tag(), "v2");
    }

    #[test]
    fn test_digest_reference() {
        let image = ImageRef::parse("alpine@sha256:abcdef").unwrap();
        assert_eq!(image.repository(), "alpine");
        assert_eq!(image.tag(), "sha256:abcdef");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let image = ImageRef::parse("  redis:7 \r").unwrap();
        assert_eq!(image.as_str(), "redis:7");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(ImageRef::parse("").is_err());
        assert!(ImageRef::parse("   ").is_err());
        assert!(ImageRef::parse("two words").is_err());
        assert!(ImageRef::parse(":tag").is_err());
        assert!(ImageRef::parse("repo:").is_err());
        assert!(ImageRef::parse("repo@").is_err());
    }
}
