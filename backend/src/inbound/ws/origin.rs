//! Origin allow-list for WebSocket upgrades.
//!
//! Entries are exact origins (`https://pitchmatch.example`,
//! `http://localhost:3000`) or wildcard subdomains (`https://*.example.com`).
//! A wildcard never matches the bare domain.

use std::collections::HashSet;

use url::Url;

const WILDCARD_PREFIX: &str = "*.";

/// Raised for an allow-list entry that is not an HTTP(S) origin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid allowed origin '{entry}': {reason}")]
pub struct OriginListError {
    pub entry: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct WildcardOrigin {
    scheme: String,
    /// Leading-dot suffix, e.g. `.example.com`.
    suffix: String,
}

/// Parsed allow-list.
///
/// # Examples
/// ```
/// use pitchmatch::inbound::ws::origin::AllowedOrigins;
/// use url::Url;
///
/// let origins = AllowedOrigins::parse(["https://*.pitchmatch.example"])?;
/// assert!(origins.allows(&Url::parse("https://live.pitchmatch.example")?));
/// assert!(!origins.allows(&Url::parse("https://pitchmatch.example")?));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins {
    exact: HashSet<String>,
    wildcards: Vec<WildcardOrigin>,
}

fn invalid(entry: &str, reason: &'static str) -> OriginListError {
    OriginListError {
        entry: entry.to_owned(),
        reason,
    }
}

fn is_web_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https")
}

fn parse_wildcard(entry: &str, scheme: &str, rest: &str) -> Result<WildcardOrigin, OriginListError> {
    let domain = rest
        .strip_prefix(WILDCARD_PREFIX)
        .ok_or_else(|| invalid(entry, "wildcards must be a leading `*.` label"))?;
    let valid = !domain.is_empty()
        && domain.contains('.')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'));
    if !valid {
        return Err(invalid(entry, "wildcard domain must be a dotted host name"));
    }
    Ok(WildcardOrigin {
        scheme: scheme.to_owned(),
        suffix: format!(".{}", domain.to_ascii_lowercase()),
    })
}

fn parse_exact(entry: &str) -> Result<String, OriginListError> {
    let url = Url::parse(entry).map_err(|_| invalid(entry, "not a URL"))?;
    if !is_web_scheme(url.scheme()) {
        return Err(invalid(entry, "scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid(entry, "origin has no host"));
    }
    if url.path() != "/" || url.query().is_some() {
        return Err(invalid(entry, "origin must not carry a path or query"));
    }
    Ok(url.origin().ascii_serialization())
}

impl AllowedOrigins {
    /// Parse configured entries. Blank entries are skipped.
    pub fn parse<I, S>(entries: I) -> Result<Self, OriginListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut origins = Self::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            let (scheme, rest) = entry
                .split_once("://")
                .ok_or_else(|| invalid(entry, "missing scheme"))?;
            if rest.contains('*') {
                if !is_web_scheme(scheme) {
                    return Err(invalid(entry, "scheme must be http or https"));
                }
                origins.wildcards.push(parse_wildcard(entry, scheme, rest)?);
            } else {
                origins.exact.insert(parse_exact(entry)?);
            }
        }
        Ok(origins)
    }

    /// True when nothing is allowed.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.wildcards.is_empty()
    }

    /// Whether a browser `Origin` may open a socket.
    pub fn allows(&self, origin: &Url) -> bool {
        if self.exact.contains(&origin.origin().ascii_serialization()) {
            return true;
        }
        let Some(host) = origin.host_str() else {
            return false;
        };
        self.wildcards.iter().any(|wildcard| {
            origin.scheme() == wildcard.scheme
                && host.len() > wildcard.suffix.len()
                && host.ends_with(&wildcard.suffix)
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn origins() -> AllowedOrigins {
        AllowedOrigins::parse([
            "http://localhost:3000",
            "https://pitchmatch.example/",
            "https://*.pitchmatch.example",
            "  ",
        ])
        .expect("valid allow-list")
    }

    #[rstest]
    #[case("http://localhost:3000", true)]
    #[case("http://localhost:4000", false)]
    #[case("https://pitchmatch.example", true)]
    #[case("https://PitchMatch.example", true)]
    #[case("https://live.pitchmatch.example", true)]
    #[case("https://a.b.pitchmatch.example", true)]
    #[case("http://live.pitchmatch.example", false)]
    #[case("https://pitchmatch.example.evil.com", false)]
    #[case("https://evilpitchmatch.example", false)]
    #[case("null", false)]
    fn evaluates_origins(origins: AllowedOrigins, #[case] origin: &str, #[case] expected: bool) {
        let allowed = Url::parse(origin).is_ok_and(|url| origins.allows(&url));
        assert_eq!(allowed, expected);
    }

    #[rstest]
    #[case("localhost:3000")]
    #[case("ftp://files.example")]
    #[case("https://pitchmatch.example/app")]
    #[case("https://live.*.example")]
    #[case("https://*.com")]
    #[case("wss://*.pitchmatch.example")]
    fn rejects_malformed_entries(#[case] entry: &str) {
        let err = AllowedOrigins::parse([entry]).expect_err("entry rejected");
        assert_eq!(err.entry, entry);
    }

    #[rstest]
    fn empty_list_allows_nothing() {
        let origins = AllowedOrigins::parse(Vec::<String>::new()).expect("empty list");
        assert!(origins.is_empty());
        assert!(!origins.allows(&Url::parse("http://localhost:3000").expect("url")));
    }
}
