//! Uploaded files: startup logos and pitch decks.
//!
//! Contents are opaque. Only the storage name is controlled: a random,
//! collision-free stem that keeps the uploaded file's extension.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 10;

/// Bucket an asset is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    Logos,
    PitchDecks,
}

impl AssetKind {
    /// Directory and URL segment for the bucket.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Logos => "logos",
            Self::PitchDecks => "pitch-decks",
        }
    }

    fn name_prefix(self) -> &'static str {
        match self {
            Self::Logos => "logo_",
            Self::PitchDecks => "deck_",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for an unknown bucket segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset kind: {0}")]
pub struct UnknownAssetKindError(pub String);

impl FromStr for AssetKind {
    type Err = UnknownAssetKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logos" => Ok(Self::Logos),
            "pitch-decks" => Ok(Self::PitchDecks),
            other => Err(UnknownAssetKindError(other.to_owned())),
        }
    }
}

/// Raised when a stored asset name is not safe to resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid asset name: {0}")]
pub struct AssetNameError(pub String);

/// Flat file name inside an asset bucket.
///
/// ## Invariants
/// - Non-empty, no path separators, no leading dot.
/// - Only ASCII alphanumerics, `_`, `-` and `.`.
///
/// # Examples
/// ```
/// use pitchmatch::domain::{AssetKind, AssetName};
///
/// let name = AssetName::generate(AssetKind::Logos, Some("Brand Mark.PNG"));
/// assert!(name.as_str().starts_with("logo_"));
/// assert!(name.as_str().ends_with(".png"));
/// assert!(AssetName::parse("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetName(String);

fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.trim().to_ascii_lowercase();
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(ext)
}

impl AssetName {
    /// Fresh random name in `kind`, keeping a sane extension from `filename`.
    pub fn generate(kind: AssetKind, filename: Option<&str>) -> Self {
        let stem = format!("{}{}", kind.name_prefix(), Uuid::new_v4().simple());
        match filename.and_then(extension_of) {
            Some(ext) => Self(format!("{stem}.{ext}")),
            None => Self(stem),
        }
    }

    /// Validate a name received from a request path.
    pub fn parse(raw: &str) -> Result<Self, AssetNameError> {
        let valid = !raw.is_empty()
            && !raw.starts_with('.')
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(AssetNameError(raw.to_owned()));
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AssetKind::Logos, Some("logo.svg"), "logo_", Some("svg"))]
    #[case(AssetKind::PitchDecks, Some("Deck.final.PDF"), "deck_", Some("pdf"))]
    #[case(AssetKind::PitchDecks, Some("no-extension"), "deck_", None)]
    #[case(AssetKind::Logos, Some("weird.p n g"), "logo_", None)]
    #[case(AssetKind::Logos, None, "logo_", None)]
    fn generated_names_keep_safe_extensions(
        #[case] kind: AssetKind,
        #[case] filename: Option<&str>,
        #[case] prefix: &str,
        #[case] ext: Option<&str>,
    ) {
        let name = AssetName::generate(kind, filename);
        assert!(name.as_str().starts_with(prefix));
        assert_eq!(name.as_str().split_once('.').map(|(_, e)| e), ext);
        assert!(AssetName::parse(name.as_str()).is_ok());
    }

    #[rstest]
    fn generated_names_do_not_collide() {
        let a = AssetName::generate(AssetKind::Logos, Some("a.png"));
        let b = AssetName::generate(AssetKind::Logos, Some("a.png"));
        assert_ne!(a, b);
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("a/b.png")]
    #[case("..\\x")]
    #[case("name with space.png")]
    fn rejects_unsafe_names(#[case] raw: &str) {
        assert!(AssetName::parse(raw).is_err());
    }

    #[rstest]
    #[case("logos", AssetKind::Logos)]
    #[case("pitch-decks", AssetKind::PitchDecks)]
    fn kind_parses_url_segment(#[case] raw: &str, #[case] kind: AssetKind) {
        assert_eq!(raw.parse::<AssetKind>(), Ok(kind));
        assert_eq!(kind.to_string(), raw);
    }
}
