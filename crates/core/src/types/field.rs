//! Dotted field paths and profile edits.
//!
//! Form inputs address profile leaves as `"<section>.<field>"` using the
//! camelCase wire names (`meta.siteName`, `product.price`). Edits never fail:
//! a path that does not name an editable leaf leaves the profile unchanged,
//! so partially wired inputs are harmless.

use core::fmt;
use std::str::FromStr;

use super::profile::StoreProfile;

/// Errors that can occur when parsing a [`FieldPath`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldPathError {
    /// The path has no `.` separator.
    #[error("field path must look like <section>.<field>, got {0:?}")]
    MissingSeparator(String),
    /// The section is not part of the profile schema.
    #[error("unknown section: {0}")]
    UnknownSection(String),
    /// The section exists but has no editable field with this name.
    #[error("unknown field {field} in section {section}")]
    UnknownField {
        /// Section the field was looked up in.
        section: Section,
        /// The field name as given.
        field: String,
    },
}

/// How a form input's raw value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    /// Stored verbatim.
    #[default]
    Text,
    /// Parsed as a floating-point number, falling back to `0`.
    Number,
}

/// Top-level sections of a [`StoreProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Meta,
    Creator,
    Product,
    Contact,
    Socials,
    Seo,
}

impl Section {
    /// All sections, in schema order.
    pub const ALL: [Self; 6] = [
        Self::Meta,
        Self::Creator,
        Self::Product,
        Self::Contact,
        Self::Socials,
        Self::Seo,
    ];

    /// Wire name of the section.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Creator => "creator",
            Self::Product => "product",
            Self::Contact => "contact",
            Self::Socials => "socials",
            Self::Seo => "seo",
        }
    }

    /// Editable leaf names in this section.
    ///
    /// `product.images` is deliberately absent: the gallery is managed by the
    /// image intake pipeline, not by form edits.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Meta => &["siteName", "siteSlug", "baseLanguage", "baseCurrency"],
            Self::Creator => &["bio", "location"],
            Self::Product => &["title", "description", "price"],
            Self::Contact => &["email", "phone"],
            Self::Socials => &["twitter", "instagram", "linkedin"],
            Self::Seo => &["title", "description"],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| FieldPathError::UnknownSection(s.to_owned()))
    }
}

/// A validated `"<section>.<field>"` address of an editable profile leaf.
///
/// ## Examples
///
/// ```
/// use lingofy_core::{FieldKind, FieldPath, Section};
///
/// let path = FieldPath::parse("product.price").unwrap();
/// assert_eq!(path.section(), Section::Product);
/// assert_eq!(path.kind(), FieldKind::Number);
///
/// assert!(FieldPath::parse("siteName").is_err());
/// assert!(FieldPath::parse("product.images").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath {
    section: Section,
    field: &'static str,
}

impl FieldPath {
    /// Parse a dotted path against the profile schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no separator, or names a section or
    /// field that is not part of the schema.
    pub fn parse(path: &str) -> Result<Self, FieldPathError> {
        let (section, field) = path
            .split_once('.')
            .ok_or_else(|| FieldPathError::MissingSeparator(path.to_owned()))?;
        let section: Section = section.parse()?;
        let field = section
            .fields()
            .iter()
            .copied()
            .find(|name| *name == field)
            .ok_or_else(|| FieldPathError::UnknownField {
                section,
                field: field.to_owned(),
            })?;

        Ok(Self { section, field })
    }

    /// The section this path points into.
    #[must_use]
    pub const fn section(&self) -> Section {
        self.section
    }

    /// The leaf name within the section.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// The kind of input the schema uses for this leaf.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        if matches!(self.section, Section::Product) && self.field == "price" {
            FieldKind::Number
        } else {
            FieldKind::Text
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.field)
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Mutable handle to a profile leaf.
enum Leaf<'a> {
    Text(&'a mut String),
    Price(&'a mut f64),
}

impl StoreProfile {
    fn leaf_mut(&mut self, path: FieldPath) -> Option<Leaf<'_>> {
        let leaf = match (path.section, path.field) {
            (Section::Meta, "siteName") => Leaf::Text(&mut self.meta.site_name),
            (Section::Meta, "siteSlug") => Leaf::Text(&mut self.meta.site_slug),
            (Section::Meta, "baseLanguage") => Leaf::Text(&mut self.meta.base_language),
            (Section::Meta, "baseCurrency") => Leaf::Text(&mut self.meta.base_currency),
            (Section::Creator, "bio") => Leaf::Text(&mut self.creator.bio),
            (Section::Creator, "location") => Leaf::Text(&mut self.creator.location),
            (Section::Product, "title") => Leaf::Text(&mut self.product.title),
            (Section::Product, "description") => Leaf::Text(&mut self.product.description),
            (Section::Product, "price") => Leaf::Price(&mut self.product.price),
            (Section::Contact, "email") => Leaf::Text(&mut self.contact.email),
            (Section::Contact, "phone") => Leaf::Text(&mut self.contact.phone),
            (Section::Socials, "twitter") => Leaf::Text(&mut self.socials.twitter),
            (Section::Socials, "instagram") => Leaf::Text(&mut self.socials.instagram),
            (Section::Socials, "linkedin") => Leaf::Text(&mut self.socials.linkedin),
            (Section::Seo, "title") => Leaf::Text(&mut self.seo.title),
            (Section::Seo, "description") => Leaf::Text(&mut self.seo.description),
            _ => return None,
        };
        Some(leaf)
    }

    /// Apply a single form edit in place.
    ///
    /// Returns `false` if `path` does not name an editable leaf, in which case
    /// the profile is untouched.
    pub fn set_field(&mut self, path: &str, raw: &str, kind: FieldKind) -> bool {
        let Ok(path) = FieldPath::parse(path) else {
            return false;
        };
        let Some(leaf) = self.leaf_mut(path) else {
            return false;
        };

        match (leaf, kind) {
            (Leaf::Text(slot), FieldKind::Text) => raw.clone_into(slot),
            (Leaf::Text(slot), FieldKind::Number) => *slot = parse_numeric(raw).to_string(),
            (Leaf::Price(slot), _) => *slot = parse_price(raw),
        }
        true
    }
}

/// Apply a form edit and return the resulting profile.
///
/// Text values are stored verbatim. Numeric values are parsed with
/// [`parse_numeric`], so anything unparseable becomes `0`. Only the addressed
/// section changes; a malformed or unknown path returns `profile` unchanged.
///
/// ## Examples
///
/// ```
/// use lingofy_core::{FieldKind, StoreProfile, apply_field_edit};
///
/// let profile = apply_field_edit(StoreProfile::default(), "product.price", "19.99", FieldKind::Number);
/// assert_eq!(profile.product.price, 19.99);
///
/// let profile = apply_field_edit(profile, "product.price", "abc", FieldKind::Number);
/// assert_eq!(profile.product.price, 0.0);
/// ```
#[must_use]
pub fn apply_field_edit(
    mut profile: StoreProfile,
    path: &str,
    raw: &str,
    kind: FieldKind,
) -> StoreProfile {
    profile.set_field(path, raw, kind);
    profile
}

/// Parse a numeric form value.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"19.99 USD"` parses as `19.99`. Input with no numeric prefix, a zero
/// result, or a value that does not fit in a finite `f64` all yield `0`.
#[must_use]
pub fn parse_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let end = numeric_prefix_len(trimmed.as_bytes());
    trimmed
        .get(..end)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value != 0.0)
        .unwrap_or(0.0)
}

/// Like [`parse_numeric`], but negative prices are clamped to `0`.
fn parse_price(raw: &str) -> f64 {
    parse_numeric(raw).max(0.0)
}

/// Length of the longest prefix of `bytes` that forms a decimal number.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(i);
    let mut mantissa_digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits += frac_end - (i + 1);
        i = frac_end;
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    i
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_paths() {
        let path = FieldPath::parse("meta.siteName").unwrap();
        assert_eq!(path.section(), Section::Meta);
        assert_eq!(path.field(), "siteName");
        assert_eq!(path.kind(), FieldKind::Text);
        assert_eq!(path.to_string(), "meta.siteName");

        for section in Section::ALL {
            for field in section.fields() {
                assert!(FieldPath::parse(&format!("{section}.{field}")).is_ok());
            }
        }
    }

    #[test]
    fn test_parse_missing_separator() {
        assert_eq!(
            FieldPath::parse("siteName"),
            Err(FieldPathError::MissingSeparator("siteName".to_owned()))
        );
    }

    #[test]
    fn test_parse_unknown_section_and_field() {
        assert!(matches!(
            FieldPath::parse("billing.iban"),
            Err(FieldPathError::UnknownSection(s)) if s == "billing"
        ));
        assert!(matches!(
            FieldPath::parse("product.images"),
            Err(FieldPathError::UnknownField { section: Section::Product, .. })
        ));
        assert!(FieldPath::parse("meta.site_name").is_err());
    }

    #[test]
    fn test_text_edit_touches_only_target_leaf() {
        let before = StoreProfile::default();
        let after = apply_field_edit(before.clone(), "socials.twitter", "not a url", FieldKind::Text);

        assert_eq!(after.socials.twitter, "not a url");
        assert_eq!(after.socials.instagram, before.socials.instagram);
        assert_eq!(after.meta, before.meta);
        assert_eq!(after.creator, before.creator);
        assert_eq!(after.product, before.product);
        assert_eq!(after.contact, before.contact);
        assert_eq!(after.seo, before.seo);
    }

    #[test]
    fn test_text_edit_stores_verbatim() {
        let after = apply_field_edit(
            StoreProfile::default(),
            "contact.email",
            "  not-an-email ",
            FieldKind::Text,
        );
        assert_eq!(after.contact.email, "  not-an-email ");
    }

    #[test]
    fn test_every_text_leaf_is_editable() {
        for section in Section::ALL {
            for field in section.fields() {
                let path = format!("{section}.{field}");
                let mut profile = StoreProfile::default();
                assert!(profile.set_field(&path, "7", FieldKind::Text), "{path}");
            }
        }
    }

    #[test]
    fn test_price_edits() {
        let profile = StoreProfile::default();
        assert_eq!(profile.product.price, 49.99);

        let profile = apply_field_edit(profile, "product.price", "19.99", FieldKind::Number);
        assert_eq!(profile.product.price, 19.99);

        let profile = apply_field_edit(profile, "product.price", "abc", FieldKind::Number);
        assert_eq!(profile.product.price, 0.0);
    }

    #[test]
    fn test_non_numeric_input_yields_zero() {
        for raw in ["", "abc", ".", "-", "e5", "NaN", "Infinity", "1e400", "--1"] {
            let profile = apply_field_edit(
                StoreProfile::default(),
                "product.price",
                raw,
                FieldKind::Number,
            );
            assert_eq!(profile.product.price, 0.0, "input {raw:?}");
        }
    }

    #[test]
    fn test_negative_price_clamped() {
        let profile = apply_field_edit(
            StoreProfile::default(),
            "product.price",
            "-5",
            FieldKind::Number,
        );
        assert_eq!(profile.product.price, 0.0);
    }

    #[test]
    fn test_text_kind_on_price_still_parses() {
        let profile = apply_field_edit(
            StoreProfile::default(),
            "product.price",
            "12.5",
            FieldKind::Text,
        );
        assert_eq!(profile.product.price, 12.5);
    }

    #[test]
    fn test_number_kind_on_text_leaf_formats_number() {
        let profile = apply_field_edit(
            StoreProfile::default(),
            "creator.location",
            "42abc",
            FieldKind::Number,
        );
        assert_eq!(profile.creator.location, "42");
    }

    #[test]
    fn test_malformed_path_is_noop() {
        let before = StoreProfile::default();
        for path in ["price", "", "product.images", "nope.title", "product."] {
            let after = apply_field_edit(before.clone(), path, "1", FieldKind::Number);
            assert_eq!(after, before, "path {path:?}");
        }
    }

    #[test]
    fn test_parse_numeric_prefixes() {
        assert_eq!(parse_numeric("19.99"), 19.99);
        assert_eq!(parse_numeric("  19.99 USD"), 19.99);
        assert_eq!(parse_numeric("5."), 5.0);
        assert_eq!(parse_numeric(".5"), 0.5);
        assert_eq!(parse_numeric("+3"), 3.0);
        assert_eq!(parse_numeric("-2.5"), -2.5);
        assert_eq!(parse_numeric("1e3"), 1000.0);
        assert_eq!(parse_numeric("1e"), 1.0);
        assert_eq!(parse_numeric("1e+"), 1.0);
        assert_eq!(parse_numeric("2E-1x"), 0.2);
        assert_eq!(parse_numeric("0"), 0.0);
    }
}
