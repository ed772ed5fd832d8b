//! `lingofy profile` - inspect profiles and the editable field schema.

use std::io::Write;
use std::path::Path;

use lingofy_core::{FieldKind, FieldPath, Section};

use super::{CliError, load_profile};

/// Print a profile as pretty JSON. Without a path, the built-in default.
///
/// # Errors
///
/// Returns an error if the profile cannot be loaded or written out.
pub async fn show(path: Option<&Path>, out: &mut impl Write) -> Result<(), CliError> {
    let profile = load_profile(path).await?;
    let json = serde_json::to_string_pretty(&profile)?;
    writeln!(out, "{json}").map_err(CliError::Output)
}

/// List every editable `section.field` path with its input kind.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn fields(out: &mut impl Write) -> Result<(), CliError> {
    for section in Section::ALL {
        for field in section.fields() {
            let path = FieldPath::parse(&format!("{section}.{field}"))?;
            let kind = match path.kind() {
                FieldKind::Text => "text",
                FieldKind::Number => "number",
            };
            writeln!(out, "{path}\t{kind}").map_err(CliError::Output)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lingofy_core::StoreProfile;

    use super::*;

    #[test]
    fn test_fields_lists_schema() {
        let mut out = Vec::new();
        fields(&mut out).unwrap();
        let listing = String::from_utf8(out).unwrap();

        assert!(listing.lines().any(|line| line == "product.price\tnumber"));
        assert!(listing.lines().any(|line| line == "meta.siteName\ttext"));
        assert!(!listing.contains("product.images"));

        let expected: usize = Section::ALL.iter().map(|s| s.fields().len()).sum();
        assert_eq!(listing.lines().count(), expected);
    }

    #[tokio::test]
    async fn test_show_default_profile() {
        let mut out = Vec::new();
        show(None, &mut out).await.unwrap();

        let shown: StoreProfile = serde_json::from_slice(&out).unwrap();
        assert_eq!(shown, StoreProfile::default());
    }
}
