//! Prompt construction for AI product photos.

use super::profile::StoreProfile;

/// Build the image generation prompt for the profile's product.
///
/// The prompt is deterministic: the same title, description and extra text
/// always produce the same string. `extra` is trimmed and only appended when
/// non-empty.
#[must_use]
pub fn image_prompt(profile: &StoreProfile, extra: Option<&str>) -> String {
    let mut prompt = format!(
        "Generate a high-quality, professional product photograph for e-commerce. \
         The product is: \"{}\". Description: \"{}\". \
         The image should be on a clean, minimalist background, suitable for a product listing.",
        profile.product.title, profile.product.description,
    );

    if let Some(extra) = extra.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str(" Additional instructions from the creator: \"");
        prompt.push_str(extra);
        prompt.push_str("\".");
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "Generate a high-quality, professional product photograph for e-commerce. \
        The product is: \"Handcrafted Wonder\". \
        Description: \"A unique piece, crafted with love and care. Perfect for any occasion.\". \
        The image should be on a clean, minimalist background, suitable for a product listing.";

    #[test]
    fn test_prompt_from_defaults() {
        assert_eq!(image_prompt(&StoreProfile::default(), None), BASE);
    }

    #[test]
    fn test_blank_extra_is_ignored() {
        let profile = StoreProfile::default();
        assert_eq!(image_prompt(&profile, Some("   ")), BASE);
        assert_eq!(image_prompt(&profile, Some("")), BASE);
    }

    #[test]
    fn test_extra_is_trimmed_and_appended() {
        let prompt = image_prompt(&StoreProfile::default(), Some("  on a wooden table "));
        assert_eq!(
            prompt,
            format!("{BASE} Additional instructions from the creator: \"on a wooden table\".")
        );
    }

    #[test]
    fn test_prompt_uses_current_title() {
        let mut profile = StoreProfile::default();
        profile.product.title = "Ceramic Mug".to_owned();
        assert!(image_prompt(&profile, None).contains("The product is: \"Ceramic Mug\"."));
    }
}
