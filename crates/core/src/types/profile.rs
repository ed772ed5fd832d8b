//! The editable store profile.
//!
//! A [`StoreProfile`] is the nested record a creator edits in the content
//! studio. Every leaf has a default, so a freshly created profile is complete
//! and can be saved as-is. Field names serialize in camelCase, matching the
//! JSON the server accepts on `/api/v1/save`.

use serde::{Deserialize, Deserializer, Serialize};

use super::image::ImageReference;

/// The full editable record for a creator's storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoreProfile {
    /// Site-wide metadata.
    #[serde(default)]
    pub meta: MetaSection,
    /// About the creator.
    #[serde(default)]
    pub creator: CreatorSection,
    /// The main product listing.
    #[serde(default)]
    pub product: ProductSection,
    /// Contact details.
    #[serde(default)]
    pub contact: ContactSection,
    /// Social profile links.
    #[serde(default)]
    pub socials: SocialsSection,
    /// Search engine metadata.
    #[serde(default)]
    pub seo: SeoSection,
}

impl StoreProfile {
    /// Returns a copy of this profile whose product gallery is `images`.
    ///
    /// This is the shape sent to the persistence endpoint: the editing session
    /// keeps its gallery separately and merges it in only when saving.
    #[must_use]
    pub fn with_images(&self, images: Vec<ImageReference>) -> Self {
        let mut profile = self.clone();
        profile.product.images = images;
        profile
    }
}

/// Site-wide metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaSection {
    pub site_name: String,
    pub site_slug: String,
    /// BCP 47 language tag, e.g. `en-US`.
    pub base_language: String,
    /// ISO 4217 currency code, e.g. `USD`.
    pub base_currency: String,
}

impl Default for MetaSection {
    fn default() -> Self {
        Self {
            site_name: "My Creative Store".to_owned(),
            site_slug: "my-creative-store".to_owned(),
            base_language: "en-US".to_owned(),
            base_currency: "USD".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorSection {
    pub bio: String,
    pub location: String,
}

impl Default for CreatorSection {
    fn default() -> Self {
        Self {
            bio: "I am a passionate creator sharing my work with the world.".to_owned(),
            location: "Global".to_owned(),
        }
    }
}

/// The product listing.
///
/// `price` is always finite and non-negative. Edits go through
/// [`apply_field_edit`](super::field::apply_field_edit) and deserialized
/// profiles are clamped the same way on load. Anything else becomes `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSection {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    /// Gallery in display order. The first image is the primary one.
    pub images: Vec<ImageReference>,
}

impl Default for ProductSection {
    fn default() -> Self {
        Self {
            title: "Handcrafted Wonder".to_owned(),
            description: "A unique piece, crafted with love and care. Perfect for any occasion."
                .to_owned(),
            price: 49.99,
            images: Vec::new(),
        }
    }
}

/// Accept any JSON number, keeping only finite non-negative prices.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = f64::deserialize(deserializer)?;
    Ok(if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSection {
    pub email: String,
    pub phone: String,
}

impl Default for ContactSection {
    fn default() -> Self {
        Self {
            email: "hello@creator.com".to_owned(),
            phone: "+1 (555) 123-4567".to_owned(),
        }
    }
}

/// Social profile URLs. Stored unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialsSection {
    pub twitter: String,
    pub instagram: String,
    pub linkedin: String,
}

impl Default for SocialsSection {
    fn default() -> Self {
        Self {
            twitter: "https://twitter.com/creator".to_owned(),
            instagram: "https://instagram.com/creator".to_owned(),
            linkedin: "https://linkedin.com/in/creator".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoSection {
    pub title: String,
    pub description: String,
}

impl Default for SeoSection {
    fn default() -> Self {
        Self {
            title: "My Creative Store | Handcrafted Goods".to_owned(),
            description: "Discover unique handcrafted goods from a passionate creator.".to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_values() {
        let profile = StoreProfile::default();
        assert_eq!(profile.meta.site_slug, "my-creative-store");
        assert_eq!(profile.meta.base_currency, "USD");
        assert_eq!(profile.creator.location, "Global");
        assert!((profile.product.price - 49.99).abs() < f64::EPSILON);
        assert!(profile.product.images.is_empty());
        assert_eq!(profile.contact.email, "hello@creator.com");
        assert_eq!(profile.socials.linkedin, "https://linkedin.com/in/creator");
        assert_eq!(profile.seo.title, "My Creative Store | Handcrafted Goods");
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let json = serde_json::to_value(StoreProfile::default()).unwrap();
        assert_eq!(json["meta"]["siteName"], "My Creative Store");
        assert_eq!(json["meta"]["baseLanguage"], "en-US");
        assert_eq!(json["product"]["price"], 49.99);
        assert_eq!(json["product"]["images"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_leaves_fall_back_to_defaults() {
        let json = r#"{ "meta": { "siteName": "Pottery Barn" }, "product": { "price": 12 } }"#;
        let profile: StoreProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.meta.site_name, "Pottery Barn");
        assert_eq!(profile.meta.site_slug, "my-creative-store");
        assert_eq!(profile.product.title, "Handcrafted Wonder");
        assert!((profile.product.price - 12.0).abs() < f64::EPSILON);
        assert_eq!(profile.seo, SeoSection::default());
    }

    #[test]
    fn test_negative_price_is_clamped_on_load() {
        let json = r#"{ "product": { "title": "Mug", "price": -5 } }"#;
        let profile: StoreProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.product.title, "Mug");
        assert!(profile.product.price.abs() < f64::EPSILON);
        assert!(profile.product.price.is_sign_positive());
    }

    #[test]
    fn test_with_images_replaces_gallery_only() {
        let profile = StoreProfile::default();
        let image = ImageReference::from_bytes("image/png", b"png-bytes");
        let merged = profile.with_images(vec![image.clone()]);

        assert_eq!(merged.product.images, vec![image]);
        assert_eq!(merged.meta, profile.meta);
        assert!(profile.product.images.is_empty());
    }
}
