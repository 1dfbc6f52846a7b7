//! Page head metadata derived from [`SeoSettings`].
//!
//! Open Graph and Twitter fields fall back to the plain title and description
//! when their own values are blank.

use serde::Serialize;
use serde_json::{json, Value};

use super::defaults::default_seo;
use super::model::{SeoSettings, TwitterCard};

pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;

/// Which attribute names a `<meta>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaAttribute {
    Name,
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub attribute: MetaAttribute,
    pub key: String,
    pub content: String,
}

impl MetaTag {
    fn name(key: &str, content: impl Into<String>) -> Self {
        Self {
            attribute: MetaAttribute::Name,
            key: key.to_string(),
            content: content.into(),
        }
    }

    fn property(key: &str, content: impl Into<String>) -> Self {
        Self {
            attribute: MetaAttribute::Property,
            key: key.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadTags {
    pub title: String,
    pub meta: Vec<MetaTag>,
    pub canonical_url: Option<String>,
}

impl TwitterCard {
    pub fn as_str(&self) -> &'static str {
        match self {
            TwitterCard::Summary => "summary",
            TwitterCard::SummaryLargeImage => "summary_large_image",
            TwitterCard::App => "app",
            TwitterCard::Player => "player",
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build the `<title>`, `<meta>` and canonical link for a page head.
pub fn meta_tags(seo: &SeoSettings) -> HeadTags {
    let fallback = default_seo();
    let title = non_blank(Some(seo.title.as_str())).unwrap_or(fallback.title.as_str());
    let description =
        non_blank(Some(seo.description.as_str())).unwrap_or(fallback.description.as_str());
    let social_title = non_blank(seo.og_title.as_deref()).unwrap_or(title);
    let social_description = non_blank(seo.og_description.as_deref()).unwrap_or(description);
    let image = non_blank(seo.og_image.as_deref());

    let mut meta = vec![MetaTag::name("description", description)];
    if let Some(keywords) = non_blank(seo.keywords.as_deref()) {
        meta.push(MetaTag::name("keywords", keywords));
    }

    meta.push(MetaTag::property("og:title", social_title));
    meta.push(MetaTag::property("og:description", social_description));
    meta.push(MetaTag::property("og:type", "website"));
    if let Some(image) = image {
        meta.push(MetaTag::property("og:image", image));
        meta.push(MetaTag::property("og:image:width", OG_IMAGE_WIDTH.to_string()));
        meta.push(MetaTag::property("og:image:height", OG_IMAGE_HEIGHT.to_string()));
    }

    let card = seo.twitter_card.unwrap_or(TwitterCard::SummaryLargeImage);
    meta.push(MetaTag::name("twitter:card", card.as_str()));
    meta.push(MetaTag::name("twitter:title", social_title));
    meta.push(MetaTag::name("twitter:description", social_description));
    if let Some(image) = image {
        meta.push(MetaTag::name("twitter:image", image));
    }

    HeadTags {
        title: title.to_string(),
        meta,
        canonical_url: non_blank(seo.canonical_url.as_deref()).map(str::to_string),
    }
}

/// schema.org JSON-LD for the business behind the site.
pub fn structured_data(seo: &SeoSettings) -> Value {
    let head = meta_tags(seo);
    let description = head
        .meta
        .iter()
        .find(|tag| tag.key == "description")
        .map(|tag| tag.content.clone())
        .unwrap_or_default();

    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "name": head.title,
        "description": description,
    });
    if let Some(url) = head.canonical_url {
        data["url"] = Value::String(url);
    }
    if let Some(image) = non_blank(seo.og_image.as_deref()) {
        data["image"] = Value::String(image.to_string());
    }
    data
}
