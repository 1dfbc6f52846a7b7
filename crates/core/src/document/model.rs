use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::defaults::{default_document, default_seo};

/// The whole site: ordered blocks, navigation and SEO settings.
///
/// Missing top-level fields fall back to the built-in default document, and
/// missing SEO fields fall back to the default SEO record field by field, so a
/// partial or older document always deserializes into something renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDocument {
    pub blocks: Vec<ContentBlock>,
    pub navigation: Navigation,
    pub seo: SeoSettings,
}

impl Default for ContentDocument {
    fn default() -> Self {
        default_document()
    }
}

impl ContentDocument {
    /// Parse a JSON value, applying field-level defaults.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Blocks in render order. Ties keep their stored order.
    pub fn sorted_blocks(&self) -> Vec<&ContentBlock> {
        let mut blocks: Vec<&ContentBlock> = self.blocks.iter().collect();
        blocks.sort_by_key(|block| block.order);
        blocks
    }

    pub fn block(&self, id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }
}

/// One section of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub content: String,
    pub images: Vec<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub text_styles: TextStyles,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    pub is_visible: bool,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_title: Option<String>,
    pub show_in_nav: bool,
    /// Editor fields this build does not model. Kept so round trips are lossless.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ContentBlock {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: BlockKind::default(),
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            content: String::new(),
            images: Vec::new(),
            videos: None,
            background_image: None,
            color: None,
            text_styles: TextStyles::default(),
            card_description: None,
            price: None,
            cta_text: None,
            is_visible: true,
            order: 0,
            nav_title: None,
            show_in_nav: false,
            extra: Map::new(),
        }
    }
}

/// Section kinds the site knows how to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Hero,
    Features,
    Modules,
    Detailed,
    Videos,
    Contact,
    #[default]
    Text,
    Gallery,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub id: String,
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRef {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Per-field rich text styles of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyles {
    pub title: TextStyle,
    pub subtitle: TextStyle,
    pub description: TextStyle,
    pub content: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub color: String,
    pub font_size: String,
    pub font_family: String,
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
    pub text_align: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            font_size: "base".to_string(),
            font_family: "default".to_string(),
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            text_decoration: "none".to_string(),
            text_align: "left".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    pub title: String,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavItem {
    pub id: String,
    pub title: String,
    pub block_id: String,
    pub is_visible: bool,
}

impl Default for NavItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            block_id: String::new(),
            is_visible: true,
        }
    }
}

/// Page-level SEO metadata.
///
/// Optional fields serialize as `null` rather than being omitted: an omitted
/// field would be refilled from the default record on the next load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoSettings {
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_card: Option<TwitterCard>,
    pub canonical_url: Option<String>,
}

impl Default for SeoSettings {
    fn default() -> Self {
        default_seo()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwitterCard {
    Summary,
    SummaryLargeImage,
    App,
    Player,
}
