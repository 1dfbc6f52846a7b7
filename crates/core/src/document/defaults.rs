//! The built-in site document shipped with every install.

use super::model::{
    BlockKind, ContentBlock, ContentDocument, ImageRef, NavItem, Navigation, SeoSettings,
    TextStyle, TextStyles, TwitterCard,
};

const HERO_IMAGE: &str =
    "https://images.pexels.com/photos/3846511/pexels-photo-3846511.jpeg?auto=compress&cs=tinysrgb";

/// Default SEO record.
pub fn default_seo() -> SeoSettings {
    SeoSettings {
        title: "Vehicle Electronics Modules - Professional Solutions".to_string(),
        description: "Three modules for vehicle instrument clusters: CAN, analog and OPS. \
                      Installed in minutes, backed by warranty, with support from our team \
                      at every step."
            .to_string(),
        keywords: Some(
            "can module, analog module, ops emulator, instrument cluster, vehicle electronics"
                .to_string(),
        ),
        og_title: Some("Vehicle Electronics - CAN, Analog and OPS Modules".to_string()),
        og_description: Some(
            "Reliable modules for vehicle instrument clusters with warranty.".to_string(),
        ),
        og_image: Some(format!("{HERO_IMAGE}&w=1200")),
        twitter_card: Some(TwitterCard::SummaryLargeImage),
        canonical_url: Some("https://yourdomain.com/".to_string()),
    }
}

/// The canonical default document.
pub fn default_document() -> ContentDocument {
    ContentDocument {
        blocks: vec![
            ContentBlock {
                id: "hero".to_string(),
                kind: BlockKind::Hero,
                title: "VEHICLE ELECTRONICS, DONE RIGHT".to_string(),
                subtitle: "Three modules for modern and classic instrument clusters.".to_string(),
                background_image: Some(format!("{HERO_IMAGE}&w=1920")),
                text_styles: TextStyles {
                    title: style("4xl", "bold", "center", None),
                    subtitle: style("xl", "normal", "center", Some("#d1d5db")),
                    ..TextStyles::default()
                },
                order: 1,
                ..ContentBlock::default()
            },
            section("features", BlockKind::Features, "Why choose us", 2, None),
            section("modules", BlockKind::Modules, "Our modules", 3, Some("Modules")),
            module(ModuleCopy {
                id: "can-module",
                title: "CAN MODULE",
                subtitle: "CAN module: precise setup over the factory bus",
                description: "Connects to the vehicle's CAN bus without cutting factory wiring.",
                content: "Alternative modules are available for analog sensor setups.",
                image: ("can-1", "https://i.ibb.co/fd1GsKM9/Image48.png", "CAN Module"),
                color: "blue",
                accent: "#22d3ee",
                card: "Works over the factory CAN bus.",
                price: "2500",
                cta: "ORDER CAN MODULE",
                order: 4,
                nav: "CAN",
            }),
            module(ModuleCopy {
                id: "analog-module",
                title: "ANALOG MODULE",
                subtitle: "Analog module: a dependable fit for classic systems",
                description: "A simple device for clusters driven by an analog speed sensor.",
                content: "Powers from a standard socket, no permanent changes required.",
                image: (
                    "analog-1",
                    "https://i.ibb.co/RpsctJ1f/Chat-GPT-Image-10-2025-21-09-31.png",
                    "Analog Module",
                ),
                color: "yellow",
                accent: "#fbbf24",
                card: "For vehicles with analog instrument clusters.",
                price: "1800",
                cta: "ORDER ANALOG MODULE",
                order: 5,
                nav: "Analog",
            }),
            module(ModuleCopy {
                id: "ops-module",
                title: "OPS EMULATOR",
                subtitle: "OPS emulator: a fix for error B1150",
                description: "Some Toyota and Lexus models report a persistent B1150 error.",
                content: "The emulator fully replaces the original OPS unit.",
                image: (
                    "ops-1",
                    "https://i.ibb.co/PZSM6TYD/product-image-of-OPS.png",
                    "OPS Module",
                ),
                color: "red",
                accent: "#ef4444",
                card: "Resolves error B1150 on Toyota and Lexus.",
                price: "3200",
                cta: "ORDER OPS EMULATOR",
                order: 6,
                nav: "OPS",
            }),
            ContentBlock {
                videos: Some(Vec::new()),
                ..section("videos", BlockKind::Videos, "VIDEO REVIEWS", 50, Some("Videos"))
            },
            ContentBlock {
                subtitle: "We will pick the right module for your model, quickly.".to_string(),
                text_styles: TextStyles {
                    title: style("4xl", "bold", "center", None),
                    subtitle: style("xl", "normal", "center", Some("#d1d5db")),
                    ..TextStyles::default()
                },
                ..section("contacts", BlockKind::Contact, "Need advice? Get in touch", 51, Some("Contacts"))
            },
        ],
        navigation: Navigation {
            title: "Vehicle Electronics".to_string(),
            items: vec![
                nav_item("nav-modules", "Modules", "modules"),
                nav_item("nav-can", "CAN", "can-module"),
                nav_item("nav-analog", "Analog", "analog-module"),
                nav_item("nav-ops", "OPS", "ops-module"),
                nav_item("nav-videos", "Videos", "videos"),
                nav_item("nav-contacts", "Contacts", "contacts"),
            ],
        },
        seo: default_seo(),
    }
}

/// Deep structural equality with the default document.
///
/// Compares typed values, so key order or whitespace in stored JSON never
/// affects the result.
pub fn is_default(document: &ContentDocument) -> bool {
    *document == default_document()
}

fn style(size: &str, weight: &str, align: &str, color: Option<&str>) -> TextStyle {
    let base = TextStyle::default();
    TextStyle {
        color: color.map_or(base.color, str::to_string),
        font_size: size.to_string(),
        font_weight: weight.to_string(),
        text_align: align.to_string(),
        ..TextStyle::default()
    }
}

fn section(id: &str, kind: BlockKind, title: &str, order: i64, nav: Option<&str>) -> ContentBlock {
    let size = if kind == BlockKind::Videos { "4xl" } else { "3xl" };
    ContentBlock {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        text_styles: TextStyles {
            title: style(size, "bold", "center", None),
            ..TextStyles::default()
        },
        order,
        nav_title: nav.map(str::to_string),
        show_in_nav: nav.is_some(),
        ..ContentBlock::default()
    }
}

struct ModuleCopy {
    id: &'static str,
    title: &'static str,
    subtitle: &'static str,
    description: &'static str,
    content: &'static str,
    image: (&'static str, &'static str, &'static str),
    color: &'static str,
    accent: &'static str,
    card: &'static str,
    price: &'static str,
    cta: &'static str,
    order: i64,
    nav: &'static str,
}

fn module(copy: ModuleCopy) -> ContentBlock {
    let (image_id, url, alt) = copy.image;
    ContentBlock {
        id: copy.id.to_string(),
        kind: BlockKind::Detailed,
        title: copy.title.to_string(),
        subtitle: copy.subtitle.to_string(),
        description: copy.description.to_string(),
        content: copy.content.to_string(),
        images: vec![ImageRef {
            id: image_id.to_string(),
            url: url.to_string(),
            alt: alt.to_string(),
        }],
        color: Some(copy.color.to_string()),
        text_styles: TextStyles {
            title: style("4xl", "bold", "left", None),
            subtitle: style("2xl", "bold", "left", Some(copy.accent)),
            description: style("base", "normal", "left", Some("#d1d5db")),
            ..TextStyles::default()
        },
        card_description: Some(copy.card.to_string()),
        price: Some(copy.price.to_string()),
        cta_text: Some(copy.cta.to_string()),
        order: copy.order,
        nav_title: Some(copy.nav.to_string()),
        show_in_nav: true,
        ..ContentBlock::default()
    }
}

fn nav_item(id: &str, title: &str, block_id: &str) -> NavItem {
    NavItem {
        id: id.to_string(),
        title: title.to_string(),
        block_id: block_id.to_string(),
        is_visible: true,
    }
}
