//! Diagnostic checks for content documents.
//!
//! Nothing here rejects a document; callers log the findings.
use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

use super::model::{ContentDocument, SeoSettings};

/// Recommended SEO title length, in characters.
pub const SEO_TITLE_RANGE: RangeInclusive<usize> = 50..=60;
/// Recommended SEO description length, in characters.
pub const SEO_DESCRIPTION_RANGE: RangeInclusive<usize> = 150..=160;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyBlockId { index: usize },
    DuplicateBlockId(String),
    DanglingNavItem { item_id: String, block_id: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyBlockId { index } => write!(f, "block #{index} has an empty id"),
            ValidationIssue::DuplicateBlockId(id) => write!(f, "block id `{id}` is used more than once"),
            ValidationIssue::DanglingNavItem { item_id, block_id } => {
                write!(f, "navigation item `{item_id}` points at missing block `{block_id}`")
            }
        }
    }
}

/// Check block id uniqueness and navigation targets.
pub fn validate_document(document: &ContentDocument) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (index, block) in document.blocks.iter().enumerate() {
        if block.id.is_empty() {
            issues.push(ValidationIssue::EmptyBlockId { index });
        } else if !seen.insert(block.id.as_str()) {
            issues.push(ValidationIssue::DuplicateBlockId(block.id.clone()));
        }
    }

    for item in &document.navigation.items {
        if !seen.contains(item.block_id.as_str()) {
            issues.push(ValidationIssue::DanglingNavItem {
                item_id: item.id.clone(),
                block_id: item.block_id.clone(),
            });
        }
    }

    issues
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeoWarning {
    EmptyTitle,
    EmptyDescription,
    TitleLength(usize),
    DescriptionLength(usize),
}

impl fmt::Display for SeoWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeoWarning::EmptyTitle => write!(f, "SEO title is empty"),
            SeoWarning::EmptyDescription => write!(f, "SEO description is empty"),
            SeoWarning::TitleLength(len) => write!(
                f,
                "SEO title is {len} characters, recommended {}-{}",
                SEO_TITLE_RANGE.start(),
                SEO_TITLE_RANGE.end()
            ),
            SeoWarning::DescriptionLength(len) => write!(
                f,
                "SEO description is {len} characters, recommended {}-{}",
                SEO_DESCRIPTION_RANGE.start(),
                SEO_DESCRIPTION_RANGE.end()
            ),
        }
    }
}

/// Recommended-length checks for the SEO record. Lengths count characters, not bytes.
pub fn seo_warnings(seo: &SeoSettings) -> Vec<SeoWarning> {
    let mut warnings = Vec::new();

    let title_len = seo.title.trim().chars().count();
    if title_len == 0 {
        warnings.push(SeoWarning::EmptyTitle);
    } else if !SEO_TITLE_RANGE.contains(&title_len) {
        warnings.push(SeoWarning::TitleLength(title_len));
    }

    let description_len = seo.description.trim().chars().count();
    if description_len == 0 {
        warnings.push(SeoWarning::EmptyDescription);
    } else if !SEO_DESCRIPTION_RANGE.contains(&description_len) {
        warnings.push(SeoWarning::DescriptionLength(description_len));
    }

    warnings
}
