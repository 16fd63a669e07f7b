//! Heading-delimited section index over markdown text.
//!
//! Only ATX-style headings participate; everything else is opaque text. A
//! section spans from its heading line to the next heading at the same or
//! shallower level.

use std::collections::HashMap;

use crate::error::{Result, SkoError};

/// A heading-delimited region of a text buffer. Line indices; `end` is
/// exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownSection {
    pub anchor: String,
    pub level: usize,
    pub start: usize,
    pub end: usize,
}

/// Index every addressable section of `lines`, keyed by anchor.
///
/// When duplicate headings slug to the same anchor, the first occurrence
/// wins; later duplicates stay in the text but cannot be addressed.
#[must_use]
pub fn index_sections(lines: &[&str]) -> HashMap<String, MarkdownSection> {
    struct Heading {
        index: usize,
        level: usize,
        anchor: String,
    }

    let mut headings = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let Some((level, text)) = parse_heading(line) else {
            continue;
        };
        let anchor = anchor_from_heading(text);
        if anchor.is_empty() {
            continue;
        }
        headings.push(Heading {
            index,
            level,
            anchor,
        });
    }

    let mut sections = HashMap::new();
    for (pos, heading) in headings.iter().enumerate() {
        let end = headings[pos + 1..]
            .iter()
            .find(|next| next.level <= heading.level)
            .map_or(lines.len(), |next| next.index);

        sections
            .entry(heading.anchor.clone())
            .or_insert(MarkdownSection {
                anchor: heading.anchor.clone(),
                level: heading.level,
                start: heading.index,
                end,
            });
    }

    sections
}

/// The lines strictly between a section's heading and its end boundary.
pub fn extract_section_body(content: &str, anchor: &str) -> Result<String> {
    let lines: Vec<&str> = content.split('\n').collect();
    let sections = index_sections(&lines);
    let section = sections
        .get(anchor)
        .ok_or_else(|| SkoError::SectionNotFound(anchor.to_string()))?;

    if section.start + 1 >= section.end {
        return Ok(String::new());
    }
    Ok(lines[section.start + 1..section.end].join("\n"))
}

/// Parse an ATX heading: optional leading whitespace, 1-6 `#`, then a
/// non-empty trimmed remainder.
#[must_use]
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start_matches([' ', '\t']);
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let text = trimmed[level..].trim();
    if text.is_empty() {
        return None;
    }
    Some((level, text))
}

/// Deterministic slug for a heading: lowercase, runs outside `[a-z0-9]`
/// collapsed to a single hyphen, leading/trailing hyphens trimmed.
#[must_use]
pub fn anchor_from_heading(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lower.len());
    let mut last_dash = false;
    for ch in lower.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}
