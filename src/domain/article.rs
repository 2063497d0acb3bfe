//! Knowledge-hub articles and the block parser for their section bodies.

use serde::{Deserialize, Serialize};

/// Leading glyphs that turn a line into a callout. `⚠️` precedes any shorter
/// prefix so the variation selector stays with the icon.
pub const CALLOUT_GLYPHS: [&str; 10] = [
    "✅", "⚠️", "💡", "🟢", "🔵", "🟡", "🟠", "🔴", "🚢", "⚓",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentBlock {
    Paragraph(String),
    Bullet(String),
    Callout { icon: String, text: String },
    Numbered { index: String, text: String },
}

impl ContentBlock {
    pub fn text(&self) -> &str {
        match self {
            ContentBlock::Paragraph(text) | ContentBlock::Bullet(text) => text,
            ContentBlock::Callout { text, .. } | ContentBlock::Numbered { text, .. } => text,
        }
    }
}

/// Splits free-form text into display blocks in a single pass over its lines.
///
/// Consecutive plain lines are joined with a space into one paragraph; a
/// blank line or any structured line ends the current paragraph.
pub fn parse_content_blocks(content: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut paragraph = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(rest) = bullet_text(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Bullet(rest.trim().to_string()));
        } else if let Some(icon) = CALLOUT_GLYPHS.iter().find(|icon| trimmed.starts_with(*icon)) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Callout {
                icon: icon.to_string(),
                text: trimmed[icon.len()..].trim().to_string(),
            });
        } else if let Some((index, text)) = numbered_parts(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Numbered {
                index: index.to_string(),
                text: text.trim().to_string(),
            });
        } else {
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(trimmed);
        }
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(paragraph: &mut String, blocks: &mut Vec<ContentBlock>) {
    let text = paragraph.trim();
    if !text.is_empty() {
        blocks.push(ContentBlock::Paragraph(text.to_string()));
    }
    paragraph.clear();
}

fn bullet_text(line: &str) -> Option<&str> {
    line.strip_prefix('•').or_else(|| line.strip_prefix("- "))
}

/// `"12. Text"` → `("12", "Text")`.
fn numbered_parts(line: &str) -> Option<(&str, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix(". ")?;
    Some((&line[..digits], rest))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleSection {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_caption: Option<String>,
}

impl ArticleSection {
    pub fn blocks(&self) -> Vec<ContentBlock> {
        parse_content_blocks(&self.content)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub read_time: String,
    /// Primary colour of the cover, used as the reader's accent.
    pub accent: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub sections: Vec<ArticleSection>,
}

/// Heading shown above a section: the first is the introduction.
pub fn section_label(index: usize) -> String {
    if index == 0 {
        "Introduction".to_string()
    } else {
        format!("Chapter {index}")
    }
}

pub fn find_article<'a>(articles: &'a [Article], id: &str) -> Option<&'a Article> {
    articles.iter().find(|article| article.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_then_paragraph() {
        let blocks = parse_content_blocks("• First\n• Second\n\nA paragraph line.");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Bullet("First".into()),
                ContentBlock::Bullet("Second".into()),
                ContentBlock::Paragraph("A paragraph line.".into()),
            ]
        );
    }

    #[test]
    fn plain_lines_join_into_one_paragraph() {
        let blocks = parse_content_blocks("The 11 terms\nare split in two.\n\n\nNext part.");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Paragraph("The 11 terms are split in two.".into()),
                ContentBlock::Paragraph("Next part.".into()),
            ]
        );
    }

    #[test]
    fn dash_bullets_need_a_space() {
        let blocks = parse_content_blocks("- Invoice\n-30 degrees");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Bullet("Invoice".into()),
                ContentBlock::Paragraph("-30 degrees".into()),
            ]
        );
    }

    #[test]
    fn callouts_keep_their_glyph() {
        let blocks = parse_content_blocks("Intro\n⚠️ Check the HS code\n🚢 Sea freight only");
        assert_eq!(blocks[0], ContentBlock::Paragraph("Intro".into()));
        assert_eq!(
            blocks[1],
            ContentBlock::Callout {
                icon: "⚠️".into(),
                text: "Check the HS code".into()
            }
        );
        assert_eq!(
            blocks[2],
            ContentBlock::Callout {
                icon: "🚢".into(),
                text: "Sea freight only".into()
            }
        );
    }

    #[test]
    fn numbered_items_split_at_first_dot() {
        let blocks = parse_content_blocks("1. Commercial invoice\n12. Packing list. Signed");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Numbered {
                    index: "1".into(),
                    text: "Commercial invoice".into()
                },
                ContentBlock::Numbered {
                    index: "12".into(),
                    text: "Packing list. Signed".into()
                },
            ]
        );
    }

    #[test]
    fn unmatched_lines_fall_through_to_paragraphs() {
        let blocks = parse_content_blocks("2020 was the year.\n3.5% duty applies");
        assert_eq!(
            blocks,
            vec![ContentBlock::Paragraph(
                "2020 was the year. 3.5% duty applies".into()
            )]
        );
        assert!(parse_content_blocks("").is_empty());
        assert!(parse_content_blocks("\n \n").is_empty());
    }

    #[test]
    fn section_labels() {
        assert_eq!(section_label(0), "Introduction");
        assert_eq!(section_label(3), "Chapter 3");
    }
}
