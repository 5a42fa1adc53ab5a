/*!
 * Document rendering.
 *
 * The renderer is a sink: wrapping and page breaks are already decided, it
 * only maps alignments to columns and writes the pages out.
 */

use log::debug;
use std::fmt::Write;

use crate::errors::RenderError;
use crate::layout::{Alignment, BodyPage, LaidOutElement, ScreenplayElement, wrap_text};

use super::page::{CharacterPage, Page, PageKind, Portrait, TitlePage};

/// Turns an assembled page sequence into document bytes
pub trait DocumentRenderer: Send + Sync {
    /// Render every page, in order
    fn render(&self, pages: &[Page]) -> Result<Vec<u8>, RenderError>;

    /// File extension of the rendered document
    fn extension(&self) -> &'static str;
}

/// A failed render, with the pages that were handed to the renderer
#[derive(Debug)]
pub struct RenderFailure {
    pub error: RenderError,
    pub pages: Vec<Page>,
}

impl RenderFailure {
    /// One-line description of the pages that could not be rendered
    pub fn summary(&self) -> String {
        let count = |kind| self.pages.iter().filter(|p| p.kind() == kind).count();
        format!(
            "{} ({} title, {} character, {} body pages)",
            self.error,
            count(PageKind::Title),
            count(PageKind::CharacterRef),
            count(PageKind::Body)
        )
    }
}

/// Render `pages`, keeping them when rendering fails
pub fn render_pages(renderer: &dyn DocumentRenderer, pages: Vec<Page>) -> Result<(Vec<Page>, Vec<u8>), RenderFailure> {
    match renderer.render(&pages) {
        Ok(bytes) => Ok((pages, bytes)),
        Err(error) => Err(RenderFailure { error, pages }),
    }
}

/// Monospaced plain-text screenplay
#[derive(Debug, Clone)]
pub struct TextRenderer {
    /// Width of the text column
    pub page_width: usize,
    /// Left offset of dialogue
    pub dialogue_indent: usize,
    /// Left offset of parentheticals
    pub parenthetical_indent: usize,
    /// Lines on the title page, used to push the title towards the middle
    pub title_page_lines: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            page_width: 60,
            dialogue_indent: 10,
            parenthetical_indent: 15,
            title_page_lines: 55,
        }
    }
}

/// Form feed separating pages
const PAGE_SEPARATOR: &str = "\x0c\n";

impl TextRenderer {
    fn centered(&self, text: &str) -> String {
        let len = text.chars().count();
        let pad = self.page_width.saturating_sub(len) / 2;
        format!("{}{}", " ".repeat(pad), text)
    }

    fn right_aligned(&self, text: &str) -> String {
        format!("{:>width$}", text, width = self.page_width)
    }

    fn place(&self, alignment: Alignment, text: &str) -> String {
        match alignment {
            Alignment::Left => text.to_string(),
            Alignment::Indented => format!("{}{}", " ".repeat(self.dialogue_indent), text),
            Alignment::FurtherIndented => format!("{}{}", " ".repeat(self.parenthetical_indent), text),
            Alignment::Centered => self.centered(text),
            Alignment::Right => self.right_aligned(text),
        }
    }

    fn render_title(&self, out: &mut String, page: &TitlePage) -> Result<(), RenderError> {
        let block_top = self.title_page_lines / 3;
        for _ in 0..block_top {
            writeln!(out)?;
        }
        writeln!(out, "{}", self.centered(&page.title.to_uppercase()))?;
        writeln!(out)?;
        writeln!(out, "{}", self.centered("Written by"))?;
        writeln!(out)?;
        writeln!(out, "{}", self.centered(&page.author))?;
        writeln!(out)?;
        writeln!(out)?;
        for line in wrap_text(&page.logline, self.page_width.saturating_sub(10).max(1)) {
            writeln!(out, "{}", self.centered(&line))?;
        }
        writeln!(out)?;
        writeln!(out, "{}", self.centered(&format!("{} / {}", page.genre, page.tone)))?;
        Ok(())
    }

    fn render_character(&self, out: &mut String, page: &CharacterPage) -> Result<(), RenderError> {
        let character = &page.character;
        writeln!(out, "{}", self.centered("CHARACTER REFERENCE"))?;
        writeln!(out)?;
        writeln!(out, "{}", character.name.to_uppercase())?;
        writeln!(out)?;

        match &page.portrait {
            Portrait::Image { file_name, .. } => writeln!(out, "[Portrait: {}]", file_name)?,
            Portrait::Unavailable { reason } => {
                writeln!(out, "[PORTRAIT UNAVAILABLE]")?;
                for line in wrap_text(reason, self.page_width) {
                    writeln!(out, "{}", line)?;
                }
            }
        }
        writeln!(out)?;

        if let Some(age) = &character.age {
            writeln!(out, "Age: {}", age)?;
        }
        writeln!(out, "Role: {}", character.role)?;

        let sections = [
            ("Description", character.description.as_str()),
            ("Arc", character.arc.as_str()),
            ("Appearance", character.visual_description.as_str()),
        ];
        for (label, text) in sections.into_iter().filter(|(_, text)| !text.is_empty()) {
            writeln!(out)?;
            writeln!(out, "{}:", label)?;
            for line in wrap_text(text, self.page_width) {
                writeln!(out, "{}", line)?;
            }
        }
        Ok(())
    }

    fn render_block(&self, out: &mut String, block: &LaidOutElement) -> Result<(), RenderError> {
        if block.blank_before {
            writeln!(out)?;
        }
        let alignment = block.element.alignment();
        for (i, line) in block.lines.iter().enumerate() {
            match &block.element {
                // Scene number repeated in the right margin
                ScreenplayElement::SceneHeading { scene_number, .. } if i == 0 => {
                    writeln!(out, "{:<width$}  {}", line, scene_number, width = self.page_width)?
                }
                _ => writeln!(out, "{}", self.place(alignment, line).trim_end())?,
            }
        }
        Ok(())
    }

    fn render_body(&self, out: &mut String, page: &BodyPage) -> Result<(), RenderError> {
        if page.number > 1 {
            writeln!(out, "{}", self.right_aligned(&format!("{}.", page.number)))?;
            writeln!(out)?;
        }
        for block in &page.blocks {
            self.render_block(out, block)?;
        }
        Ok(())
    }
}

impl DocumentRenderer for TextRenderer {
    fn render(&self, pages: &[Page]) -> Result<Vec<u8>, RenderError> {
        match pages.first() {
            Some(Page::Title(_)) => {}
            _ => {
                return Err(RenderError::InvalidPage {
                    page: 0,
                    reason: "document must open with a title page".to_string(),
                });
            }
        }

        let mut out = String::new();
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                out.push_str(PAGE_SEPARATOR);
            }
            match page {
                Page::Title(title) => self.render_title(&mut out, title)?,
                Page::CharacterRef(character) => self.render_character(&mut out, character)?,
                Page::Body(body) if body.blocks.is_empty() => {
                    return Err(RenderError::InvalidPage {
                        page: i,
                        reason: format!("body page {} is empty", body.number),
                    });
                }
                Page::Body(body) => self.render_body(&mut out, body)?,
            }
        }

        debug!("Rendered {} pages into {} bytes", pages.len(), out.len());
        Ok(out.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
