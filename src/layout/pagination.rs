/*!
 * Body page layout.
 *
 * Elements are wrapped to their column width and grouped into units that may
 * not be split across pages:
 *
 * - a character cue together with the parentheticals and dialogue that follow
 *   it (the dialogue block);
 * - every other element on its own (action paragraphs are never split).
 *
 * One blank line precedes headings, actions, cues, transitions and episode
 * markers, except at the top of a page. On top of unit atomicity:
 *
 * - a scene heading is only placed when it fits together with the following
 *   units of its scene that make up `heading_keep_lines` content lines (or the
 *   whole scene when it is shorter); otherwise the page breaks before it;
 * - an episode marker starts a new page once the page holds scene content;
 * - a unit taller than a page is placed alone on a fresh page and overflows.
 *
 * Pagination never drops, alters or reorders elements; it only inserts
 * `PageBreak`s.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use super::element::ScreenplayElement;

/// Page capacity and column widths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Lines available on a body page
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,

    /// Content lines that must follow a heading on its page
    #[serde(default = "default_heading_keep_lines")]
    pub heading_keep_lines: usize,

    /// Width of action, headings, transitions and cues
    #[serde(default = "default_action_width")]
    pub action_width: usize,

    /// Width of dialogue
    #[serde(default = "default_dialogue_width")]
    pub dialogue_width: usize,

    /// Width of parentheticals
    #[serde(default = "default_parenthetical_width")]
    pub parenthetical_width: usize,
}

fn default_lines_per_page() -> usize {
    55
}

fn default_heading_keep_lines() -> usize {
    2
}

fn default_action_width() -> usize {
    60
}

fn default_dialogue_width() -> usize {
    35
}

fn default_parenthetical_width() -> usize {
    25
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lines_per_page: default_lines_per_page(),
            heading_keep_lines: default_heading_keep_lines(),
            action_width: default_action_width(),
            dialogue_width: default_dialogue_width(),
            parenthetical_width: default_parenthetical_width(),
        }
    }
}

impl LayoutConfig {
    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.lines_per_page == 0 {
            return Err("layout lines_per_page must be at least 1".to_string());
        }
        if self.action_width == 0 || self.dialogue_width == 0 || self.parenthetical_width == 0 {
            return Err("layout column widths must be at least 1".to_string());
        }
        if self.dialogue_width > self.action_width || self.parenthetical_width > self.action_width {
            return Err("dialogue and parenthetical widths cannot exceed the action width".to_string());
        }
        Ok(())
    }

    /// Column width used to wrap an element
    pub fn width_for(&self, element: &ScreenplayElement) -> usize {
        match element {
            ScreenplayElement::Dialogue { .. } => self.dialogue_width,
            ScreenplayElement::Parenthetical { .. } => self.parenthetical_width,
            _ => self.action_width,
        }
    }
}

/// Greedy word wrap. Words longer than `width` are split; explicit newlines
/// start a new line and empty lines are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..width).collect());
            }
            if word.is_empty() {
                continue;
            }
            let line_len = line.chars().count();
            if line_len > 0 && line_len + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// An element placed on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaidOutElement {
    pub element: ScreenplayElement,
    /// Whether a blank line is printed before it
    pub blank_before: bool,
    /// Wrapped text lines
    pub lines: Vec<String>,
}

impl LaidOutElement {
    /// Lines taken on the page, blank line included
    pub fn height(&self) -> usize {
        self.lines.len() + usize::from(self.blank_before)
    }
}

/// One laid-out body page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPage {
    /// 1-based body page number
    pub number: usize,
    pub blocks: Vec<LaidOutElement>,
}

impl BodyPage {
    /// Lines used on the page
    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(LaidOutElement::height).sum()
    }

    /// Elements on the page, in order
    pub fn elements(&self) -> impl Iterator<Item = &ScreenplayElement> {
        self.blocks.iter().map(|b| &b.element)
    }
}

/// Result of pagination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Input elements with `PageBreak`s between pages
    pub elements: Vec<ScreenplayElement>,
    pub pages: Vec<BodyPage>,
}

#[derive(Debug)]
struct Unit {
    items: Vec<(ScreenplayElement, Vec<String>)>,
}

impl Unit {
    fn first(&self) -> &ScreenplayElement {
        &self.items[0].0
    }

    fn content_lines(&self) -> usize {
        self.items.iter().map(|(_, lines)| lines.len()).sum()
    }

    fn height(&self, at_top: bool) -> usize {
        self.items
            .iter()
            .enumerate()
            .map(|(i, (element, lines))| {
                let blank = element.spaced_before() && !(i == 0 && at_top);
                lines.len() + usize::from(blank)
            })
            .sum()
    }

    fn keeps_with_heading(&self) -> bool {
        matches!(
            self.first(),
            ScreenplayElement::Action { .. } | ScreenplayElement::CharacterCue { .. }
        )
    }
}

fn build_units(elements: &[ScreenplayElement], config: &LayoutConfig) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    let mut in_dialogue_block = false;

    for element in elements {
        let lines = if element.is_page_break() {
            Vec::new()
        } else {
            wrap_text(&element.text(), config.width_for(element))
        };

        if in_dialogue_block && element.continues_dialogue() {
            if let Some(unit) = units.last_mut() {
                unit.items.push((element.clone(), lines));
                continue;
            }
        }
        in_dialogue_block = matches!(element, ScreenplayElement::CharacterCue { .. });
        units.push(Unit {
            items: vec![(element.clone(), lines)],
        });
    }
    units
}

struct Paginator<'a> {
    config: &'a LayoutConfig,
    pages: Vec<BodyPage>,
    current: Vec<LaidOutElement>,
    used: usize,
    output: Vec<ScreenplayElement>,
}

impl<'a> Paginator<'a> {
    fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: Vec::new(),
            used: 0,
            output: Vec::new(),
        }
    }

    fn at_top(&self) -> bool {
        self.current.is_empty()
    }

    fn fits(&self, height: usize) -> bool {
        self.used + height <= self.config.lines_per_page
    }

    /// An episode opens a page unless the page holds nothing but `FADE IN:`
    fn must_break_before_episode(&self) -> bool {
        !self.current.iter().all(|block| block.element.is_fade_in())
    }

    /// Close the current page, if it has anything on it
    fn close_page(&mut self) -> bool {
        if self.current.is_empty() {
            return false;
        }
        let number = self.pages.len() + 1;
        self.pages.push(BodyPage {
            number,
            blocks: std::mem::take(&mut self.current),
        });
        self.used = 0;
        true
    }

    fn break_page(&mut self) {
        if self.close_page() {
            self.output.push(ScreenplayElement::PageBreak);
        }
    }

    /// A `PageBreak` already present in the input is kept as is
    fn explicit_break(&mut self) {
        self.close_page();
        self.output.push(ScreenplayElement::PageBreak);
    }

    fn place(&mut self, unit: &Unit) {
        if !self.at_top() && !self.fits(unit.height(false)) {
            self.break_page();
        }
        if unit.height(true) > self.config.lines_per_page {
            debug!(
                "{:?} needs {} lines, overflowing page {}",
                unit.first(),
                unit.height(true),
                self.pages.len() + 1
            );
        }
        for (element, lines) in &unit.items {
            let laid_out = LaidOutElement {
                element: element.clone(),
                blank_before: element.spaced_before() && !self.at_top(),
                lines: lines.clone(),
            };
            self.used += laid_out.height();
            self.output.push(element.clone());
            self.current.push(laid_out);
        }
    }

    /// Height of a heading plus the units it must keep on its page
    fn heading_group_height(&self, units: &[Unit], at_top: bool) -> usize {
        let mut height = units[0].height(at_top);
        let mut content = 0;
        for unit in units[1..].iter().take_while(|u| u.keeps_with_heading()) {
            if content >= self.config.heading_keep_lines {
                break;
            }
            height += unit.height(false);
            content += unit.content_lines();
        }
        height
    }

    fn finish(mut self) -> Pagination {
        self.close_page();
        Pagination {
            elements: self.output,
            pages: self.pages,
        }
    }
}

/// Lay elements out into body pages.
pub fn paginate(elements: &[ScreenplayElement], config: &LayoutConfig) -> Pagination {
    let units = build_units(elements, config);
    let mut paginator = Paginator::new(config);

    for (i, unit) in units.iter().enumerate() {
        match unit.first() {
            ScreenplayElement::PageBreak => paginator.explicit_break(),
            ScreenplayElement::EpisodeMarker { .. } => {
                if paginator.must_break_before_episode() {
                    paginator.break_page();
                }
                paginator.place(unit);
            }
            ScreenplayElement::SceneHeading { .. } => {
                let group = paginator.heading_group_height(&units[i..], paginator.at_top());
                if !paginator.at_top() && !paginator.fits(group) {
                    debug!("Moving {} to the next page to keep it with its scene", unit.first());
                    paginator.break_page();
                }
                paginator.place(unit);
            }
            _ => paginator.place(unit),
        }
    }

    paginator.finish()
}
