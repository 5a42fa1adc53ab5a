/*!
 * Page types of the assembled document.
 */

use bytes::Bytes;
use std::collections::HashMap;

use crate::layout::BodyPage;
use crate::screenplay::{Character, Screenplay, name_key};

/// Kind tag of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Title,
    CharacterRef,
    Body,
}

/// Title page contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitlePage {
    pub title: String,
    pub author: String,
    pub logline: String,
    pub genre: String,
    pub tone: String,
}

impl TitlePage {
    /// Title page for a screenplay
    pub fn from_screenplay(screenplay: &Screenplay, author: &str) -> Self {
        Self {
            title: screenplay.title().to_string(),
            author: author.to_string(),
            logline: screenplay.logline.logline.clone(),
            genre: screenplay.logline.genre.to_string(),
            tone: screenplay.logline.tone.clone(),
        }
    }
}

/// Portrait shown on a character page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Portrait {
    /// Generated image and the file it is saved as
    Image { file_name: String, data: Bytes },
    /// No image; the page says so and why
    Unavailable { reason: String },
}

impl Portrait {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Character reference page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterPage {
    pub character: Character,
    pub portrait: Portrait,
}

impl CharacterPage {
    /// Whether the page carries an image
    pub fn has_image(&self) -> bool {
        self.portrait.is_image()
    }
}

/// One page of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Title(TitlePage),
    CharacterRef(CharacterPage),
    Body(BodyPage),
}

impl Page {
    pub fn kind(&self) -> PageKind {
        match self {
            Self::Title(_) => PageKind::Title,
            Self::CharacterRef(_) => PageKind::CharacterRef,
            Self::Body(_) => PageKind::Body,
        }
    }
}

/// Portrait outcomes keyed by character name
#[derive(Debug, Clone, Default)]
pub struct PortraitSet {
    portraits: HashMap<String, Portrait>,
}

impl PortraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a character
    pub fn insert(&mut self, character: &str, portrait: Portrait) {
        self.portraits.insert(name_key(character), portrait);
    }

    /// Outcome for a character, if one was recorded
    pub fn get(&self, character: &str) -> Option<&Portrait> {
        self.portraits.get(&name_key(character))
    }

    /// Number of generated images
    pub fn image_count(&self) -> usize {
        self.portraits.values().filter(|p| p.is_image()).count()
    }

    /// Images with their file names
    pub fn images(&self) -> impl Iterator<Item = (&str, &Bytes)> {
        self.portraits.values().filter_map(|p| match p {
            Portrait::Image { file_name, data } => Some((file_name.as_str(), data)),
            Portrait::Unavailable { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.portraits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portraits.is_empty()
    }
}
