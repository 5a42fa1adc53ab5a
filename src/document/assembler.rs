/*!
 * Document assembler: title page, character pages, body pages.
 */

use crate::layout::BodyPage;
use crate::screenplay::Screenplay;

use super::page::{CharacterPage, Page, Portrait, PortraitSet, TitlePage};

/// Reason shown when no portrait outcome was recorded for a character
pub const PORTRAITS_DISABLED: &str = "portrait generation disabled";

/// Build the page sequence: one title page, one character page per character
/// in creation order, then the body pages.
pub fn assemble(
    screenplay: &Screenplay,
    author: &str,
    portraits: &PortraitSet,
    body: Vec<BodyPage>,
) -> Vec<Page> {
    let mut pages = Vec::with_capacity(1 + screenplay.characters.len() + body.len());
    pages.push(Page::Title(TitlePage::from_screenplay(screenplay, author)));

    pages.extend(screenplay.characters.iter().map(|character| {
        let portrait = portraits.get(&character.name).cloned().unwrap_or(Portrait::Unavailable {
            reason: PORTRAITS_DISABLED.to_string(),
        });
        Page::CharacterRef(CharacterPage {
            character: character.clone(),
            portrait,
        })
    }));

    pages.extend(body.into_iter().map(Page::Body));
    pages
}
