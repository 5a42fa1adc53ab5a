/*!
 * Final document: page model, assembly and rendering.
 */

pub mod assembler;
pub mod page;
pub mod render;

pub use assembler::{PORTRAITS_DISABLED, assemble};
pub use page::{CharacterPage, Page, PageKind, Portrait, PortraitSet, TitlePage};
pub use render::{DocumentRenderer, RenderFailure, TextRenderer, render_pages};
