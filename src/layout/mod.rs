/*!
 * Deterministic screenplay layout.
 *
 * - `segmentation`: scenes to episodes, with local scene numbers
 * - `formatter`: episodes to typed screenplay elements
 * - `pagination`: elements to body pages
 */

pub mod element;
pub mod formatter;
pub mod pagination;
pub mod segmentation;

pub use element::{Alignment, ScreenplayElement};
pub use formatter::{FADE_IN, FADE_OUT, THE_END, format_screenplay};
pub use pagination::{BodyPage, LaidOutElement, LayoutConfig, Pagination, paginate, wrap_text};
pub use segmentation::{SegmentationPolicy, parse_episode_hint, segment};
