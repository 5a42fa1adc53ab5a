/*!
 * Screenplay data model.
 *
 * - `model`: loglines, outlines, characters, scenes, dialogue and episodes
 * - `heading`: scene heading parsing
 */

pub mod heading;
pub mod model;

pub use self::heading::{SceneHeading, Setting};
pub use self::model::{
    Age, Beat, Character, DialogueLine, Episode, Genre, Logline, NumberedScene, Outline, Role,
    Scene, SceneDialogue, SceneDraft, Screenplay, name_key,
};
