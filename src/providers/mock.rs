/*!
 * Mock collaborators for testing and offline runs.
 *
 * This module provides mocks that simulate different behaviors:
 * - `MockCreativeProvider::scripted()` - Returns a canned JSON answer per stage
 * - `MockCreativeProvider::failing_at()` - Succeeds until one stage, then errors
 * - `MockPortraitProvider::working()` - Returns placeholder image bytes
 * - `MockPortraitProvider::failing_for()` - Fails for the named characters
 */

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::generation::{CreativeGenerator, PortraitGenerator};
use crate::pipeline::{ScreenplayState, Stage};
use crate::screenplay::{Character, name_key};

/// PNG signature used as the start of every placeholder image
pub const PLACEHOLDER_PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Behavior mode for the creative mock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns the scripted response for each stage
    Scripted,
    /// Fails with an API error once the given stage is reached
    FailingAt(Stage),
    /// Sleeps before answering each stage
    Slow { delay_ms: u64 },
}

/// Scripted creative generation service
#[derive(Debug, Clone)]
pub struct MockCreativeProvider {
    behavior: MockBehavior,
    responses: Arc<HashMap<Stage, Value>>,
    requests: Arc<Mutex<Vec<Stage>>>,
}

impl MockCreativeProvider {
    /// Create a mock with the specified behavior and responses
    pub fn new(behavior: MockBehavior, responses: HashMap<Stage, Value>) -> Self {
        Self {
            behavior,
            responses: Arc::new(responses),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every stage from `responses`
    pub fn scripted(responses: HashMap<Stage, Value>) -> Self {
        Self::new(MockBehavior::Scripted, responses)
    }

    /// Answer with the sample screenplay until `stage`, which fails
    pub fn failing_at(stage: Stage) -> Self {
        Self::new(MockBehavior::FailingAt(stage), sample_stage_responses())
    }

    /// Answer with the sample screenplay after a delay per stage
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms }, sample_stage_responses())
    }

    /// Stages requested so far, in order
    pub fn requested_stages(&self) -> Vec<Stage> {
        self.requests.lock().clone()
    }

    fn scripted_response(&self, stage: Stage) -> Result<Value, ProviderError> {
        self.responses
            .get(&stage)
            .cloned()
            .ok_or_else(|| ProviderError::ParseError(format!("no scripted response for {} stage", stage)))
    }
}

#[async_trait]
impl CreativeGenerator for MockCreativeProvider {
    async fn generate(&self, stage: Stage, _state: &ScreenplayState) -> Result<Value, ProviderError> {
        self.requests.lock().push(stage);

        match self.behavior {
            MockBehavior::Scripted => self.scripted_response(stage),
            MockBehavior::FailingAt(failing) if failing == stage => Err(ProviderError::ApiError {
                message: format!("Simulated {} stage failure", stage),
                status_code: 500,
            }),
            MockBehavior::FailingAt(_) => self.scripted_response(stage),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                self.scripted_response(stage)
            }
        }
    }
}

/// Portrait generation mock
#[derive(Debug, Clone, Default)]
pub struct MockPortraitProvider {
    /// Name keys of characters whose portrait fails
    failing: Arc<HashSet<String>>,
    /// Artificial latency per portrait
    delay_ms: u64,
    /// Number of portraits requested
    request_count: Arc<AtomicUsize>,
    /// Requests currently in flight, and the maximum seen
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockPortraitProvider {
    /// Create a mock that always succeeds
    pub fn working() -> Self {
        Self::default()
    }

    /// Create a mock that fails for the named characters
    pub fn failing_for(names: &[&str]) -> Self {
        Self {
            failing: Arc::new(names.iter().map(|n| name_key(n)).collect()),
            ..Self::default()
        }
    }

    /// Add latency to each request
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Number of portraits requested so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous requests observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Placeholder image bytes for a character
    pub fn placeholder_image(name: &str) -> Bytes {
        let mut data = PLACEHOLDER_PNG_HEADER.to_vec();
        data.extend_from_slice(name.as_bytes());
        Bytes::from(data)
    }
}

#[async_trait]
impl PortraitGenerator for MockPortraitProvider {
    async fn generate_portrait(&self, character: &Character) -> Result<Bytes, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&name_key(&character.name)) {
            Err(ProviderError::ApiError {
                message: format!("Simulated portrait failure for {}", character.name),
                status_code: 500,
            })
        } else {
            Ok(Self::placeholder_image(&character.name))
        }
    }
}

/// Responses for a complete five-scene screenplay in two episodes.
///
/// Scenes carry episode hints 1, 1, 1, 2, 2 and every dialogue line is spoken
/// by one of the three characters.
pub fn sample_stage_responses() -> HashMap<Stage, Value> {
    HashMap::from([
        (
            Stage::Logline,
            json!({
                "title": "Last Light",
                "logline": "When the last lighthouse on the coast is sold, its stubborn keeper must keep the lamp burning through one final storm to save a stranded ferry.",
                "genre": "Drama",
                "tone": "Melancholic"
            }),
        ),
        (
            Stage::Outline,
            json!({
                "summary": "A keeper resists the sale of her lighthouse and proves its worth in a storm.",
                "beats": [
                    {"description": "Mara learns the lighthouse has been sold.", "act": 1},
                    {"description": "A storm traps a ferry offshore.", "act": 2},
                    {"description": "The power fails and Mara lights the old lamp.", "act": 2},
                    {"description": "The ferry reaches harbour; the buyer relents.", "act": 3}
                ]
            }),
        ),
        (
            Stage::Characters,
            json!({
                "characters": [
                    {
                        "name": "MARA",
                        "age": 62,
                        "role": "protagonist",
                        "description": "Keeper of the lighthouse for thirty years.",
                        "arc": "From refusing change to passing on her craft.",
                        "visual_description": "Weathered woman in her sixties, grey braid, yellow oilskin coat."
                    },
                    {
                        "name": "ELI",
                        "age": "late 30s",
                        "role": "antagonist",
                        "description": "Developer who bought the lighthouse.",
                        "arc": "Learns what the light is worth.",
                        "visual_description": "Lean man, tailored navy suit, rain-soaked leather shoes."
                    },
                    {
                        "name": "JUNE",
                        "age": 19,
                        "role": "supporting",
                        "description": "Ferry deckhand, Mara's niece.",
                        "arc": "Finds her calling.",
                        "visual_description": "Young woman, short red hair, orange life vest."
                    }
                ]
            }),
        ),
        (
            Stage::Scenes,
            json!({
                "scenes": [
                    {"scene_number": 1, "episode": 1, "heading": "INT. LIGHTHOUSE - NIGHT", "action": "Mara polishes the great lens as wind rattles the glass."},
                    {"scene_number": 2, "episode": 1, "heading": "EXT. LIGHTHOUSE - DAY", "action": "Eli steps out of a black car and squints up at the tower."},
                    {"scene_number": 3, "episode": 1, "heading": "INT. LIGHTHOUSE - DAY", "action": "Mara and Eli face each other across the kitchen table.", "transition": "CUT TO:"},
                    {"scene_number": 4, "episode": 2, "heading": "EXT. FERRY DECK - NIGHT", "action": "Waves break over the rail. June clings to a stanchion."},
                    {"scene_number": 5, "episode": 2, "heading": "INT. LAMP ROOM - NIGHT", "action": "Mara strikes a match and the old wick catches."}
                ]
            }),
        ),
        (
            Stage::Dialogue,
            json!({
                "scenes": [
                    {"scene_number": 1, "dialogue": [
                        {"character": "MARA", "line": "Thirty years and you never once went dark."}
                    ]},
                    {"scene_number": 2, "dialogue": [
                        {"character": "ELI", "parenthetical": "To himself", "line": "Prime real estate."}
                    ]},
                    {"scene_number": 3, "dialogue": [
                        {"character": "ELI", "line": "The light is automated now. You can go home."},
                        {"character": "MARA", "parenthetical": "quietly", "line": "This is home."}
                    ]},
                    {"scene_number": 4, "dialogue": [
                        {"character": "JUNE", "line": "Where's the light? Why is it dark?"}
                    ]},
                    {"scene_number": 5, "dialogue": [
                        {"character": "MARA", "line": "Come on, old girl. One more night.", "transition": "SMASH CUT TO:"}
                    ]}
                ]
            }),
        ),
    ])
}
