/*!
 * Tests for page assembly and rendering
 */

use bytes::Bytes;

use screenwright::document::{
    DocumentRenderer, PORTRAITS_DISABLED, Page, PageKind, Portrait, PortraitSet, TextRenderer, assemble,
};
use screenwright::layout::{LayoutConfig, SegmentationPolicy, format_screenplay, paginate, segment};
use screenwright::screenplay::{Logline, Genre, Outline, Beat, Role, Screenplay};

use crate::common;

fn screenplay() -> Screenplay {
    Screenplay::new(
        Logline {
            title: "Last Light".to_string(),
            logline: "A keeper keeps the light through one last storm.".to_string(),
            genre: Genre::Drama,
            tone: "Melancholic".to_string(),
        },
        Outline {
            summary: String::new(),
            beats: vec![Beat {
                description: "The storm comes.".to_string(),
                act: 2,
            }],
        },
        vec![
            common::character("MARA", Role::Protagonist),
            common::character("ELI", Role::Antagonist),
        ],
        common::same_place_scenes(4),
    )
    .unwrap()
}

fn body_pages(screenplay: &Screenplay) -> Vec<screenwright::layout::BodyPage> {
    let episodes = segment(screenplay.scenes.clone(), &SegmentationPolicy::default()).unwrap();
    paginate(&format_screenplay(&episodes), &LayoutConfig::default()).pages
}

/// Without recorded portraits every character page explains why
#[test]
fn test_assemble_withoutPortraits_shouldMarkThemDisabled() {
    let screenplay = screenplay();
    let pages = assemble(&screenplay, "AI Generated", &PortraitSet::new(), body_pages(&screenplay));

    assert_eq!(pages[0].kind(), PageKind::Title);
    let reasons: Vec<&str> = pages
        .iter()
        .filter_map(|p| match p {
            Page::CharacterRef(page) => match &page.portrait {
                Portrait::Unavailable { reason } => Some(reason.as_str()),
                Portrait::Image { .. } => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(reasons, vec![PORTRAITS_DISABLED, PORTRAITS_DISABLED]);
}

/// The rendered document holds every page in order
#[test]
fn test_render_assembledDocument_shouldContainAllPages() {
    let screenplay = screenplay();
    let body = body_pages(&screenplay);
    let body_count = body.len();
    let mut portraits = PortraitSet::new();
    portraits.insert(
        "MARA",
        Portrait::Image {
            file_name: "last_light_0badf00d_mara.png".to_string(),
            data: Bytes::from_static(b"\x89PNG"),
        },
    );
    portraits.insert(
        "ELI",
        Portrait::Unavailable {
            reason: "Rate limit exceeded: slow down".to_string(),
        },
    );

    let pages = assemble(&screenplay, "Jo Writer", &portraits, body);
    let text = String::from_utf8(TextRenderer::default().render(&pages).unwrap()).unwrap();

    assert_eq!(text.matches('\x0c').count(), pages.len() - 1);
    assert_eq!(pages.len(), 1 + 2 + body_count);
    assert!(text.contains("LAST LIGHT"));
    assert!(text.contains("Jo Writer"));
    assert!(text.contains("[Portrait: last_light_0badf00d_mara.png]"));
    assert!(text.contains("Rate limit exceeded: slow down"));
    assert!(text.contains("FADE IN:"));
    assert!(text.trim_end().ends_with("THE END"));
}

/// Rendering the same pages twice gives the same bytes
#[test]
fn test_render_shouldBeDeterministic() {
    let screenplay = screenplay();
    let pages = assemble(&screenplay, "AI Generated", &PortraitSet::new(), body_pages(&screenplay));
    let renderer = TextRenderer::default();

    assert_eq!(renderer.render(&pages).unwrap(), renderer.render(&pages).unwrap());
    assert_eq!(renderer.extension(), "txt");
}
