//! Workflow orchestration tests against a scripted mock service: prompt
//! assembly, background-instruction injection, client-side post-processing,
//! and the request state machine.

use std::cell::RefCell;
use std::collections::VecDeque;

use genimage_kit::{
    AspectRatio, ComicStyle, GenerateService, GeneratedSegment, IdeaCategory, ImageCodec,
    ImagePayload, PixelCodec, PrimaryEdit, Process, Raster, RemoteError, ResponseMode, Studio,
    UpscaleFactor, WorkflowError, WorkflowState,
};
use image::Rgba;

fn png(width: u32, height: u32, pixel: [u8; 4]) -> ImagePayload {
    ImageCodec
        .encode_png(&Raster::from_pixel(width, height, Rgba(pixel)))
        .expect("PNG encode should succeed")
}

#[derive(Default)]
struct MockService {
    edit_responses: RefCell<VecDeque<Vec<GeneratedSegment>>>,
    edit_prompts: RefCell<Vec<String>>,
    edit_reference_counts: RefCell<Vec<usize>>,
    analyze_response: Option<String>,
    analyze_prompts: RefCell<Vec<String>>,
    generated_image: Option<ImagePayload>,
    generate_prompts: RefCell<Vec<String>>,
    interleaved_responses: RefCell<VecDeque<Vec<GeneratedSegment>>>,
    interleaved_prompts: RefCell<Vec<String>>,
    interleaved_modes: RefCell<Vec<ResponseMode>>,
}

impl MockService {
    fn queue_edit(self, segments: Vec<GeneratedSegment>) -> Self {
        self.edit_responses.borrow_mut().push_back(segments);
        self
    }

    fn queue_interleaved(self, segments: Vec<GeneratedSegment>) -> Self {
        self.interleaved_responses.borrow_mut().push_back(segments);
        self
    }

    fn with_analyze(mut self, response: &str) -> Self {
        self.analyze_response = Some(response.to_string());
        self
    }

    fn with_generated_image(mut self, payload: ImagePayload) -> Self {
        self.generated_image = Some(payload);
        self
    }
}

impl GenerateService for MockService {
    fn edit_image(
        &self,
        _original: &ImagePayload,
        prompt: &str,
        references: &[ImagePayload],
    ) -> Result<Vec<GeneratedSegment>, RemoteError> {
        self.edit_prompts.borrow_mut().push(prompt.to_string());
        self.edit_reference_counts
            .borrow_mut()
            .push(references.len());
        self.edit_responses
            .borrow_mut()
            .pop_front()
            .ok_or(RemoteError::Status {
                code: 429,
                message: "quota exhausted".to_string(),
            })
    }

    fn generate_image(
        &self,
        prompt: &str,
        _aspect: AspectRatio,
    ) -> Result<ImagePayload, RemoteError> {
        self.generate_prompts.borrow_mut().push(prompt.to_string());
        self.generated_image
            .clone()
            .ok_or(RemoteError::NoImageReturned)
    }

    fn generate_interleaved(
        &self,
        prompt: &str,
        mode: ResponseMode,
    ) -> Result<Vec<GeneratedSegment>, RemoteError> {
        self.interleaved_prompts.borrow_mut().push(prompt.to_string());
        self.interleaved_modes.borrow_mut().push(mode);
        self.interleaved_responses
            .borrow_mut()
            .pop_front()
            .ok_or(RemoteError::Status {
                code: 429,
                message: "quota exhausted".to_string(),
            })
    }

    fn analyze(
        &self,
        _images: &[ImagePayload],
        prompt: &str,
        _temperature: f32,
    ) -> Result<String, RemoteError> {
        self.analyze_prompts.borrow_mut().push(prompt.to_string());
        self.analyze_response
            .clone()
            .ok_or_else(|| RemoteError::MalformedResponse("no text in analysis response".to_string()))
    }
}

#[test]
fn primary_edit_upscales_client_side() {
    let returned = png(8, 8, [1, 2, 3, 255]);
    let service = MockService::default().queue_edit(vec![
        GeneratedSegment::Text("done".to_string()),
        GeneratedSegment::Image(returned),
    ]);
    let mut studio = Studio::new(service);

    // Checkerboard original: background classified as present.
    let original = ImageCodec
        .encode_png(&Raster::from_fn(8, 8, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        }))
        .unwrap();
    let request = PrimaryEdit {
        processes: vec![Process::Upscale],
        upscale_factor: UpscaleFactor::X2,
        ..Default::default()
    };

    let result = studio.primary_edit(&original, &request).unwrap();
    assert_eq!(studio.slot().state(), WorkflowState::Succeeded);

    assert_eq!(
        result[0].as_text(),
        Some("Upscaling (2x) and detail enhancement complete.")
    );
    let image = result[1].as_image().unwrap();
    assert_eq!(ImageCodec.decode(image).unwrap().dimensions(), (16, 16));
}

#[test]
fn empty_background_with_style_injects_instruction() {
    let service = MockService::default().queue_edit(vec![GeneratedSegment::Image(png(
        4,
        4,
        [0, 0, 0, 255],
    ))]);
    let mut studio = Studio::new(service);

    let uniform = png(10, 10, [200, 200, 200, 255]);
    let request = PrimaryEdit {
        style: genimage_kit::prompt::style_by_label("Figure"),
        ..Default::default()
    };
    studio.primary_edit(&uniform, &request).unwrap();

    let prompts = studio_service_prompts(&studio);
    assert!(prompts[0].starts_with("[SPECIAL INSTRUCTION]"));
    assert!(prompts[0].contains("plastic toy figure"));
}

#[test]
fn busy_background_skips_instruction() {
    let service = MockService::default().queue_edit(vec![GeneratedSegment::Image(png(
        4,
        4,
        [0, 0, 0, 255],
    ))]);
    let mut studio = Studio::new(service);

    let checkerboard = ImageCodec
        .encode_png(&Raster::from_fn(10, 10, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([250, 250, 250, 255])
            } else {
                Rgba([5, 5, 5, 255])
            }
        }))
        .unwrap();
    let request = PrimaryEdit {
        style: genimage_kit::prompt::style_by_label("Figure"),
        ..Default::default()
    };
    studio.primary_edit(&checkerboard, &request).unwrap();

    let prompts = studio_service_prompts(&studio);
    assert!(!prompts[0].contains("[SPECIAL INSTRUCTION]"));
}

#[test]
fn translation_failure_falls_back_to_original_text() {
    // analyze_response is None, so every translation attempt fails; the
    // untranslated text must still reach the prompt.
    let service = MockService::default().queue_edit(vec![GeneratedSegment::Image(png(
        4,
        4,
        [9, 9, 9, 255],
    ))]);
    let mut studio = Studio::new(service);

    let original = png(6, 6, [1, 2, 3, 255]);
    let request = PrimaryEdit {
        custom_text: "하늘을 보라색으로".to_string(),
        ..Default::default()
    };
    studio.primary_edit(&original, &request).unwrap();

    let prompts = studio_service_prompts(&studio);
    assert!(prompts[0].contains("하늘을 보라색으로"));
}

#[test]
fn remove_background_applies_returned_mask() {
    let mask_raster = Raster::from_fn(6, 6, |x, _| {
        if x < 3 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    let mask = ImageCodec.encode_png(&mask_raster).unwrap();
    let service =
        MockService::default().queue_edit(vec![GeneratedSegment::Image(mask)]);
    let mut studio = Studio::new(service);

    let original = png(6, 6, [10, 20, 30, 255]);
    let result = studio.remove_background(&original).unwrap();

    assert_eq!(result[0].as_text(), Some("Background removal complete."));
    let cut_out = ImageCodec.decode(result[1].as_image().unwrap()).unwrap();
    for (x, _, pixel) in cut_out.enumerate_pixels() {
        let expected_alpha = if x < 3 { 255 } else { 0 };
        assert_eq!(pixel.0, [10, 20, 30, expected_alpha]);
    }
}

#[test]
fn remove_background_rejects_unusable_mask_format() {
    let bogus_mask = ImagePayload::new(vec![1, 2, 3], "image/gif");
    let service =
        MockService::default().queue_edit(vec![GeneratedSegment::Image(bogus_mask)]);
    let mut studio = Studio::new(service);

    let err = studio.remove_background(&png(4, 4, [0, 0, 0, 255])).unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Remote(RemoteError::InvalidMaskFormat { .. })
    ));
    assert_eq!(studio.slot().state(), WorkflowState::Failed);
    assert!(studio.slot().last_error().unwrap().contains("image/gif"));
}

#[test]
fn synthesize_keeps_text_parts_and_final_image() {
    let final_image = png(5, 5, [7, 7, 7, 255]);
    let service = MockService::default()
        .with_analyze("put the hat on the dog")
        .queue_edit(vec![
            GeneratedSegment::Text("note from the model".to_string()),
            GeneratedSegment::Image(final_image),
        ]);
    let mut studio = Studio::new(service);

    let original = png(5, 5, [1, 1, 1, 255]);
    let references = [png(5, 5, [2, 2, 2, 255]), png(5, 5, [3, 3, 3, 255])];
    let result = studio
        .synthesize(&original, &references, "모자를 씌워줘", AspectRatio::Wide)
        .unwrap();

    assert_eq!(result[0].as_text(), Some("note from the model"));
    assert_eq!(
        result[1].as_text(),
        Some("Synthesis and 16:9 recomposition complete.")
    );
    assert!(result[2].as_image().is_some());

    let prompts = studio_service_prompts(&studio);
    assert!(prompts[0].contains("put the hat on the dog"));
    assert!(prompts[0].contains("16:9"));
    assert_eq!(*studio.service().edit_reference_counts.borrow(), vec![2]);
}

#[test]
fn inpaint_sends_mask_as_single_reference() {
    let service = MockService::default().queue_edit(vec![GeneratedSegment::Image(png(
        4,
        4,
        [0, 0, 0, 255],
    ))]);
    let mut studio = Studio::new(service);

    let result = studio
        .inpaint(&png(4, 4, [1, 1, 1, 255]), &png(4, 4, [255, 255, 255, 255]))
        .unwrap();
    assert_eq!(result[0].as_text(), Some("Inpainting complete."));
    assert_eq!(*studio.service().edit_reference_counts.borrow(), vec![1]);
}

#[test]
fn text_only_response_is_no_image_error() {
    let service = MockService::default()
        .queue_edit(vec![GeneratedSegment::Text("cannot comply".to_string())]);
    let mut studio = Studio::new(service);

    let err = studio
        .primary_edit(
            &png(4, 4, [0, 0, 0, 255]),
            &PrimaryEdit {
                processes: vec![Process::Restore],
                ..Default::default()
            },
        )
        .unwrap_err();
    match err {
        WorkflowError::NoImageProduced { detail } => {
            assert_eq!(detail.as_deref(), Some("cannot comply"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn remote_failure_marks_slot_failed_then_allows_retry() {
    // No queued responses: the first edit call fails with a quota error.
    let mut studio = Studio::new(MockService::default());
    let original = png(4, 4, [0, 0, 0, 255]);
    let request = PrimaryEdit {
        processes: vec![Process::Restore],
        ..Default::default()
    };

    let err = studio.primary_edit(&original, &request).unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Remote(RemoteError::Status { code: 429, .. })
    ));
    assert_eq!(studio.slot().state(), WorkflowState::Failed);
    assert!(studio.slot().last_error().unwrap().contains("429"));

    // The failed slot does not wedge: a retry may start and succeed.
    studio
        .service()
        .edit_responses
        .borrow_mut()
        .push_back(vec![GeneratedSegment::Image(png(4, 4, [0, 0, 0, 255]))]);
    studio.primary_edit(&original, &request).unwrap();
    assert_eq!(studio.slot().state(), WorkflowState::Succeeded);
}

#[test]
fn generate_original_translates_then_generates() {
    let service = MockService::default()
        .with_analyze("a cat floating in space")
        .with_generated_image(png(3, 3, [4, 4, 4, 255]));
    let mut studio = Studio::new(service);

    let payload = studio
        .generate_original("우주를 떠다니는 고양이", AspectRatio::Square)
        .unwrap();
    assert_eq!(payload.mime_type(), "image/png");

    assert!(studio.service().analyze_prompts.borrow()[0].starts_with("Translate"));
    assert_eq!(
        *studio.service().generate_prompts.borrow(),
        vec!["a cat floating in space".to_string()]
    );
}

#[test]
fn generate_original_rejects_empty_idea() {
    let service = MockService::default().with_generated_image(png(3, 3, [4, 4, 4, 255]));
    let mut studio = Studio::new(service);

    let err = studio.generate_original("   ", AspectRatio::Square).unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyPrompt));
}

#[test]
fn suggestions_run_outside_the_workflow_slot() {
    let service = MockService::default().with_analyze("combine them dramatically");
    let studio = Studio::new(service);

    let original = png(5, 5, [200, 200, 200, 255]);
    let suggestion = studio
        .suggest_composition(&original, &[], AspectRatio::Original)
        .unwrap();
    assert_eq!(suggestion, "combine them dramatically");
    assert_eq!(studio.slot().state(), WorkflowState::Idle);

    let prompt = &studio.service().analyze_prompts.borrow()[0];
    // The uniform canvas classifies as empty background.
    assert!(prompt.contains("NO_BACKGROUND"));
}

#[test]
fn story_generation_requests_images_only() {
    let service = MockService::default().queue_interleaved(vec![
        GeneratedSegment::Image(png(4, 4, [1, 1, 1, 255])),
        GeneratedSegment::Image(png(4, 4, [2, 2, 2, 255])),
    ]);
    let mut studio = Studio::new(service);

    let result = studio.generate_story("a lost umbrella finds its owner").unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|segment| segment.as_image().is_some()));
    assert_eq!(studio.slot().state(), WorkflowState::Succeeded);

    assert_eq!(
        *studio.service().interleaved_modes.borrow(),
        vec![ResponseMode::ImagesOnly]
    );
    let prompt = &studio.service().interleaved_prompts.borrow()[0];
    assert!(prompt.contains("a lost umbrella finds its owner"));
    assert!(prompt.contains("8 images"));
}

#[test]
fn recipe_generation_keeps_interleaved_pairs() {
    let service = MockService::default().queue_interleaved(vec![
        GeneratedSegment::Text("Step 1: prepare the ingredients.".to_string()),
        GeneratedSegment::Image(png(4, 4, [1, 1, 1, 255])),
        GeneratedSegment::Text("Step 2: simmer the broth.".to_string()),
        GeneratedSegment::Image(png(4, 4, [2, 2, 2, 255])),
    ]);
    let mut studio = Studio::new(service);

    let result = studio.generate_recipe("kimchi stew").unwrap();
    assert_eq!(result.len(), 4);
    assert!(result[0].as_text().is_some());
    assert!(result[1].as_image().is_some());
    assert!(result[2].as_text().is_some());
    assert!(result[3].as_image().is_some());

    assert_eq!(
        *studio.service().interleaved_modes.borrow(),
        vec![ResponseMode::ImagesAndText]
    );
    assert!(studio.service().interleaved_prompts.borrow()[0].contains("\"kimchi stew\""));
}

#[test]
fn story_rejects_blank_idea() {
    let mut studio = Studio::new(MockService::default());
    let err = studio.generate_story("  ").unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyPrompt));
    assert_eq!(studio.slot().state(), WorkflowState::Failed);
}

#[test]
fn proof_photo_uses_id_photo_preset() {
    let service = MockService::default().queue_edit(vec![GeneratedSegment::Image(png(
        3,
        4,
        [7, 7, 7, 255],
    ))]);
    let mut studio = Studio::new(service);

    let result = studio.proof_photo(&png(6, 8, [1, 2, 3, 255])).unwrap();
    assert_eq!(result[0].as_text(), Some("ID photo conversion complete."));
    assert!(result[1].as_image().is_some());

    let prompts = studio_service_prompts(&studio);
    assert!(prompts[0].contains("ID photo"));
    assert!(prompts[0].contains("3:4 aspect ratio"));
}

#[test]
fn floorplan_render_appends_aspect_expansion() {
    let service = MockService::default().queue_edit(vec![GeneratedSegment::Image(png(
        4,
        4,
        [9, 9, 9, 255],
    ))]);
    let mut studio = Studio::new(service);

    let result = studio
        .floorplan_render(&png(8, 8, [255, 255, 255, 255]), AspectRatio::Wide)
        .unwrap();
    assert_eq!(
        result[0].as_text(),
        Some("3D floor plan render (16:9) complete.")
    );

    let prompts = studio_service_prompts(&studio);
    assert!(prompts[0].contains("2D floor plan"));
    assert!(prompts[0].contains("Target Aspect Ratio: 16:9"));
}

#[test]
fn comic_panel_keeps_untranslated_caption_on_failure() {
    // analyze_response is None, so caption translation falls back to the
    // original text, which must still be rendered into the panel.
    let service = MockService::default().queue_edit(vec![GeneratedSegment::Image(png(
        4,
        4,
        [0, 0, 0, 255],
    ))]);
    let mut studio = Studio::new(service);

    let result = studio
        .comic_panel(
            &png(6, 6, [1, 1, 1, 255]),
            ComicStyle::Noir,
            "어두운 밤이었다",
            AspectRatio::Tall,
        )
        .unwrap();
    assert_eq!(result[0].as_text(), Some("Comic panel (9:16) complete."));

    let prompts = studio_service_prompts(&studio);
    assert!(prompts[0].contains("noir art style"));
    assert!(prompts[0].contains("\"어두운 밤이었다\""));
    assert!(prompts[0].contains("Target Aspect Ratio: 9:16"));
}

#[test]
fn life_album_anchors_on_the_stated_age() {
    let service = MockService::default().queue_edit(vec![GeneratedSegment::Image(png(
        4,
        4,
        [5, 5, 5, 255],
    ))]);
    let mut studio = Studio::new(service);

    let original = png(6, 6, [1, 2, 3, 255]);
    let result = studio
        .life_album(&original, " 34 ", AspectRatio::Square)
        .unwrap();
    assert_eq!(result[0].as_text(), Some("Life album collage complete."));

    let prompts = studio_service_prompts(&studio);
    assert!(prompts[0].contains("age 34"));
    assert!(prompts[0].contains("1:1 ratio"));

    let err = studio.life_album(&original, "   ", AspectRatio::Square).unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyPrompt));
}

#[test]
fn idea_elaboration_runs_outside_the_slot() {
    let service = MockService::default().with_analyze("a dramatic ramen close-up");
    let studio = Studio::new(service);

    let suggestion = studio.suggest_original("ramen", IdeaCategory::Food).unwrap();
    assert_eq!(suggestion, "a dramatic ramen close-up");
    assert_eq!(studio.slot().state(), WorkflowState::Idle);

    let prompt = &studio.service().analyze_prompts.borrow()[0];
    assert!(prompt.contains("FOOD PHOTO TEMPLATE"));
    assert!(prompt.contains("\"ramen\""));
}

#[test]
fn story_and_recipe_suggestions_read_the_image() {
    let service = MockService::default().with_analyze("macarons");
    let studio = Studio::new(service);

    let dish = studio.suggest_recipe(&png(5, 5, [210, 180, 140, 255])).unwrap();
    assert_eq!(dish, "macarons");
    assert!(studio.service().analyze_prompts.borrow()[0].contains("name of the dish"));

    let idea = studio.suggest_story(&png(5, 5, [0, 0, 200, 255])).unwrap();
    assert_eq!(idea, "macarons");
    assert!(studio.service().analyze_prompts.borrow()[1].contains("8 silent images"));
}

fn studio_service_prompts(studio: &Studio<MockService>) -> Vec<String> {
    studio.service().edit_prompts.borrow().clone()
}
