//! Request orchestration.
//!
//! Each workflow runs its steps strictly in sequence: translate, classify
//! the background, call the generation service, post-process. A workflow
//! slot tracks the request lifecycle so the UI can disable its triggering
//! controls while a request is outstanding, and either a complete valid
//! result or an error comes back, never both.

use crate::{
    codec::{ImageCodec, PixelCodec},
    error::{RemoteError, WorkflowError},
    ops::{
        apply_mask::apply_mask,
        background::{is_background_empty, BackgroundHeuristics},
        upscale::{upscale, UpscaleFactor},
    },
    payload::ImagePayload,
    prompt::{
        assemble_primary_prompt, life_album_prompt, recipe_prompt, story_prompt,
        suggest_composition_prompt, suggest_original_prompt, suggest_primary_prompt,
        synthesis_prompt, AspectRatio, ComicStyle, IdeaCategory, Process, StylePreset,
        FLOORPLAN_PROMPT, INPAINT_PROMPT, PROOF_PHOTO_PROMPT, REMOVE_BACKGROUND_MASK_PROMPT,
        SUGGEST_RECIPE_PROMPT, SUGGEST_STORY_PROMPT,
    },
    remote::{
        segment::GeneratedSegment, translate_or_original, GenerateService, ResponseMode,
    },
};

/// Lifecycle of a workflow slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// No request has run, or the slot was reset.
    #[default]
    Idle,
    /// A request is outstanding; new requests are refused.
    Requesting,
    /// The last request produced a complete result.
    Succeeded,
    /// The last request failed; the failure message is retained.
    Failed,
}

/// Per-workflow request tracker. Transitions only through the begin /
/// succeed / fail events, replacing scattered in-flight booleans.
#[derive(Debug, Default)]
pub struct WorkflowSlot {
    state: WorkflowState,
    last_error: Option<String>,
}

impl WorkflowSlot {
    fn begin(&mut self) -> Result<(), WorkflowError> {
        if self.state == WorkflowState::Requesting {
            return Err(WorkflowError::Busy);
        }
        self.state = WorkflowState::Requesting;
        self.last_error = None;
        Ok(())
    }

    fn succeed(&mut self) {
        self.state = WorkflowState::Succeeded;
    }

    fn fail(&mut self, message: String) {
        self.state = WorkflowState::Failed;
        self.last_error = Some(message);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Message of the last failure, if the slot is in `Failed`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the slot to `Idle`, e.g. when the user loads a new image.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Inputs for a primary edit: stacked processes, an optional style preset,
/// free-form text, and the client-side enlargement factor used when the
/// upscale process is selected.
#[derive(Debug, Clone, Default)]
pub struct PrimaryEdit {
    /// Selected pre-processing operations.
    pub processes: Vec<Process>,
    /// Selected style preset, if any.
    pub style: Option<&'static StylePreset>,
    /// Free-form user request, in any language.
    pub custom_text: String,
    /// Enlargement applied client-side after the service responds.
    pub upscale_factor: UpscaleFactor,
}

impl PrimaryEdit {
    /// Whether there is anything to do.
    pub fn has_task(&self) -> bool {
        !self.processes.is_empty() || self.style.is_some() || !self.custom_text.trim().is_empty()
    }
}

/// Sequences generation workflows against a [`GenerateService`], running the
/// client-side pixel pipeline on the results.
pub struct Studio<S, C = ImageCodec> {
    service: S,
    codec: C,
    heuristics: BackgroundHeuristics,
    slot: WorkflowSlot,
}

impl<S: GenerateService> Studio<S> {
    /// Creates a studio over the default `image`-crate codec.
    pub fn new(service: S) -> Self {
        Self::with_codec(service, ImageCodec)
    }
}

impl<S: GenerateService, C: PixelCodec> Studio<S, C> {
    /// Creates a studio with an explicit codec collaborator.
    pub fn with_codec(service: S, codec: C) -> Self {
        Self {
            service,
            codec,
            heuristics: BackgroundHeuristics::default(),
            slot: WorkflowSlot::default(),
        }
    }

    /// Overrides the background-classifier constants.
    pub fn with_heuristics(mut self, heuristics: BackgroundHeuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// The workflow slot, for UI state decisions.
    pub fn slot(&self) -> &WorkflowSlot {
        &self.slot
    }

    /// The underlying generation service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Resets the workflow slot to idle.
    pub fn reset(&mut self) {
        self.slot.reset();
    }

    fn run<T>(
        &mut self,
        op: &'static str,
        body: impl FnOnce(&mut Self) -> Result<T, WorkflowError>,
    ) -> Result<T, WorkflowError> {
        self.slot.begin()?;
        tracing::info!(op, "workflow started");
        match body(self) {
            Ok(value) => {
                self.slot.succeed();
                tracing::info!(op, "workflow succeeded");
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(op, %error, "workflow failed");
                self.slot.fail(error.to_string());
                Err(error)
            }
        }
    }

    /// Primary edit: assemble the prompt from the user's selections, let the
    /// classifier decide whether to demand a generated background, call the
    /// service, and optionally enlarge the returned image client-side.
    pub fn primary_edit(
        &mut self,
        original: &ImagePayload,
        request: &PrimaryEdit,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        let request = request.clone();
        self.run("primary_edit", move |studio| {
            let custom = request.custom_text.trim();
            let translated = if custom.is_empty() {
                String::new()
            } else {
                translate_or_original(&studio.service, custom)
            };

            let background_empty =
                is_background_empty(&studio.codec, original, &studio.heuristics);
            let prompt = assemble_primary_prompt(
                &request.processes,
                request.style,
                &translated,
                background_empty,
            );

            let segments = studio.service.edit_image(original, &prompt, &[])?;
            let image = first_image(&segments)?;

            let upscale_selected = request.processes.contains(&Process::Upscale);
            let (message, final_image) = if upscale_selected {
                let factor = request.upscale_factor;
                (
                    format!(
                        "Upscaling ({}x) and detail enhancement complete.",
                        factor.multiplier()
                    ),
                    upscale(&studio.codec, image, factor)?,
                )
            } else {
                ("Editing complete.".to_string(), image.clone())
            };

            Ok(vec![
                GeneratedSegment::Text(message),
                GeneratedSegment::Image(final_image),
            ])
        })
    }

    /// Composites reference images onto the base image per the user's goal.
    /// Only the final image is kept alongside the service's text segments.
    pub fn synthesize(
        &mut self,
        original: &ImagePayload,
        references: &[ImagePayload],
        composition_goal: &str,
        aspect: AspectRatio,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("synthesize", move |studio| {
            let goal = translate_or_original(&studio.service, composition_goal);
            let background_empty =
                is_background_empty(&studio.codec, original, &studio.heuristics);
            let prompt = synthesis_prompt(&goal, background_empty, aspect);

            let segments = studio.service.edit_image(original, &prompt, references)?;
            let image = first_image(&segments)?.clone();

            let message = match aspect.ratio() {
                Some(ratio) => format!("Synthesis and {ratio} recomposition complete."),
                None => "Synthesis complete.".to_string(),
            };

            let mut result: Vec<GeneratedSegment> = segments
                .iter()
                .filter(|segment| segment.as_text().is_some())
                .cloned()
                .collect();
            result.push(GeneratedSegment::Text(message));
            result.push(GeneratedSegment::Image(image));
            Ok(result)
        })
    }

    /// Asks the service for a white-on-black subject mask, then cuts the
    /// background out client-side by moving the mask into the alpha channel.
    pub fn remove_background(
        &mut self,
        original: &ImagePayload,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("remove_background", move |studio| {
            let segments =
                studio
                    .service
                    .edit_image(original, REMOVE_BACKGROUND_MASK_PROMPT, &[])?;
            let mask = first_image(&segments)?;

            if !mask.is_maskable_format() {
                return Err(RemoteError::InvalidMaskFormat {
                    mime_type: mask.mime_type().to_string(),
                }
                .into());
            }

            let cut_out = apply_mask(&studio.codec, original, mask)?;
            Ok(vec![
                GeneratedSegment::Text("Background removal complete.".to_string()),
                GeneratedSegment::Image(cut_out),
            ])
        })
    }

    /// Removes the white-masked region of the original and refills it.
    pub fn inpaint(
        &mut self,
        original: &ImagePayload,
        mask: &ImagePayload,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("inpaint", move |studio| {
            let segments = studio.service.edit_image(
                original,
                INPAINT_PROMPT,
                std::slice::from_ref(mask),
            )?;
            let image = first_image(&segments)?.clone();
            Ok(vec![
                GeneratedSegment::Text("Inpainting complete.".to_string()),
                GeneratedSegment::Image(image),
            ])
        })
    }

    /// Reimagines the subject as a scrapbook collage of the same person
    /// across life stages, anchored on their stated current age.
    pub fn life_album(
        &mut self,
        original: &ImagePayload,
        current_age: &str,
        aspect: AspectRatio,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("life_album", move |studio| {
            let age = current_age.trim();
            if age.is_empty() {
                return Err(WorkflowError::EmptyPrompt);
            }
            let prompt = life_album_prompt(age, aspect);
            let segments = studio.service.edit_image(original, &prompt, &[])?;
            let image = first_image(&segments)?.clone();
            Ok(vec![
                GeneratedSegment::Text("Life album collage complete.".to_string()),
                GeneratedSegment::Image(image),
            ])
        })
    }

    /// Converts a portrait into a formal 3:4 ID photo.
    pub fn proof_photo(
        &mut self,
        original: &ImagePayload,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("proof_photo", move |studio| {
            let segments = studio.service.edit_image(original, PROOF_PHOTO_PROMPT, &[])?;
            let image = first_image(&segments)?.clone();
            Ok(vec![
                GeneratedSegment::Text("ID photo conversion complete.".to_string()),
                GeneratedSegment::Image(image),
            ])
        })
    }

    /// Renders a 2D floor plan as an isometric 3D cutaway model.
    pub fn floorplan_render(
        &mut self,
        original: &ImagePayload,
        aspect: AspectRatio,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("floorplan_render", move |studio| {
            let prompt = format!("{FLOORPLAN_PROMPT}{}", aspect.outpaint_appendix());
            let segments = studio.service.edit_image(original, &prompt, &[])?;
            let image = first_image(&segments)?.clone();
            Ok(vec![
                GeneratedSegment::Text(format!("3D floor plan render ({aspect}) complete.")),
                GeneratedSegment::Image(image),
            ])
        })
    }

    /// Redraws the subject as a single comic panel in the chosen style, with
    /// an optional caption rendered into the panel.
    pub fn comic_panel(
        &mut self,
        original: &ImagePayload,
        style: ComicStyle,
        caption: &str,
        aspect: AspectRatio,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("comic_panel", move |studio| {
            let caption = caption.trim();
            let translated = if caption.is_empty() {
                None
            } else {
                Some(translate_or_original(&studio.service, caption))
            };
            let prompt = format!(
                "{}{}",
                style.panel_prompt(translated.as_deref()),
                aspect.outpaint_appendix()
            );
            let segments = studio.service.edit_image(original, &prompt, &[])?;
            let image = first_image(&segments)?.clone();
            Ok(vec![
                GeneratedSegment::Text(format!("Comic panel ({aspect}) complete.")),
                GeneratedSegment::Image(image),
            ])
        })
    }

    /// Generates an eight-image silent visual story from a text idea. The
    /// result is the interleaved sequence as produced, image parts only.
    pub fn generate_story(
        &mut self,
        idea: &str,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("generate_story", move |studio| {
            let idea = idea.trim();
            if idea.is_empty() {
                return Err(WorkflowError::EmptyPrompt);
            }
            Ok(studio
                .service
                .generate_interleaved(&story_prompt(idea), ResponseMode::ImagesOnly)?)
        })
    }

    /// Generates an illustrated step-by-step recipe: alternating instruction
    /// text and step images, in generation order.
    pub fn generate_recipe(
        &mut self,
        dish: &str,
    ) -> Result<Vec<GeneratedSegment>, WorkflowError> {
        self.run("generate_recipe", move |studio| {
            let dish = dish.trim();
            if dish.is_empty() {
                return Err(WorkflowError::EmptyPrompt);
            }
            Ok(studio
                .service
                .generate_interleaved(&recipe_prompt(dish), ResponseMode::ImagesAndText)?)
        })
    }

    /// Generates a brand-new base image from a text idea. The idea is
    /// translated first; the image model works best with English prompts.
    pub fn generate_original(
        &mut self,
        idea: &str,
        aspect: AspectRatio,
    ) -> Result<ImagePayload, WorkflowError> {
        self.run("generate_original", move |studio| {
            let prompt = translate_or_original(&studio.service, idea);
            if prompt.is_empty() {
                return Err(WorkflowError::EmptyPrompt);
            }
            Ok(studio.service.generate_image(&prompt, aspect)?)
        })
    }

    /// Suggests a composition sentence for the loaded images. Runs outside
    /// the workflow slot; suggestions never block generation.
    pub fn suggest_composition(
        &self,
        original: &ImagePayload,
        references: &[ImagePayload],
        aspect: AspectRatio,
    ) -> Result<String, WorkflowError> {
        let background_empty = is_background_empty(&self.codec, original, &self.heuristics);
        let prompt = suggest_composition_prompt(background_empty, aspect);

        let mut images = Vec::with_capacity(1 + references.len());
        images.push(original.clone());
        images.extend_from_slice(references);
        Ok(self.service.analyze(&images, &prompt, 0.7)?)
    }

    /// Elaborates a from-scratch image idea into a richer generation prompt,
    /// steered by the chosen category template.
    pub fn suggest_original(
        &self,
        idea: &str,
        category: IdeaCategory,
    ) -> Result<String, WorkflowError> {
        let prompt = suggest_original_prompt(idea.trim(), category);
        Ok(self.service.analyze(&[], &prompt, 0.8)?)
    }

    /// Suggests a story idea tellable in eight silent images of the loaded
    /// image.
    pub fn suggest_story(&self, original: &ImagePayload) -> Result<String, WorkflowError> {
        Ok(self
            .service
            .analyze(std::slice::from_ref(original), SUGGEST_STORY_PROMPT, 0.8)?)
    }

    /// Names the dish shown in a food photograph, for seeding the recipe
    /// workflow. Low temperature: identification, not invention.
    pub fn suggest_recipe(&self, original: &ImagePayload) -> Result<String, WorkflowError> {
        Ok(self
            .service
            .analyze(std::slice::from_ref(original), SUGGEST_RECIPE_PROMPT, 0.2)?)
    }

    /// Suggests a full edit prompt from the user's current selections.
    pub fn suggest_primary(
        &self,
        original: &ImagePayload,
        process_labels: &[&str],
        style_label: Option<&str>,
        custom_text: &str,
    ) -> Result<String, WorkflowError> {
        let background_empty = is_background_empty(&self.codec, original, &self.heuristics);
        let prompt =
            suggest_primary_prompt(process_labels, style_label, custom_text, background_empty);
        Ok(self
            .service
            .analyze(std::slice::from_ref(original), &prompt, 0.8)?)
    }
}

fn first_image(segments: &[GeneratedSegment]) -> Result<&ImagePayload, WorkflowError> {
    segments
        .iter()
        .find_map(GeneratedSegment::as_image)
        .ok_or_else(|| WorkflowError::NoImageProduced {
            detail: segments
                .iter()
                .find_map(GeneratedSegment::as_text)
                .map(str::to_string),
        })
}
