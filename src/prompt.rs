//! Prompt catalogs and assembly.
//!
//! The style and process catalogs are static configuration: a human-readable
//! label mapped to an opaque instruction string. Nothing here interprets the
//! instruction text; assembly is pure string concatenation.

use std::fmt;

use itertools::Itertools;

/// One entry of the style catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    /// Button label shown to the user.
    pub label: &'static str,
    /// Instruction text sent verbatim to the generation service.
    pub instruction: &'static str,
}

/// Style catalog, loaded once at startup.
pub const STYLE_PRESETS: &[StylePreset] = &[
    StylePreset {
        label: "Figure",
        instruction: "Recreate the entire scene as a photograph of a detailed plastic toy figure diorama.",
    },
    StylePreset {
        label: "Diorama",
        instruction: "Recreate the entire scene as a hyper-realistic, handcrafted diorama.",
    },
    StylePreset {
        label: "Miniature",
        instruction: "Recreate the entire scene as a miniature tilt-shift style photograph, making it look like a tiny model world.",
    },
    StylePreset {
        label: "Pixel art",
        instruction: "Convert the entire image into a detailed 16-bit pixel art style, preserving the composition.",
    },
    StylePreset {
        label: "Felt doll",
        instruction: "Recreate the entire scene and its subjects as if they were made from felted wool in a doll diorama.",
    },
    StylePreset {
        label: "Claymation",
        instruction: "Recreate the entire scene as a high-quality stop-motion claymation still.",
    },
    StylePreset {
        label: "Paper art",
        instruction: "Recreate the entire image as an intricate, multi-layered paper art craft scene.",
    },
    StylePreset {
        label: "Sticker",
        instruction: "Create a die-cut sticker of the main subject from the image. The sticker should have a thick white vinyl border and a slight glossy effect. The art style should be simplified and cute. The background MUST be solid white.",
    },
    StylePreset {
        label: "Logo",
        instruction: "Transform the primary subject of the image into a modern, minimalist vector logo. The design must be simple, clean, and iconic, suitable for branding. Use a limited color palette. The final logo must be centered on a solid white background.",
    },
    StylePreset {
        label: "Minimalist",
        instruction: "Recreate the entire image in an extreme minimalist art style. Use a very limited and muted color palette, simple geometric shapes, and a significant amount of negative space to represent the scene.",
    },
    StylePreset {
        label: "Stained glass",
        instruction: "Recreate the entire scene as a vibrant stained glass window with thick black lead lines.",
    },
    StylePreset {
        label: "Embroidery",
        instruction: "Transform the entire image into a detailed embroidery piece, emphasizing the texture of the thread and fabric.",
    },
    StylePreset {
        label: "Blueprint",
        instruction: "Convert the entire scene into a classic blueprint-style technical drawing on blue paper with white lines.",
    },
    StylePreset {
        label: "Mosaic",
        instruction: "Recreate the entire scene as a detailed mosaic made of small, colorful ceramic tiles.",
    },
    StylePreset {
        label: "Voxel art",
        instruction: "Transform the entire image into a 3D voxel art style, as if built from colorful cubes.",
    },
    StylePreset {
        label: "Oil painting",
        instruction: "Recreate the entire scene as a classical oil painting with rich textures and visible brushstrokes.",
    },
    StylePreset {
        label: "Pencil sketch",
        instruction: "Convert the entire image into a detailed, hand-drawn pencil sketch on textured paper.",
    },
    StylePreset {
        label: "Neon sign",
        instruction: "Transform the main subjects of the image into glowing neon signs against a dark brick wall background.",
    },
    StylePreset {
        label: "Ink wash",
        instruction: "Recreate the entire scene in the style of traditional Korean ink wash painting, emphasizing minimalist composition and expressive brushstrokes on Hanji paper.",
    },
];

/// Looks up a style preset by its label.
pub fn style_by_label(label: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS.iter().find(|preset| preset.label == label)
}

/// Pre-processing operations a user can stack onto a primary edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    /// Repair scratches, noise and other damage.
    Restore,
    /// Colorize a black-and-white photograph.
    Colorize,
    /// Colorize a sketch or line drawing.
    ColorizeSketch,
    /// Redraw at higher detail, then enlarge client-side.
    Upscale,
}

impl Process {
    /// The instruction text for this process.
    ///
    /// `Upscale` has no static instruction: it is expanded dynamically into
    /// [`UPSCALE_DETAIL_INSTRUCTION`] plus a client-side resample after the
    /// service responds.
    pub const fn instruction(self) -> Option<&'static str> {
        match self {
            Self::Restore => {
                Some("Restore this image to high quality, fixing any scratches, noise or imperfections.")
            }
            Self::Colorize => {
                Some("Colorize this black and white image with realistic and vibrant colors.")
            }
            Self::ColorizeSketch => Some(
                "Colorize this sketch or line drawing with vibrant and fitting colors, bringing it to life as a full-color illustration.",
            ),
            Self::Upscale => None,
        }
    }
}

/// Requested output aspect ratio. Purely a prompt modifier: the remote
/// service interprets it, nothing here resizes pixels to enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// 1:1
    Square,
    /// 16:9
    Wide,
    /// 9:16
    Tall,
    /// 4:3
    Classic,
    /// 3:4
    ClassicPortrait,
    /// Keep the source framing; no recomposition requested.
    #[default]
    Original,
}

impl AspectRatio {
    /// The `w:h` ratio string, or `None` for [`AspectRatio::Original`].
    pub const fn ratio(self) -> Option<&'static str> {
        match self {
            Self::Square => Some("1:1"),
            Self::Wide => Some("16:9"),
            Self::Tall => Some("9:16"),
            Self::Classic => Some("4:3"),
            Self::ClassicPortrait => Some("3:4"),
            Self::Original => None,
        }
    }

    /// Outpainting appendix commanding the service to expand the scene to
    /// this ratio without cropping. Empty for `Original`.
    pub fn outpaint_appendix(self) -> String {
        let Some(ratio) = self.ratio() else {
            return String::new();
        };
        format!(
            "\n[ABSOLUTE COMMAND: ASPECT RATIO & SCENE EXPANSION]\n\
             - Target Aspect Ratio: {ratio}\n\
             - Your primary task is to generate the final image directly in this target aspect ratio.\n\
             - You are strictly forbidden from cropping the original image's main subject.\n\
             - To achieve the new aspect ratio, you MUST creatively expand the scene (outpainting). \
             If the target is wider, you must invent and seamlessly paint new details to the left and right. \
             If it's taller, invent and paint new details above and below.\n\
             - The final image must contain the ENTIRE original scene, plus the new, expanded areas. \
             Any cropping of the original content is a complete failure of this task."
        )
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ratio().unwrap_or("original"))
    }
}

/// Prepended when the upscale process is selected, before the client-side
/// resample is applied to the returned image.
pub const UPSCALE_DETAIL_INSTRUCTION: &str = "Dramatically enhance the sharpness, resolution, and all fine details of this image. Redraw it with extreme clarity, making every texture crisp as if it were shot with a professional, super-high-resolution camera.";

/// Prepended when the background classifier reports an empty canvas and a
/// style is selected.
pub const EMPTY_BACKGROUND_INSTRUCTION: &str = "[SPECIAL INSTRUCTION] The original image has a transparent or solid-color background. You MUST create a new, complete, and natural-looking background that is contextually appropriate for the chosen style and subject. The final image must be a fully realized scene.";

/// Asks the service for a white-on-black alpha mask of the main subject.
pub const REMOVE_BACKGROUND_MASK_PROMPT: &str = "Your task is to create a high-quality alpha mask. The main subject of the image must be white, and the background must be black. Use shades of gray on the edges of the subject for smooth, anti-aliased blending, especially for details like hair. The output must be only the black and white mask itself.";

/// Inpainting instruction: original image first, mask second, white marks
/// the region to remove and refill.
pub const INPAINT_PROMPT: &str = "You are an expert image inpainting model. You will receive two images followed by this text prompt. 1. The first image is the original image. 2. The second image is a mask. The white area in this mask indicates the region that needs to be removed and realistically filled. Your task is to remove the content within the white masked area from the first image and intelligently fill it in so it blends seamlessly with the surrounding pixels. Output only the final, single, inpainted image.";

/// Converts a portrait into a formal 3:4 ID photo.
pub const PROOF_PHOTO_PROMPT: &str = "[TASK] Convert the provided photograph into a professional, Korean-style ID photo.\n\n\
[STRICT INSTRUCTIONS]\n\
1.  **Identity Preservation (Top Priority)**: The facial features MUST be identical to the original.\n\
2.  **Mandatory Wardrobe Change**: The subject's clothing MUST be changed to a formal business suit.\n\
3.  **Background**: The background MUST be a solid, pure white color (#FFFFFF).\n\
4.  **Pose & Gaze**: The subject MUST face directly forward, looking at the camera.\n\
5.  **Lighting**: Apply soft, even studio lighting typical of professional portraiture, such as butterfly lighting, to create a flattering look.\n\
6.  **Framing (CRITICAL)**: The final output image MUST be generated with a perfect 3:4 aspect ratio. The composition must be a standard upper-body ID photo shot. DO NOT leave extra space; the subject must fill the 3:4 frame correctly.";

/// Converts a 2D floor plan into an isometric 3D render. The aspect-ratio
/// appendix is applied by the caller.
pub const FLOORPLAN_PROMPT: &str = "[MISSION] Convert the provided 2D floor plan into a photorealistic 3D model.\n\n\
[ABSOLUTE CAMERA RULE] You must replicate the following camera perspective precisely:\n\
Imagine you are looking at a dollhouse from an upper corner.\n\n\
[DETAILED VIEW SPECIFICATIONS]\n\
1.  **Perspective**: A 3D isometric view. DO NOT create a flat top-down image.\n\
2.  **Camera Angle**: A high-angle (bird's-eye view) tilted at approximately 45 degrees.\n\
3.  **Composition**: Use a 'cutaway' style where the front and side walls are removed so the entire interior layout (rooms, furniture, pathways) is clearly visible. The camera should be positioned outside one of the corners.\n\
4.  **Style**: The final image must be a high-quality, photorealistic 3D render.\n\
5.  **Details**: Populate the space with modern furniture, realistic textures (wood floors, tiles), and natural lighting with soft shadows.\n\
6.  **Background**: The area outside the rendered model should be a clean, solid white background.";

/// Asks the service for a story idea tellable in eight silent images.
pub const SUGGEST_STORY_PROMPT: &str = "[YOUR MISSION]\n\
Analyze the provided image and generate a creative and concise story idea that could be told in 8 silent images. The story should have a clear beginning, middle, and a compelling end.\n\n\
[OUTPUT FORMAT]\n\
- **Response Format**: Do NOT include any extra explanations. The response must be ONLY the generated story idea sentence.";

/// Asks the service to name the dish shown in a food photograph.
pub const SUGGEST_RECIPE_PROMPT: &str = "[YOUR MISSION]\n\
Analyze the provided image of a food dish. Identify the name of the dish as specifically as possible.\n\n\
[OUTPUT FORMAT]\n\
- **Response Format**: Do NOT include any extra explanations (like \"The dish in the image is...\"). The response must be ONLY the name of the dish.\n\
- **Example**: If the image is of macarons, the output should be \"macarons\".";

/// Visual style for a single comic panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComicStyle {
    /// High-contrast black and white ink.
    Noir,
    /// Clean modern Korean webtoon line art.
    Webtoon,
    /// 1980s American superhero comic with Ben-Day dots.
    American,
}

impl ComicStyle {
    /// The panel instruction for this style. When a caption is given, the
    /// panel must render it verbatim; otherwise any text is forbidden.
    pub fn panel_prompt(self, caption: Option<&str>) -> String {
        let text_rule = match caption {
            Some(text) => format!(
                "{} must contain the following text: \"{text}\". The text must be rendered exactly as written.",
                match self {
                    Self::Noir => "A caption box at the top of the panel",
                    Self::Webtoon => "A speech bubble or caption, styled appropriately for a webtoon,",
                    Self::American => "A caption box with a yellow background, typical of the era,",
                }
            ),
            None => "The panel must NOT contain any text, speech bubbles, or captions.".to_string(),
        };
        match self {
            Self::Noir => format!(
                "A single comic book panel in a gritty, noir art style, using high-contrast black and white ink. \
                 The scene should be a dramatic re-imagining of the provided image's subject and pose. {text_rule} \
                 The lighting must be harsh and dramatic, with deep shadows, to create a moody and somber atmosphere."
            ),
            Self::Webtoon => format!(
                "A single panel in a clean, modern Korean webtoon style. The art should feature crisp digital line art, \
                 vibrant cell shading, and expressive characters based on the provided image. {text_rule} \
                 The overall mood should be bright and engaging."
            ),
            Self::American => format!(
                "A single panel in the style of a classic American superhero comic book from the 1980s. \
                 The art must have bold inks and use Ben-Day dot patterns for color. The composition must be \
                 dynamic and action-oriented, based on the provided image. {text_rule}"
            ),
        }
    }
}

/// Builds the life-album collage instruction: a scrapbook of the same person
/// across life stages, anchored on the subject's current age.
pub fn life_album_prompt(current_age: &str, aspect: AspectRatio) -> String {
    format!(
        "[TOP PRIORITY MISSION]\n\
         Your absolute top priority is to create a life album of the *exact person* in the provided original image. \
         Maintaining facial likeness overrides every other artistic requirement. Every generated face must be \
         unmistakably recognizable as the person in the original photo at a different age. If facial consistency \
         is lost, the entire generation has failed.\n\n\
         [OUTPUT DETAILS]\n\
         - **Overall format**: a scrapbook-style collage at a {aspect} ratio.\n\
         - **Photos to include**:\n\
           1. **Present day (age {current_age})**: keep the person from the original photo as-is, but replace only the background with a completely new, beautiful scene.\n\
           2. **Other points in life**: the same person as an infant, a child, a high schooler, a college student, in their 30s, 50s, and 70s.\n\
         - **Most important rule (MUST be followed)**:\n\
           - **Absolute facial consistency**: the facial features (eyes, nose, mouth, face shape) in every photo must clearly be the same person as the original. They must never look like someone else.\n\
         - **Style guide**:\n\
           - **Layout**: arrange the photos irregularly but aesthetically.\n\
           - **Photo frames**: give each photo a distinct frame, such as a polaroid or a vintage frame.\n\
           - **No labels**: do not add any text or labels indicating age or time period to any photo."
    )
}

/// Builds the eight-image silent-story instruction around the user's idea.
pub fn story_prompt(idea: &str) -> String {
    format!(
        "[SYSTEM COMMAND: VISUAL STORY GENERATION]\n\
         - **Task**: Create a sequence of exactly 8 images that tell a complete, silent story based on the user's idea.\n\
         - **Absolute Rule**: The images MUST NOT contain any text, words, captions, or speech bubbles. The storytelling must be purely visual.\n\
         - **Output Format**: Your entire response MUST consist of only the 8 generated image parts.\n\
         [USER'S STORY IDEA]\n\
         \"{idea}\""
    )
}

/// Builds the illustrated step-by-step recipe instruction for a dish.
pub fn recipe_prompt(dish: &str) -> String {
    format!(
        "[SYSTEM COMMAND: ILLUSTRATED RECIPE GENERATION - STRICT ENFORCEMENT]\n\n\
         [ABSOLUTE, NON-NEGOTIABLE CORE MISSION]\n\
         Your task is to generate a **complete, unabridged, step-by-step recipe** for the user's requested dish, from the very first ingredient preparation to the final plated dish.\n\n\
         [UNBREAKABLE RULES]\n\
         1.  **FORMAT**: The recipe MUST be a strict sequence of TEXT-IMAGE PAIRS. For EVERY single text instruction, you MUST IMMEDIATELY follow it with a corresponding generated image that visually represents that exact step.\n\
         2.  **COMPLETENESS**: The recipe MUST be **fully comprehensive**. It must guide the user from the very first step (e.g., \"Prepare the ingredients: ...\") to the final, finished dish, ready to be served. It must not be a summary or a partial recipe. All necessary steps must be included.\n\
         3.  **IMAGE CONTENT (CRITICAL)**: The generated images MUST be **purely visual**. They MUST NOT contain any text, letters, numbers, step indicators, watermarks, or any other overlays. The image should only show the food and the action of that step.\n\n\
         [FAILURE CONDITION]\n\
         A response is considered a COMPLETE FAILURE if:\n\
         -   A text step is provided WITHOUT an image immediately following it.\n\
         -   The recipe is incomplete or just a summary.\n\
         -   The total number of text parts does not EXACTLY match the total number of image parts.\n\
         -   Any of the generated images contain text.\n\n\
         [OUTPUT STRUCTURE - YOU MUST FOLLOW THIS]\n\
         Your entire response must be an interleaved sequence of text parts and image parts.\n\n\
         1.  **Part 1 (Text):** \"Step 1: [step description]\"\n\
         2.  **Part 2 (Image):** [A purely visual, text-free generated image for Step 1]\n\
         3.  **Part 3 (Text):** \"Step 2: [step description]\"\n\
         4.  **Part 4 (Image):** [A purely visual, text-free generated image for Step 2]\n\
         ...and so on until the dish is complete.\n\n\
         [USER'S REQUESTED DISH]\n\
         \"{dish}\"\n\n\
         Now, begin generating the complete recipe, strictly adhering to the TEXT-IMAGE PAIR format and all content requirements, ensuring all images are text-free."
    )
}

/// Category steering the from-scratch idea elaboration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdeaCategory {
    /// Free-form elaboration with no template.
    #[default]
    Default,
    /// Professional photography template.
    Realistic,
    /// Die-cut sticker design template.
    Sticker,
    /// Branding / logo design template.
    Logo,
    /// Negative-space minimalist template.
    Minimalist,
    /// Food photography template.
    Food,
    /// Architectural photography template.
    Architecture,
    /// Epic fantasy digital painting template.
    Fantasy,
    /// Flat vector illustration template.
    Vector,
    /// Watercolor painting template.
    Watercolor,
    /// Photorealistic 3D render template.
    ThreeD,
}

impl IdeaCategory {
    const fn mission(self) -> &'static str {
        match self {
            Self::Default => "[MISSION]\nYou are a creative prompt generation expert. Given a user's simple idea, you must write a detailed and creative prompt that an AI image generation model (like Imagen) can easily understand to produce a rich result.",
            Self::Realistic => "[MISSION]\nYou are a world-class photographer and prompt engineer. Given a user's simple idea, you must generate a highly detailed and professional photography prompt, following the 'Realistic Photo Template' structure below. Describe every element specifically to paint a complete scene.\n\n[REALISTIC PHOTO TEMPLATE]\nA realistic [Shot Type] of [Subject], [Action or Expression], in [Environment]. The scene is lit with [Lighting Description], creating a [Mood/Atmosphere]. Shot on a [Camera/Lens Details], highlighting [Key Textures and Details].",
            Self::Sticker => "[MISSION]\nYou are a professional sticker designer. Based on the user's idea, create a cute and original sticker design prompt, following the 'Sticker Design Template' below.\n\n[STICKER DESIGN TEMPLATE]\nA [Style] sticker of [Subject], featuring [Key Features] and a [Color Palette]. The design should have [Line Style] and [Shading Style]. The background should be white.",
            Self::Logo => "[MISSION]\nYou are a branding expert and logo designer. Based on the user's idea, create a modern and sleek logo design prompt, following the 'Logo Design Template' below. You must clearly instruct the text rendering.\n\n[LOGO DESIGN TEMPLATE]\nCreate a [Image Type] for [Brand/Concept]. The text \"[[Text to Render]]\" should be displayed in a [Font Style]. The design should be [Style Description], using a [Color Scheme].",
            Self::Minimalist => "[MISSION]\nYou are a minimalist design expert. Based on the user's idea, generate a sleek minimalist design prompt that makes strong use of negative space.\n\n[MINIMALIST DESIGN TEMPLATE]\nA minimalist composition with a single [Subject] placed in the [bottom right/top left/etc.] of the frame. The background is a vast, empty [Color] canvas, creating significant negative space. Soft, subtle lighting.",
            Self::Food => "[MISSION]\nYou are a top food photographer. Based on the user's idea, generate a mouth-watering, highly detailed food photography prompt.\n\n[FOOD PHOTO TEMPLATE]\nDramatic close-up shot of [Food], [Cooked State]. Placed in [Setting/Plating], with [Specific Ingredient] emphasized. Lit with [Lighting Style] to accentuate [Texture]. Shot on a professional DSLR, macro lens.",
            Self::Architecture => "[MISSION]\nYou are a renowned architectural photographer. Based on the user's idea, generate a grand and inspiring architectural photography prompt.\n\n[ARCHITECTURAL PHOTO TEMPLATE]\nDramatic wide-angle shot of a [Building Type] at [Time of Day], in a [Architectural Style] style. Located in [Environment]. [Key Architectural Element] is highlighted under [Lighting Conditions]. Shot on a professional camera, wide-angle lens, long exposure.",
            Self::Fantasy => "[MISSION]\nYou are a digital fantasy artist. Based on the user's idea, generate an epic and imaginative fantasy art prompt.\n\n[FANTASY ART TEMPLATE]\nAn epic digital painting of [Subject], in a [Mood/Atmosphere] mood. They are [Key Action] against a backdrop of [Background]. Featuring a [Color Palette] and [Magical Effects]. Highly detailed, cinematic, trending on ArtStation.",
            Self::Vector => "[MISSION]\nYou are a professional vector illustrator. Based on the user's idea, generate a clean and modern flat vector illustration prompt.\n\n[VECTOR ILLUSTRATION TEMPLATE]\nA flat vector illustration of [Subject], [Style]. Using [Key Features] and a limited [Color Palette]. Clean lines, geometric shapes, no shadows. Adobe Illustrator style.",
            Self::Watercolor => "[MISSION]\nYou are a watercolor artist. Based on the user's idea, generate a soft and emotional watercolor painting prompt.\n\n[WATERCOLOR TEMPLATE]\nA delicate watercolor painting of [Subject], [Style]. Soft [Colors] bleed onto the paper. Wet-on-wet technique, loose and expressive brushstrokes. Textured watercolor paper background.",
            Self::ThreeD => "[MISSION]\nYou are a 3D rendering artist. Based on the user's idea, generate a realistic and detailed 3D render prompt.\n\n[3D RENDER TEMPLATE]\nA realistic 3D render of [Subject], [Style]. Featuring [Materials] and [Textures]. Rendered under [Lighting Setup]. Octane render, Cinema 4D, highly detailed and photorealistic.",
        }
    }
}

/// Builds the category-templated elaboration prompt for a from-scratch image
/// idea.
pub fn suggest_original_prompt(idea: &str, category: IdeaCategory) -> String {
    format!(
        "{mission}\n\n\
         [USER IDEA]\n\
         \"{idea}\"\n\n\
         [OUTPUT FORMAT]\n\
         - **Style**: Use vivid, specific descriptions to paint a visually rich scene.\n\
         - **Response Format**: Do NOT include any extra explanations (like \"Of course, here is a suggestion:\"). The response must be only the generated prompt sentence, ready for the user to copy and use.",
        mission = category.mission(),
    )
}

/// Assembles the primary-edit prompt from the user's selections.
///
/// Order matters: the upscale detail instruction leads when selected, then
/// process instructions, the style instruction, and finally the (already
/// translated) custom request. Empty parts are dropped; when the background
/// is empty and a style is chosen the background-generation block is
/// prepended to the whole prompt.
pub fn assemble_primary_prompt(
    processes: &[Process],
    style: Option<&StylePreset>,
    custom_text: &str,
    background_empty: bool,
) -> String {
    let upscale_selected = processes.contains(&Process::Upscale);

    let leading = upscale_selected.then_some(UPSCALE_DETAIL_INSTRUCTION);
    let prompt = leading
        .into_iter()
        .chain(processes.iter().filter_map(|process| process.instruction()))
        .chain(style.map(|preset| preset.instruction))
        .chain((!custom_text.is_empty()).then_some(custom_text))
        .join(". ");

    if background_empty && style.is_some() {
        format!("{EMPTY_BACKGROUND_INSTRUCTION}\n\n{prompt}")
    } else {
        prompt
    }
}

/// Builds the synthesis instruction block around the user's (translated)
/// composition goal.
pub fn synthesis_prompt(goal: &str, background_empty: bool, aspect: AspectRatio) -> String {
    let background_instruction = if background_empty {
        "4.  **BACKGROUND GENERATION (MANDATORY)**: The BASE image has no background. You MUST create a new, photorealistic, and contextually appropriate background that seamlessly integrates with the synthesized subject. The final image must be a complete scene."
    } else {
        "4.  **BACKGROUND INTEGRATION**: The BASE image has an existing background. You must seamlessly blend the synthesized subject with the existing background, ensuring consistent lighting, shadows, and perspective."
    };

    let mut prompt = format!(
        "[CORE MISSION: High-Fidelity Character Synthesis]\n\n\
         [ABSOLUTE RULE #1: FACIAL IDENTITY LOCK]\n\
         Your most critical, non-negotiable mission is to perfectly preserve the facial identity of the person in the BASE image. \
         The final output's face MUST be a 1:1 match to the BASE image's face. Do NOT alter facial structure, features, or unique characteristics. \
         This rule overrides all other artistic instructions. Any change to the face is a complete failure.\n\n\
         [TASK INSTRUCTIONS]\n\
         1.  **ANALYZE INPUTS**: You have a BASE image (the primary subject) and one or more SOURCE images (containing elements to add).\n\
         2.  **EXECUTE USER GOAL**: The user's instruction is: \"{goal}\".\n\
         3.  **SYNTHESIZE**: Create a SINGLE new image by applying the user's goal to the BASE image.\n\
         {background_instruction}\n\
         5.  **OUTPUT**: Your response MUST be ONLY the single, final, synthesized image. Do not return multiple images or text."
    );
    prompt.push_str(&aspect.outpaint_appendix());
    prompt
}

/// Prompt asking the service to suggest a composition sentence for the
/// loaded images, honoring the background status and target ratio.
pub fn suggest_composition_prompt(background_empty: bool, aspect: AspectRatio) -> String {
    let status = if background_empty {
        "NO_BACKGROUND"
    } else {
        "HAS_BACKGROUND"
    };
    let ratio_rule = match aspect.ratio() {
        Some(ratio) => format!(
            "3.  **Aspect Ratio (MANDATORY)**: End the sentence with a phrase commanding the AI to expand the scene to a {ratio} ratio without cropping.\n"
        ),
        None => String::new(),
    };
    format!(
        "[YOUR MISSION]\n\
         Generate ONE creative sentence suggesting how to combine the provided images.\n\n\
         [BACKGROUND CONTEXT]\n\
         - Background Status: {status}. Your entire response depends on it.\n\n\
         [STEP-BY-STEP INSTRUCTIONS]\n\
         1.  **The Action**: First, describe the core action of combining the images.\n\
         2.  **The Background (MANDATORY)**: If the status is NO_BACKGROUND, invent a new, interesting background that fits the action. \
         If the status is HAS_BACKGROUND, suggest transforming the existing background into a cohesive new scene; do NOT just say \"blend it\".\n\
         {ratio_rule}\n\
         [OUTPUT FORMAT]\n\
         The response must be ONLY the single suggested sentence, with no explanations."
    )
}

/// Prompt asking the service to rewrite the user's selections into one
/// masterful edit prompt.
pub fn suggest_primary_prompt(
    process_labels: &[&str],
    style_label: Option<&str>,
    custom_text: &str,
    background_empty: bool,
) -> String {
    let status = if background_empty {
        "The original image has a transparent or meaningless solid-color background."
    } else {
        "The original image has a meaningful background."
    };
    let processes = if process_labels.is_empty() {
        "None".to_string()
    } else {
        process_labels.iter().map(|label| format!("\"{label}\"")).join(", ")
    };
    format!(
        "[SYSTEM ROLE]\n\
         You are a world-class visual concept artist and prompt engineer. Analyze the user's original image and their selections, \
         then write a new, masterful edit prompt that completely reimagines the original image, preserving its core concept but \
         transforming it into the chosen style.\n\n\
         [CONTEXT]\n\
         - Background Status: {status}\n\n\
         [USER SELECTIONS]\n\
         1.  **Style**: {style}\n\
         2.  **Processes**: [{processes}]\n\
         3.  **Additional Request**: \"{custom}\"\n\n\
         [RULES]\n\
         1.  The prompt MUST start with a clear conversion command, elaborating the style label into a descriptive style name.\n\
         2.  If the background is empty, the prompt MUST invent a natural background suited to the style; otherwise it must transform \
         the existing background along with the subject.\n\
         3.  Describe the scene as if painting it from scratch in the target style; use the original only as a compositional reference.\n\
         4.  Return ONLY the generated prompt text, with no explanations, prefixes, or markdown.",
        style = style_label.unwrap_or("None"),
        custom = if custom_text.is_empty() { "None" } else { custom_text },
    )
}
