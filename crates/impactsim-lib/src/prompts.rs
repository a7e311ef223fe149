//! Prompts sent to the generative provider.

use crate::error::{Error, Result};
use crate::upstream::{ChatMessage, ChatRequest};

/// Token budget for narrative completions.
pub const NARRATIVE_MAX_TOKENS: u32 = 350;

/// Output size requested for edited images.
pub const EDIT_IMAGE_SIZE: &str = "1024x1024";

const NARRATIVE_INSTRUCTIONS: &str = "\
You will write the most realistic scenario possible for the aftermath of a meteorite impact on planet Earth. \
You will be given the radius of the blast caused by the impact, a location as longitude and latitude, and the time elapsed since the impact. \
From that data, describe the consequences of the impact at the given moment: how it affects the terrain, civilisation, the environment and the geopolitical situation at that point in time. \
Do not speak in generalities. Build the answer around the given location and focus on the affected zone, naming specific cities and areas that are affected. \
It is extremely important that you never mention the coordinates, nor the words \"latitude\" or \"longitude\". \
If more than 0 years have passed, describe how these factors are recovering in the affected region. \
Weave these themes into the narrative without naming them; in particular never write \"geopolitics\" or \"environmental situation\" directly. \
Write as a third-person omniscient narrator.";

const IMPACT_EDIT_PROMPT: &str = "\
Modify a satellite image of Earth. Focus only on the center: \
- If the center shows land, replace it with a realistic sinkhole or crater, deep and irregular, with cracks, shadows, displaced soil, and natural color variations, blending seamlessly with the surrounding terrain. \
- If the center shows water, replace it with strong turbulent waves, with foam, ripples, and light reflections, contrasting with calmer water around. \
Keep the overall image looking like an authentic satellite photo, with natural Earth tones, realistic lighting, consistent resolution, and no alterations outside the central area.";

const RECOVERY_EDIT_PROMPT: &str = "\
Create a realistic satellite image showing the same location one year after a meteorite impact. \
The scene must depict visible post-impact changes: a large eroded crater with softened edges, scattered debris, altered terrain textures, and signs of vegetation regrowth or sediment accumulation. \
If the area was water, show disturbed coastlines, sediment plumes, and partial flooding around the impact site. \
Maintain the appearance of an authentic satellite photograph with natural Earth tones, accurate lighting, and seamless blending with the surroundings, as if captured by a real Earth observation satellite.";

/// Build the chat request that narrates the aftermath of an impact.
pub fn narrative_request(
    model: &str,
    longitude: f64,
    latitude: f64,
    radius_km: f64,
    years: u32,
) -> ChatRequest {
    let user = format!(
        "A meteorite has fallen at longitude: {}, latitude: {}, with an impact radius of {} km. \
         Describe the situation {} years after the impact.",
        longitude, latitude, radius_km, years
    );

    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(NARRATIVE_INSTRUCTIONS),
            ChatMessage::user(user),
        ],
        max_tokens: NARRATIVE_MAX_TOKENS,
    }
}

/// Edit prompt for an image `years` after the impact.
///
/// Only the impact moment (0) and the one-year recovery (1) have prompts;
/// other values are rejected rather than submitted without instructions.
pub fn edit_prompt_for_years(years: u32) -> Result<&'static str> {
    match years {
        0 => Ok(IMPACT_EDIT_PROMPT),
        1 => Ok(RECOVERY_EDIT_PROMPT),
        other => Err(Error::validation(format!(
            "image edits support 0 or 1 years after impact, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::ChatRole;

    #[test]
    fn narrative_embeds_parameters_in_user_message() {
        let request = narrative_request("gpt-test", -3.7, 40.4, 12.5, 10);
        assert_eq!(request.model, "gpt-test");
        assert_eq!(request.max_tokens, 350);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::System);

        let user = &request.messages[1];
        assert_eq!(user.role, ChatRole::User);
        assert!(user.content.contains("-3.7"));
        assert!(user.content.contains("40.4"));
        assert!(user.content.contains("12.5 km"));
        assert!(user.content.contains("10 years"));
    }

    #[test]
    fn instructions_constrain_the_narration() {
        let system = &narrative_request("m", 0.0, 0.0, 1.0, 0).messages[0].content;
        assert!(system.contains("third-person omniscient"));
        assert!(system.contains("never mention the coordinates"));
        assert!(system.contains("recovering"));
    }

    #[test]
    fn edit_prompts_cover_impact_and_first_year() {
        assert!(edit_prompt_for_years(0).unwrap().contains("crater"));
        assert!(edit_prompt_for_years(1).unwrap().contains("one year after"));
    }

    #[test]
    fn other_years_are_rejected() {
        let err = edit_prompt_for_years(2).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
