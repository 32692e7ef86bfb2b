use crate::models::RemarkRequest;

/// Exact error string the model is told to return when it sees a person instead of a snack.
pub const FACE_DETECTED: &str = "Aalalla, snack alla! Mone, ithu snack alla, oru manushyananu! LOL";

pub fn dimensions_prompt() -> String {
    format!(
        r#"You are a snack geometry expert. Your primary goal is to analyze the provided image to identify a snack and measure its dimensions.

Important first step: before any analysis, check if the image contains a human face.
- If you detect a human face, stop all other analysis. Set 'snackType' to 'unknown' and 'error' to the exact string: "{FACE_DETECTED}". Do not measure anything.

If there is no human face, identify the snack. It can only be one of three types: 'parippuvada' (a circular lentil fritter), 'vazhaikkapam' (an elliptical banana fritter) or 'samoosa' (a triangular pastry).
- 'parippuvada': measure its diameter in centimeters. All other dimension fields must be null.
- 'vazhaikkapam': 'length' is the longest straight-line distance from end to end, 'width' is the widest point perpendicular to the length, 'inclination' is the angle of the length axis from horizontal in degrees (-90 to 90). All other dimension fields must be null.
- 'samoosa': measure its three sides (sideA, sideB, sideC) in centimeters. All other dimension fields must be null.
- Anything else: set 'snackType' to 'unknown' and every dimension field to null.

Assume a standard-sized plate or background to estimate real-world dimensions. A typical parippuvada is 8-13 cm across, a typical vazhaikkapam is 10-16 cm long and a typical samoosa has sides of 6-8 cm."#
    )
}

pub fn remark_prompt(request: &RemarkRequest) -> String {
    let snack = request.snack_type;
    let mode = request.mode;
    let unit = mode.unit();
    let new_metric = request.new_metric;
    let previous_metric = request.previous_metric;

    format!(
        r#"You are a friendly Keralite snack enthusiast with a great sense of humor. Write one short, witty, encouraging comment in Manglish comparing a new snack to the previous record holder.

Context:
- Snack type: {snack}
- New snack's {mode}: {new_metric:.2} {unit}
- Previous largest snack's {mode}: {previous_metric:.2} {unit}

Rules:
- If the new snack is bigger than the previous largest, celebrate and exaggerate a little.
- If it is smaller, tease playfully.
- If the previous largest is 0 there was no earlier snack, so welcome it to the competition.

Tone examples:
- "My goodness! Look at the size of this {snack}! You've beaten the record! Kollam!"
- "Aalae pattikunno? Ithu cheriya oru kadi aayipoyi. Next time valuthu nokkam!"
- "Aha! Oru puthiya {snack}! The competition begins!""#
    )
}
