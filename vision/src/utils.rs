use serde_json::{Value, json};

use crate::image::ImagePayload;

pub fn build_dimensions_payload(prompt: &str, image: &ImagePayload) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "text": prompt },
                { "inlineData": { "mimeType": image.mime_type, "data": image.data } }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": dimensions_schema()
        }
    })
}

pub fn build_remark_payload(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "comment": {
                        "type": "STRING",
                        "description": "The generated comment in a friendly, witty, Manglish style."
                    }
                },
                "required": ["comment"]
            }
        }
    })
}

fn dimensions_schema() -> Value {
    let centimetres = |description: &str| {
        json!({ "type": "NUMBER", "nullable": true, "description": description })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "snackType": {
                "type": "STRING",
                "enum": ["parippuvada", "vazhaikkapam", "samoosa", "unknown"],
                "description": "The type of snack identified in the image."
            },
            "diameter": centimetres("Diameter of the parippuvada in cm. Null if not a parippuvada."),
            "length": centimetres("Length of the vazhaikkapam in cm. Null if not a vazhaikkapam."),
            "width": centimetres("Width of the vazhaikkapam in cm. Null if not a vazhaikkapam."),
            "inclination": centimetres("Inclination of the vazhaikkapam's length axis in degrees, -90 to 90. Null if not a vazhaikkapam."),
            "sideA": centimetres("Side A of the samoosa in cm. Null if not a samoosa."),
            "sideB": centimetres("Side B of the samoosa in cm. Null if not a samoosa."),
            "sideC": centimetres("Side C of the samoosa in cm. Null if not a samoosa."),
            "error": { "type": "STRING", "nullable": true, "description": "Any error message if processing failed." }
        },
        "required": ["snackType", "diameter", "length", "width", "inclination", "sideA", "sideB", "sideC", "error"]
    })
}

pub fn endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        assert_eq!(
            endpoint("https://generativelanguage.googleapis.com/", "gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_dimensions_payload_inlines_image() {
        let image = ImagePayload {
            mime_type: "image/png".to_string(),
            data: "AAAA".to_string(),
        };
        let payload = build_dimensions_payload("measure it", &image);

        let parts = &payload["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "measure it");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "AAAA");
        assert_eq!(
            payload["generationConfig"]["responseSchema"]["properties"]["snackType"]["enum"][3],
            "unknown"
        );
    }
}
