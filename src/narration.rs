use serde_json::Value;

/// Longest text the hosted TTS endpoint accepts in one request.
pub const MAX_TTS_CHARS: usize = 100;

/// Render a prediction as the sentence that gets spoken back.
pub fn narrate(label: &str, confidence: f64) -> String {
    let confidence = if confidence.is_finite() { confidence } else { 0.0 };
    format!(
        "The plant is {} with confidence of {:.2} percent.",
        label,
        confidence * 100.0
    )
}

/// Loose numeric read of a JSON confidence; anything non-numeric counts as 0.
pub fn confidence_from_json(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|c| c.is_finite()).unwrap_or(0.0)
}

/// Split text on word boundaries into chunks of at most `max_chars` characters.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current.chars().count() + 1 + word_len
        };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
