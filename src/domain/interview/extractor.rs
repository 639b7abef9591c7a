//! Response extraction and sanitization.
//!
//! Collaborator output is free text that may wrap JSON in code fences,
//! preambles or stray markup. The extractor cleans that text and pulls out
//! the first balanced JSON value.

use super::errors::ExtractionError;

/// Maximum allowed response length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Maximum length for individual string fields in extracted data.
pub const MAX_FIELD_LENGTH: usize = 2_000;

const INJECTION_MARKERS: [&str; 11] = [
    "```system",
    "```assistant",
    "[INST]",
    "[/INST]",
    "<|system|>",
    "<|assistant|>",
    "<|user|>",
    "<|im_start|>",
    "<|im_end|>",
    "<<SYS>>",
    "<</SYS>>",
];

/// Turns collaborator text into either display text or structured data.
#[derive(Debug, Clone, Default)]
pub struct ResponseExtractor;

impl ResponseExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Cleans a conversational reply. Returns `None` when nothing usable is left.
    pub fn conversational_text(&self, response: &str) -> Option<String> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return None;
        }

        let cleaned = self.strip_injection_markers(&self.remove_control_chars(response));
        let unfenced = self
            .extract_from_code_block(&cleaned)
            .unwrap_or_else(|| cleaned.trim().to_string());
        let text = unfenced.trim().trim_matches('"').trim();

        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Extracts the first JSON value from a response.
    ///
    /// String fields are stripped of markup and truncated.
    pub fn extract_json(&self, response: &str) -> Result<serde_json::Value, ExtractionError> {
        let cleaned = self.clean(response)?;
        let json_str = self.locate_json(&cleaned);

        let value: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| ExtractionError::ParseError(e.to_string()))?;

        Ok(self.sanitize_json_strings(value))
    }

    /// Extracts the first JSON object. Arrays and scalars are rejected.
    ///
    /// Every balanced `{...}` is tried in order, so bracketed prose before the
    /// object does not hide it.
    pub fn extract_object(
        &self,
        response: &str,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ExtractionError> {
        let cleaned = self.clean(response)?;
        let trimmed = cleaned.trim();
        let body = self
            .extract_from_code_block(trimmed)
            .unwrap_or_else(|| trimmed.to_string());

        let mut first_error = None;
        let mut resume_at = 0;
        for (start, _) in body.match_indices('{') {
            if start < resume_at {
                continue;
            }
            // Nothing after an unterminated object can be a top-level one.
            let Some(candidate) = self.extract_balanced_json(&body, start, '{', '}') else {
                break;
            };
            match serde_json::from_str::<serde_json::Value>(&candidate) {
                Ok(serde_json::Value::Object(map)) => return Ok(self.sanitize_object(map)),
                Ok(_) => {}
                Err(e) => {
                    first_error.get_or_insert_with(|| e.to_string());
                    resume_at = start + candidate.len();
                }
            }
        }

        if let Some(message) = first_error {
            return Err(ExtractionError::ParseError(message));
        }
        match self.extract_json(response)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(ExtractionError::schema(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn clean(&self, response: &str) -> Result<String, ExtractionError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(ExtractionError::ParseError(format!(
                "response of {} bytes exceeds maximum of {}",
                response.len(),
                MAX_RESPONSE_LENGTH
            )));
        }
        Ok(self.strip_injection_markers(&self.remove_control_chars(response)))
    }

    fn sanitize_object(
        &self,
        map: serde_json::Map<String, serde_json::Value>,
    ) -> serde_json::Map<String, serde_json::Value> {
        map.into_iter()
            .map(|(k, v)| (k, self.sanitize_json_strings(v)))
            .collect()
    }

    fn locate_json(&self, response: &str) -> String {
        let trimmed = response.trim();

        if let Some(json) = self.extract_from_code_block(trimmed) {
            return json;
        }

        let obj_start = trimmed.find('{');
        let arr_start = trimmed.find('[');

        let (start, open, close) = match (obj_start, arr_start) {
            (Some(o), Some(a)) if a < o => (a, '[', ']'),
            (Some(o), _) => (o, '{', '}'),
            (None, Some(a)) => (a, '[', ']'),
            (None, None) => return trimmed.to_string(),
        };

        self.extract_balanced_json(trimmed, start, open, close)
            .unwrap_or_else(|| trimmed.to_string())
    }

    fn extract_from_code_block(&self, s: &str) -> Option<String> {
        let patterns = ["```json\n", "```json\r\n", "```JSON\n", "```\n", "```\r\n"];

        for pattern in patterns {
            if let Some(start) = s.find(pattern) {
                let body_start = start + pattern.len();
                if let Some(end) = s[body_start..].find("```") {
                    return Some(s[body_start..body_start + end].trim().to_string());
                }
            }
        }
        None
    }

    fn extract_balanced_json(&self, s: &str, start: usize, open: char, close: char) -> Option<String> {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape_next = false;

        for (offset, c) in s[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                _ if in_string => {}
                c if c == open => depth += 1,
                c if c == close => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let end = start + offset + c.len_utf8();
                        return Some(s[start..end].to_string());
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn remove_control_chars(&self, s: &str) -> String {
        s.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect()
    }

    fn strip_injection_markers(&self, s: &str) -> String {
        INJECTION_MARKERS
            .iter()
            .fold(s.to_string(), |acc, marker| acc.replace(marker, ""))
    }

    fn sanitize_json_strings(&self, value: serde_json::Value) -> serde_json::Value {
        use serde_json::Value;

        match value {
            Value::String(s) => Value::String(self.sanitize_string_field(&s)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|v| self.sanitize_json_strings(v))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, self.sanitize_json_strings(v)))
                    .collect(),
            ),
            other => other,
        }
    }

    fn sanitize_string_field(&self, s: &str) -> String {
        let no_html = strip_html_tags(s);
        let trimmed = no_html.trim();

        if trimmed.chars().count() > MAX_FIELD_LENGTH {
            trimmed.chars().take(MAX_FIELD_LENGTH).collect()
        } else {
            trimmed.to_string()
        }
    }
}

fn strip_html_tags(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
