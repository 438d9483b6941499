use crate::error::EnhanceError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_PROMPT: usize = 5000;

// Models keep wrapping the enhanced text in filler despite the system
// instruction. Catalog matches the phrasings seen in practice.
static INTRO_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^Here'?s? (an |the |your )?(enhanced|improved|better|updated|modified|revised) prompt:?",
        r"(?i)^Enhanced prompt:?",
        r"(?i)^I'?ve enhanced your prompt:?",
        r"(?i)^The enhanced version( of your prompt)?:?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("intro pattern"))
    .collect()
});

static OUTRO_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(By providing .+)$",
        r"(?i)(This (enhanced|improved) prompt (will|should) .+)$",
        r"(?i)(This (should|will) help .+)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("outro pattern"))
    .collect()
});

/// Strip the first matching introductory phrase and the first matching
/// concluding phrase from a model response, then trim. No match is a no-op.
pub fn clean_response(text: &str) -> String {
    let mut out = text.to_string();
    for re in INTRO_PHRASES.iter() {
        if re.is_match(&out) {
            out = re.replace(&out, "").into_owned();
            break;
        }
    }
    for re in OUTRO_PHRASES.iter() {
        if re.is_match(&out) {
            out = re.replace(&out, "").into_owned();
            break;
        }
    }
    out.trim().to_string()
}

/// Escape `<` and `>` only. Deliberately not a full HTML-entity encoder;
/// this guards display surfaces that might interpret markup.
pub fn sanitize_input(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Reject empty or oversized input before anything touches the network.
/// Returns the input trimmed.
pub fn validate_input(text: &str) -> Result<String, EnhanceError> {
    let chars = text.chars().count();
    if chars > MAX_PROMPT {
        return Err(EnhanceError::InvalidInput(format!(
            "prompt is too long ({chars} characters, max {MAX_PROMPT})"
        )));
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EnhanceError::InvalidInput("prompt is empty".into()));
    }
    Ok(trimmed.to_string())
}
