use once_cell::sync::Lazy;
use regex::Regex;

const FENCE: &str = "```";

static LANGUAGE_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:sql|postgresql|psql)$").unwrap());

/// strip a markdown code fence (and a bare language tag line inside it)
/// from a model reply. text without a leading fence is only trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let text = text.trim();
    if !text.starts_with(FENCE) {
        return text.to_string();
    }

    let mut lines: Vec<&str> = text.lines().collect();

    // opening fence, e.g. ``` or ```sql
    lines.remove(0);

    if lines
        .last()
        .map(|l| l.trim().starts_with(FENCE))
        .unwrap_or(false)
    {
        lines.pop();
    }

    if lines
        .first()
        .map(|l| LANGUAGE_TAG_REGEX.is_match(l.trim()))
        .unwrap_or(false)
    {
        lines.remove(0);
    }

    lines.join("\n").trim().to_string()
}
