use crate::error::{AssistantError, Result};

/// substrings that mark a mutating or destructive statement
pub const DENIED_FRAGMENTS: &[&str] = &["drop ", "truncate ", "alter ", "delete ", "update "];

/// reject generated sql whose lowercased text contains a denied fragment.
///
/// substring matching, not parsing: a literal like `'please update me'` is
/// rejected, and `DELETE\nFROM t` slips through. keep it that way.
pub fn ensure_read_only(sql: &str) -> Result<()> {
    let lowered = sql.to_lowercase();
    match DENIED_FRAGMENTS.iter().find(|f| lowered.contains(*f)) {
        Some(fragment) => Err(AssistantError::UnsafeStatement(format!(
            "statement contains {:?}",
            fragment.trim_end()
        ))),
        None => Ok(()),
    }
}
