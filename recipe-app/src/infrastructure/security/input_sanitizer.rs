use crate::domain::RecipeDraft;
use recipe_errors::AppError;
use regex_lite::Regex;
use std::sync::LazyLock;

const MAX_TITLE_LENGTH: usize = 120;
const MAX_ENTRY_LENGTH: usize = 500;
const MAX_COMMENT_LENGTH: usize = 2000;
const MAX_LIST_ENTRIES: usize = 100;

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("static pattern"));

pub struct InputSanitizer;

impl InputSanitizer {
    /// Normalises a submitted draft and checks it is complete.
    pub fn sanitize_draft(draft: RecipeDraft) -> Result<RecipeDraft, AppError> {
        let draft = RecipeDraft {
            name: Self::single_line(&draft.name, "name", MAX_TITLE_LENGTH)?,
            category: Self::single_line(&draft.category, "category", MAX_TITLE_LENGTH)?,
            ingredients: Self::entries(&draft.ingredients, "ingredient")?,
            instructions: Self::entries(&draft.instructions, "instruction")?,
            image_url: Self::single_line(&draft.image_url, "image url", MAX_ENTRY_LENGTH)?,
            submitted_by: Self::single_line(&draft.submitted_by, "submitter", MAX_TITLE_LENGTH)?,
            ..draft
        };

        if let Err(e) = draft.validate() {
            tracing::warn!("Rejected recipe draft: {}", e);
            return Err(e);
        }
        Ok(draft)
    }

    pub fn sanitize_comment(text: &str) -> Result<String, AppError> {
        let lines: Vec<String> = Self::strip_control(text)
            .lines()
            .map(|line| HORIZONTAL_SPACE.replace_all(line.trim(), " ").to_string())
            .collect();
        let text = lines.join("\n").trim().to_string();

        if text.is_empty() {
            return Err(AppError::Validation("comment text is required".to_string()));
        }
        if text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(AppError::Validation("comment is too long".to_string()));
        }
        Ok(text)
    }

    fn entries(items: &[String], field: &str) -> Result<Vec<String>, AppError> {
        if items.len() > MAX_LIST_ENTRIES {
            return Err(AppError::Validation(format!("too many {field} entries")));
        }
        items
            .iter()
            .map(|item| Self::single_line(item, field, MAX_ENTRY_LENGTH))
            .collect()
    }

    fn single_line(value: &str, field: &str, max_len: usize) -> Result<String, AppError> {
        let flat = Self::strip_control(&value.replace(['\n', '\r', '\t'], " "));
        let cleaned = HORIZONTAL_SPACE.replace_all(flat.trim(), " ").to_string();

        if cleaned.chars().count() > max_len {
            return Err(AppError::Validation(format!("{field} is too long")));
        }
        Ok(cleaned)
    }

    fn strip_control(value: &str) -> String {
        value
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;

    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "  Jollof \t Rice ".to_string(),
            category: "Main Course".to_string(),
            ingredients: vec!["3 cups  rice".to_string(), "tomato\u{7}paste".to_string()],
            instructions: vec!["Fry the paste.\nAdd rice.".to_string()],
            difficulty: Difficulty::Medium,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_draft_is_normalised() {
        let draft = InputSanitizer::sanitize_draft(draft()).unwrap();
        assert_eq!(draft.name, "Jollof Rice");
        assert_eq!(draft.ingredients, vec!["3 cups rice", "tomatopaste"]);
        assert_eq!(draft.instructions, vec!["Fry the paste. Add rice."]);
    }

    #[test]
    fn test_blank_entry_rejected() {
        let mut d = draft();
        d.ingredients.push("   ".to_string());
        assert!(matches!(InputSanitizer::sanitize_draft(d), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_overlong_name_rejected() {
        let mut d = draft();
        d.name = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(InputSanitizer::sanitize_draft(d).is_err());
    }

    #[test]
    fn test_comment_keeps_line_breaks() {
        let text = InputSanitizer::sanitize_comment("  Lovely!  \n\n Made it   twice ").unwrap();
        assert_eq!(text, "Lovely!\n\nMade it twice");
        assert!(InputSanitizer::sanitize_comment(" \n ").is_err());
    }
}
