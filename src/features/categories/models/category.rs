use sqlx::FromRow;

/// Separator between tags in the stored `skill` column
const SKILL_SEPARATOR: &str = ",";

/// Database model for category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub category_name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub skill: Option<String>,
    pub main_image_id: Option<i64>,
}

impl Category {
    /// Skill tags in stored order
    pub fn skills(&self) -> Vec<String> {
        split_skills(self.skill.as_deref())
    }
}

/// Split the stored skill column into tags; NULL or empty yields no tags
pub fn split_skills(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(SKILL_SEPARATOR)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Join tags into the stored representation, `None` when nothing remains.
///
/// A submitted value may itself hold several comma-separated tags.
pub fn join_skills(tags: &[String]) -> Option<String> {
    let tags: Vec<String> = tags
        .iter()
        .flat_map(|tag| split_skills(Some(tag.as_str())))
        .collect();

    if tags.is_empty() {
        None
    } else {
        Some(tags.join(SKILL_SEPARATOR))
    }
}
