use sqlx::FromRow;

/// Database model for an additional image owned by a category
#[derive(Debug, Clone, FromRow)]
pub struct Image {
    pub id: i64,
    pub name: Option<String>,
    pub name_base64: String,
    pub category_id: i64,
}

/// Id and content of an image, as embedded in a category detail
#[derive(Debug, Clone, FromRow)]
pub struct ImageContent {
    pub id: i64,
    pub name_base64: String,
}

/// Database model for the cover image of a category
#[derive(Debug, Clone, FromRow)]
pub struct MainImage {
    pub id: i64,
    pub name: Option<String>,
    pub name_base64: String,
    pub category_id: i64,
}
