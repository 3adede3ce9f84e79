mod category;
mod image;

pub use category::{join_skills, Category};
pub use image::{Image, ImageContent, MainImage};
