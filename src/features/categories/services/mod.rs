mod category_service;
mod image_service;

pub use category_service::CategoryService;
pub use image_service::ImageService;
