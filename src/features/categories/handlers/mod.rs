pub mod category_handler;
pub mod image_handler;

pub use category_handler::{
    change_main_image, create_category, delete_category, get_category, list_categories,
    CategoryState,
};
pub use image_handler::{create_image, delete_image, get_image, list_images};
