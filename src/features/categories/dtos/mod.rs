mod category_dto;
mod image_dto;

pub use category_dto::{
    CategoryDetailDto, CategoryImageDto, CategoryListItemDto, CategoryResponseDto,
    CreateCategoryDto, DeleteResponseDto, UploadCategoryDto,
};
pub use image_dto::{CreateImageDto, ImageResponseDto, MainImageResponseDto, UploadImageDto};
