//! Categories with a cover image and a gallery of additional images.
//!
//! Images are stored and returned as base64 text.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/category/{id}` | Category detail with cover image and gallery |
//! | GET | `/categorys/` | List categories (404 when empty) |
//! | POST | `/category/` | Create category with cover image (multipart) |
//! | DELETE | `/category/{id}` | Delete category and everything it owns |
//! | PUT | `/category/main-image/{id}` | Set or replace cover image (multipart) |
//! | POST | `/category/image/{id}` | Add gallery image (multipart) |
//! | DELETE | `/category/image/{id}` | Delete gallery image |
//! | GET | `/category/image/{id}` | Get gallery image |
//! | GET | `/category/images/{id}` | List gallery images of a category (404 when empty) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::{CategoryService, ImageService};
