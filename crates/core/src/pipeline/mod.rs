pub mod anonymise_image_use_case;
pub mod error;
