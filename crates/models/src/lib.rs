//! SeaORM entities for the Bucks store plus the field validation rules
//! applied before rows are written.

pub mod errors;
pub mod db;
pub mod validate;
pub mod category;
pub mod service;
pub mod business_profile;
pub mod personal_post;
pub mod personal_post_tag;
pub mod personal_post_comment;
pub mod personal_post_recommendation;
pub mod user_vehicle;
pub mod skillset_profile;
pub mod cart_item;

#[cfg(test)]
mod tests;
