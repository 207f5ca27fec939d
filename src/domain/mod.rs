pub mod ai;
pub mod category;
pub mod content;
pub mod health;
pub mod mood;
