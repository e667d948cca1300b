pub mod errors;
pub mod models;
pub mod money;
pub mod netting;
pub mod services;
pub mod simplifier;
pub mod views;
