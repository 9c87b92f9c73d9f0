pub mod error;
pub mod intercept;
pub mod navigator;
pub mod route;
pub mod security;
