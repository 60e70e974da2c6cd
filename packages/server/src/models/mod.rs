pub mod auth;
pub mod contact;
pub mod post;
pub mod shared;
pub mod user;
