//! Application services: cached entity stores, uploads and notifications.

pub mod admin;
pub mod catalog;
pub mod contacts;
pub mod error;
pub mod images;
pub mod notify;
pub mod projects;
pub mod repos;
pub mod reviews;
pub mod skills;
