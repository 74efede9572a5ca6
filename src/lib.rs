pub mod api;
pub mod cache;
pub mod config;
pub mod converter;
pub mod fhir;
pub mod i18n;
pub mod translation;
