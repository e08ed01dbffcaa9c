pub mod config;
pub mod controller;
pub mod data_models;
pub mod search_client;
pub mod view;
pub mod year_filter;
