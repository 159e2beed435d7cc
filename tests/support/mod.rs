#![allow(dead_code)]

pub mod config;
pub mod http;
pub mod pipeline;
