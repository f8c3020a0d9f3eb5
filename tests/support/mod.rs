#![allow(dead_code)]

pub mod backend;
pub mod habitat_env;
