#![allow(dead_code)]

pub mod realm;

pub use app_builder::create_test_app;
pub use realm::{TestPrincipal, TestRealm};
