mod build_tests;
mod common;
