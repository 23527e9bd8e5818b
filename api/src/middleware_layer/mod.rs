pub mod json_extractor;
pub mod panic_guard;
