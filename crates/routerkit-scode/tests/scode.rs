#[path = "scode/golden.rs"]
mod golden;
#[path = "scode/parsing.rs"]
mod parsing;
#[path = "scode/dialects.rs"]
mod dialects;
