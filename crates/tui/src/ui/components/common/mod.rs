pub mod json_syntax;
pub mod text_input;

pub use json_syntax::highlight_pretty_json_lines;
pub use text_input::TextInputState;
