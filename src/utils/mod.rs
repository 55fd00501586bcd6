// URL handling utilities
pub mod url_parser;

// Display utilities
pub mod status_formatter;

// JSON utilities
pub mod json_converter;

// Re-export all utilities for convenient access
pub use url_parser::hostname_from_url;
pub use status_formatter::format_state;
pub use json_converter::value_to_short_string;
