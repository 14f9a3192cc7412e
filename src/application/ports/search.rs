// src/application/ports/search.rs

/// Splits content text into search tokens. The output only feeds search
/// columns and never affects workflow decisions.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}
