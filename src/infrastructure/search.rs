// src/infrastructure/search.rs
use crate::application::ports::search::Tokenizer;

/// Lowercases and splits on anything that is not alphanumeric. Duplicates
/// are dropped, first occurrence wins.
#[derive(Default, Clone)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            let token = word.to_lowercase();
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        tokens
    }
}
