use shared::domain::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new(Language::En, Language::Hi)
    }
}

impl LanguagePair {
    pub fn new(source: Language, target: Language) -> Self {
        Self { source, target }
    }

    pub fn set_source(&mut self, source: Language) {
        self.source = source;
    }

    pub fn set_target(&mut self, target: Language) {
        self.target = target;
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
    }
}

/// Input text after a swap: the previous translation, or empty when none
/// has completed.
pub fn swap_input(previous_result: Option<String>) -> String {
    previous_result.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_exchanges_source_and_target() {
        let mut pair = LanguagePair::default();
        pair.swap();
        assert_eq!(pair, LanguagePair::new(Language::Hi, Language::En));
        pair.swap();
        assert_eq!(pair, LanguagePair::default());
    }

    #[test]
    fn same_language_pair_is_allowed() {
        let mut pair = LanguagePair::default();
        pair.set_target(Language::En);
        pair.swap();
        assert_eq!(pair, LanguagePair::new(Language::En, Language::En));
    }

    #[test]
    fn swap_input_falls_back_to_empty() {
        assert_eq!(swap_input(None), "");
        assert_eq!(swap_input(Some("नमस्ते".into())), "नमस्ते");
    }
}
