use unicode_normalization::UnicodeNormalization;

/// Turns raw user or corpus text into a lookup key.
///
/// Lookups, shard parsing and the saved-word list all go through the same
/// preprocessor so a word always lands on the same key.
pub trait Preprocessor {
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // NFKC folds full-width and compatibility forms before case folding
        let text: String = text.nfkc().collect();

        text.to_lowercase().trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Normalize with the default preprocessor.
pub fn normalize(text: &str) -> String {
    DefaultPreprocessor.process(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize("  Hello "), "hello");
        assert_eq!(normalize("\tWORLD\n"), "world");
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t"), "");
    }

    #[test]
    fn folds_compatibility_forms() {
        // full-width latin letters
        assert_eq!(normalize("Ｈｅｌｌｏ"), "hello");
    }

    #[test]
    fn keeps_inner_whitespace() {
        assert_eq!(normalize(" Ad Hoc "), "ad hoc");
    }
}
