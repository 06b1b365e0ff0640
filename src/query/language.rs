//! Query language detection

use crate::models::QueryLanguage;

/// Detect whether a query arrived in Spanish.
///
/// Best-effort: anything the detector cannot classify, and every language
/// other than Spanish, is treated as English. Detection never fails a
/// request.
pub fn detect_language(text: &str) -> QueryLanguage {
    match whatlang::detect(text) {
        Some(info) if info.lang() == whatlang::Lang::Spa => QueryLanguage::Spanish,
        _ => QueryLanguage::English,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_english() {
        let language =
            detect_language("Tell me about the City Council meeting schedule for this year.");
        assert_eq!(language, QueryLanguage::English);
    }

    #[test]
    fn test_detects_spanish() {
        let language = detect_language(
            "¿Cuándo se reúne el concejo municipal? Háblame de los horarios de las reuniones de este año.",
        );
        assert_eq!(language, QueryLanguage::Spanish);
    }

    #[test]
    fn test_undetectable_defaults_to_english() {
        assert_eq!(detect_language(""), QueryLanguage::English);
        assert_eq!(detect_language("42 17 99"), QueryLanguage::English);
    }
}
