//! Language detection

use tracing::debug;

/// Detect the language of article text as an ISO 639-1 two-letter code
///
/// Returns `"unknown"` when detection fails or the detected language has no
/// two-letter code; the pipeline continues either way.
pub fn detect_language(text: &str) -> String {
    let Some(info) = whatlang::detect(text) else {
        debug!("language detection produced no result");
        return "unknown".to_string();
    };
    iso639_1(info.lang().code()).unwrap_or("unknown").to_string()
}

/// Map the detector's ISO 639-3 codes onto the two-letter codes the data
/// model stores
fn iso639_1(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "eng" => "en",
        "fra" => "fr",
        "deu" => "de",
        "spa" => "es",
        "ron" => "ro",
        "por" => "pt",
        "ita" => "it",
        "nld" => "nl",
        "rus" => "ru",
        "ukr" => "uk",
        "pol" => "pl",
        "ces" => "cs",
        "slk" => "sk",
        "swe" => "sv",
        "dan" => "da",
        "nob" => "no",
        "fin" => "fi",
        "hun" => "hu",
        "ell" => "el",
        "bul" => "bg",
        "tur" => "tr",
        "ara" => "ar",
        "heb" => "he",
        "hin" => "hi",
        "jpn" => "ja",
        "kor" => "ko",
        "cmn" => "zh",
        "vie" => "vi",
        "ind" => "id",
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_english() {
        let text = "The central bank announced on Friday that interest rates would remain \
                    unchanged for the rest of the year, citing stable inflation figures.";
        assert_eq!(detect_language(text), "en");
    }

    #[test]
    fn test_detects_french() {
        let text = "Le gouvernement a annoncé vendredi de nouvelles mesures économiques pour \
                    soutenir les entreprises touchées par la crise de l'énergie.";
        assert_eq!(detect_language(text), "fr");
    }

    #[test]
    fn test_empty_text_is_unknown() {
        assert_eq!(detect_language(""), "unknown");
    }
}
