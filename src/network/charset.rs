//! Response body decoding

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decode a response body to text.
///
/// The charset declared in the content type is tried first, then strict
/// UTF-8, and finally the encoding guessed from the bytes themselves.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type.and_then(declared_encoding) {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return text.into_owned();
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Extract the `charset=` parameter of a content type
pub fn declared_encoding(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}
