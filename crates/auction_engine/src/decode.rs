use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// How far into the document to look for a `<meta charset>` declaration.
const META_SNIFF_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode a page body to UTF-8 using: BOM -> Content-Type charset -> meta charset -> chardetng.
///
/// Decoding is lossy: malformed bytes become replacement characters and are
/// flagged in [`DecodedPage::had_errors`].
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> DecodedPage {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_meta(bytes));
    if let Some(enc) = declared.and_then(|label| Encoding::for_label(label.as_bytes())) {
        return decode_with(bytes, enc);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
    })
}

fn charset_from_meta(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedPage {
    let (text, _, had_errors) = enc.decode(bytes);
    DecodedPage {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
        had_errors,
    }
}
