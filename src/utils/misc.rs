/// Parse a data URL into its mime type and decoded payload
///
/// Only base64-encoded payloads are accepted (`data:<mime>;base64,<data>`).
pub fn parse_data_url(data_url: &str) -> Option<(String, Vec<u8>)> {
    let rest = data_url.trim().strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;

    let mut params = header.split(';');
    let mime_type = params.next()?.trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return None;
    }

    use base64::{engine::general_purpose::STANDARD, Engine as _};
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = STANDARD.decode(cleaned).ok()?;

    Some((mime_type, decoded))
}
