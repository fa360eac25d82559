use crate::payload::Payload;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the embedded board data of a KiCad interactive-BOM HTML file.
static PCBDATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"var\s+pcbdata\s*=\s*JSON\.parse\(LZString\.decompressFromBase64\("([^"]+)"\)"#)
        .unwrap()
});

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("pcbdata not found in file")]
    PcbDataNotFound,
    #[error("embedded pcbdata failed to decompress")]
    Decompress,
    #[error("embedded pcbdata is not valid UTF-16")]
    Utf16,
    #[error("invalid board JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("server reported failure: {0}")]
    Status(String),
}

/// Pulls the LZString-compressed `pcbdata` blob out of an interactive-BOM
/// HTML file and returns the decompressed JSON text.
pub fn extract_pcbdata(html: &str) -> Result<String, PayloadError> {
    let captures = PCBDATA_RE
        .captures(html)
        .ok_or(PayloadError::PcbDataNotFound)?;
    let units =
        lz_str::decompress_from_base64(&captures[1]).ok_or(PayloadError::Decompress)?;
    String::from_utf16(&units).map_err(|_| PayloadError::Utf16)
}

/// Parses board data from either an interactive-BOM HTML file, a bare
/// pcbdata JSON document, or the upload-endpoint response JSON.
pub fn payload_from_str(input: &str) -> Result<Payload, PayloadError> {
    if input.trim_start().starts_with('<') {
        let json = extract_pcbdata(input)?;
        return Ok(serde_json::from_str(&json)?);
    }
    Ok(serde_json::from_str(input)?)
}
