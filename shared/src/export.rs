use base64::Engine;
use chrono::{DateTime, Utc};
use chrono_tz::America::Denver;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DOWNLOAD_PREFIX: &str = "PainDrawing";

/// Body of `POST /submit`. The text fields are only sent by pages whose form
/// carries them.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ExportRequest {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examiner: Option<String>,
}

impl ExportRequest {
    pub fn new(image: String) -> Self {
        Self {
            image,
            ..Self::default()
        }
    }

    /// Labelled text fields that are present and not blank, in page order.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Name", &self.name),
            ("Date", &self.date),
            ("DOB", &self.dob),
            ("Examiner", &self.examiner),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then_some((label, value))
        })
        .collect()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DataUrlError {
    #[error("payload is not a data URL")]
    MissingScheme,
    #[error("data URL has no payload separator")]
    MissingPayload,
    #[error("data URL payload is not valid base64: {0}")]
    InvalidBase64(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn parse(text: &str) -> Result<Self, DataUrlError> {
        let rest = text
            .trim()
            .strip_prefix("data:")
            .ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;
        let (mime, is_base64) = match header.strip_suffix(";base64") {
            Some(mime) => (mime, true),
            None => (header, false),
        };
        let bytes = if is_base64 {
            base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|error| DataUrlError::InvalidBase64(error.to_string()))?
        } else {
            payload.as_bytes().to_vec()
        };
        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

/// `PainDrawing-YYYY-MM-DD_HH:MM AM.pdf`, in Mountain Time regardless of the
/// browser's zone.
pub fn download_filename(at: DateTime<Utc>) -> String {
    let local = at.with_timezone(&Denver);
    format!(
        "{DOWNLOAD_PREFIX}-{}.pdf",
        local.format("%Y-%m-%d_%I:%M %p")
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_base64_png_data_url() {
        let url = encode_data_url("image/png", &[0x89, b'P', b'N', b'G']);
        assert_eq!(url, "data:image/png;base64,iVBORw==");
        let parsed = DataUrl::parse(&url).unwrap();
        assert_eq!(parsed.mime, "image/png");
        assert_eq!(parsed.bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn rejects_malformed_data_urls() {
        assert_eq!(
            DataUrl::parse("iVBORw=="),
            Err(DataUrlError::MissingScheme)
        );
        assert_eq!(
            DataUrl::parse("data:image/png;base64"),
            Err(DataUrlError::MissingPayload)
        );
        assert!(matches!(
            DataUrl::parse("data:image/png;base64,***"),
            Err(DataUrlError::InvalidBase64(_))
        ));
    }

    #[test]
    fn plain_data_url_keeps_raw_payload() {
        let parsed = DataUrl::parse("data:text/plain,hello").unwrap();
        assert_eq!(parsed.mime, "text/plain");
        assert_eq!(parsed.bytes, b"hello");
    }

    #[test]
    fn filename_uses_mountain_standard_time() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 19, 5, 0).unwrap();
        assert_eq!(download_filename(at), "PainDrawing-2024-01-01_12:05 PM.pdf");
    }

    #[test]
    fn filename_follows_daylight_saving_and_midnight() {
        let at = Utc.with_ymd_and_hms(2024, 7, 4, 6, 30, 0).unwrap();
        assert_eq!(download_filename(at), "PainDrawing-2024-07-04_12:30 AM.pdf");
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 16, 9, 0).unwrap();
        assert_eq!(download_filename(at), "PainDrawing-2024-03-02_09:09 AM.pdf");
    }

    #[test]
    fn request_omits_absent_fields() {
        let request = ExportRequest::new("data:image/png;base64,AA==".into());
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"image":"data:image/png;base64,AA=="}"#);

        let parsed: ExportRequest = serde_json::from_str(
            r#"{"name":"Jane Doe","date":"2024-01-01","dob":"1990-01-01","examiner":" ","image":"x"}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.text_fields(),
            vec![("Name", "Jane Doe"), ("Date", "2024-01-01"), ("DOB", "1990-01-01")]
        );
    }
}
