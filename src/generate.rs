use std::io::Cursor;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::future::BoxFuture;
use futures::FutureExt;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::color::HexColor;
use crate::image_ref::ImageRef;

/// Label every user-facing failure message starts with.
pub const CONNECTION_FAILED: &str = "connection failed";

const GENERIC_FAILURE: &str = "Failed to generate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub text: String,
    pub color_dark: HexColor,
    pub color_light: HexColor,
}

/// Backend reply. Fields are kept loosely typed: `success` is judged by
/// truthiness and `error`/`result` only count when they are strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: Value,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Value,
}

impl GenerateResponse {
    fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {other}"
            ))),
        }
    }

    pub fn succeeded(&self) -> bool {
        truthy(&self.success)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_str()
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_str()
    }
}

/// `false`, `null`, `0`, `NaN` and `""` are falsy; everything else is truthy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number
            .as_f64()
            .map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// PartialOrd only so outcomes can travel inside `FormEvent`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Error)]
pub enum GenerateError {
    #[error("{0}")]
    Transport(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("invalid response body: {0}")]
    MalformedBody(String),
    #[error("response did not include a result")]
    MissingResult,
}

impl GenerateError {
    /// The text shown in the error panel.
    pub fn user_message(&self) -> String {
        format!("{CONNECTION_FAILED}: {self}")
    }
}

/// Maps a backend reply onto the outcome of a submit.
///
/// A non-OK status wins over the body; the body's `error` string is
/// preferred over any generated message.
pub fn interpret(status: u16, body: &[u8]) -> Result<ImageRef, GenerateError> {
    let parsed = GenerateResponse::parse(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|response| response.error_message().map(str::to_string))
            .unwrap_or_else(|| format!("Server Error: {status}"));
        return Err(GenerateError::Status { status, message });
    }

    let response = parsed.map_err(|err| GenerateError::MalformedBody(err.to_string()))?;
    if !response.succeeded() {
        let message = response.error_message().unwrap_or(GENERIC_FAILURE);
        return Err(GenerateError::Rejected(message.to_string()));
    }

    match response.result() {
        Some(result) if !result.is_empty() => Ok(ImageRef::new(result)),
        _ => Err(GenerateError::MissingResult),
    }
}

/// The one capability the form needs: turn a request into an image
/// reference.
pub trait Generator: Send + Sync {
    fn generate(&self, request: GenerateRequest) -> BoxFuture<'_, Result<ImageRef, GenerateError>>;
}

pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpGenerator {
    pub fn new(endpoint: reqwest::Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    async fn post(&self, request: GenerateRequest) -> Result<ImageRef, GenerateError> {
        tracing::debug!(endpoint = %self.endpoint, ?request, "posting generate request");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| GenerateError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| GenerateError::Transport(err.to_string()))?;
        tracing::debug!(status, len = body.len(), "received generate response");

        interpret(status, &body)
    }
}

impl Generator for HttpGenerator {
    fn generate(&self, request: GenerateRequest) -> BoxFuture<'_, Result<ImageRef, GenerateError>> {
        self.post(request).boxed()
    }
}

/// Offline stand-in for the backend. Produces a placeholder PNG in the
/// requested colors and answers through the same JSON contract.
pub struct MockGenerator {
    delay: Duration,
}

const MOCK_MODULES: u32 = 25;
const MOCK_QUIET: u32 = 4;
const MOCK_SCALE: u32 = 8;

impl MockGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn respond(request: &GenerateRequest) -> Result<Vec<u8>, GenerateError> {
        let png = placeholder_png(request)
            .map_err(|err| GenerateError::Transport(err.to_string()))?;
        let body = serde_json::json!({
            "success": true,
            "result": format!("data:image/png;base64,{}", STANDARD.encode(png)),
        });
        serde_json::to_vec(&body).map_err(|err| GenerateError::MalformedBody(err.to_string()))
    }
}

impl Generator for MockGenerator {
    fn generate(&self, request: GenerateRequest) -> BoxFuture<'_, Result<ImageRef, GenerateError>> {
        async move {
            tokio::time::sleep(self.delay).await;
            Self::respond(&request).and_then(|body| interpret(200, &body))
        }
        .boxed()
    }
}

fn placeholder_png(request: &GenerateRequest) -> Result<Vec<u8>, image::ImageError> {
    let seed = request
        .text
        .bytes()
        .fold(0x811c_9dc5_u32, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
        });

    let side = (MOCK_MODULES + 2 * MOCK_QUIET) * MOCK_SCALE;
    let dark = Rgb(request.color_dark.to_array());
    let light = Rgb(request.color_light.to_array());

    let image = RgbImage::from_fn(side, side, |x, y| {
        let (mx, my) = (x / MOCK_SCALE, y / MOCK_SCALE);
        if mx < MOCK_QUIET
            || my < MOCK_QUIET
            || mx >= MOCK_QUIET + MOCK_MODULES
            || my >= MOCK_QUIET + MOCK_MODULES
        {
            return light;
        }
        if module_is_dark(mx - MOCK_QUIET, my - MOCK_QUIET, seed) {
            dark
        } else {
            light
        }
    });

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image).write_to(&mut out, ImageOutputFormat::Png)?;
    Ok(out.into_inner())
}

fn module_is_dark(x: u32, y: u32, seed: u32) -> bool {
    let last = MOCK_MODULES - 7;
    for (fx, fy) in [(0, 0), (last, 0), (0, last)] {
        if (fx..fx + 7).contains(&x) && (fy..fy + 7).contains(&y) {
            let (dx, dy) = (x - fx, y - fy);
            let ring = dx.min(dy).min(6 - dx).min(6 - dy);
            return ring != 1;
        }
        // separator around each finder pattern
        if (fx.saturating_sub(1)..fx + 8).contains(&x) && (fy.saturating_sub(1)..fy + 8).contains(&y)
        {
            return false;
        }
    }

    let mixed = (x.wrapping_mul(0x9e37_79b9) ^ y.wrapping_mul(0x85eb_ca6b) ^ seed)
        .wrapping_mul(0xc2b2_ae35);
    (mixed >> 29) & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            text: "https://www.google.com".to_string(),
            color_dark: HexColor::BLACK,
            color_light: HexColor::WHITE,
        }
    }

    #[test]
    fn request_uses_camel_case_keys() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "https://www.google.com",
                "colorDark": "#000000",
                "colorLight": "#ffffff",
            })
        );
    }

    #[test]
    fn success_with_result() {
        let body = br#"{"success":true,"result":"R"}"#;
        assert_eq!(interpret(200, body), Ok(ImageRef::new("R")));
    }

    #[test]
    fn status_error_prefers_body_message() {
        let err = interpret(500, br#"{"error":"boom"}"#).unwrap_err();
        assert_eq!(
            err,
            GenerateError::Status {
                status: 500,
                message: "boom".to_string()
            }
        );
        assert_eq!(err.user_message(), "connection failed: boom");
    }

    #[test]
    fn status_error_without_json_body() {
        let err = interpret(502, b"<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "Server Error: 502");
    }

    #[test]
    fn rejected_without_message_uses_fallback() {
        let err = interpret(200, br#"{"success":false}"#).unwrap_err();
        assert_eq!(err, GenerateError::Rejected("Failed to generate".to_string()));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn rejected_with_message() {
        let err = interpret(200, br#"{"success":false,"error":"text too long"}"#).unwrap_err();
        assert_eq!(err.user_message(), "connection failed: text too long");
    }

    #[test]
    fn success_flag_is_judged_by_truthiness() {
        assert_eq!(
            interpret(200, br#"{"success":1,"result":"R"}"#),
            Ok(ImageRef::new("R"))
        );
        assert_eq!(
            interpret(200, br#"{"success":"yes","result":"R"}"#),
            Ok(ImageRef::new("R"))
        );
        for falsy in ["0", "null", "\"\"", "false"] {
            let body = format!(r#"{{"success":{falsy}}}"#);
            assert_eq!(
                interpret(200, body.as_bytes()),
                Err(GenerateError::Rejected("Failed to generate".to_string())),
                "{body}"
            );
        }
    }

    #[test]
    fn falsy_success_keeps_server_message() {
        let err = interpret(200, br#"{"success":0,"error":"quota exceeded"}"#).unwrap_err();
        assert_eq!(err.user_message(), "connection failed: quota exceeded");
    }

    #[test]
    fn status_error_keeps_message_despite_odd_fields() {
        let err = interpret(500, br#"{"success":null,"error":"boom"}"#).unwrap_err();
        assert_eq!(err.user_message(), "connection failed: boom");

        let err = interpret(500, br#"{"success":"no","result":7,"error":"boom"}"#).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn non_string_error_falls_back() {
        let err = interpret(200, br#"{"success":false,"error":{"code":3}}"#).unwrap_err();
        assert_eq!(err, GenerateError::Rejected("Failed to generate".to_string()));
        let err = interpret(500, br#"{"error":42}"#).unwrap_err();
        assert_eq!(err.to_string(), "Server Error: 500");
    }

    #[test]
    fn non_object_body_is_malformed() {
        assert!(matches!(
            interpret(200, br#"["R"]"#),
            Err(GenerateError::MalformedBody(_))
        ));
    }

    #[test]
    fn ok_status_with_garbage_body() {
        assert!(matches!(
            interpret(200, b"not json"),
            Err(GenerateError::MalformedBody(_))
        ));
    }

    #[test]
    fn success_without_result() {
        assert_eq!(
            interpret(200, br#"{"success":true}"#),
            Err(GenerateError::MissingResult)
        );
        assert_eq!(
            interpret(200, br#"{"success":true,"result":""}"#),
            Err(GenerateError::MissingResult)
        );
    }

    #[tokio::test]
    async fn mock_generator_returns_embedded_png() {
        let generator = MockGenerator::new(Duration::ZERO);
        let image = generator.generate(request()).await.unwrap();

        assert!(image.as_str().starts_with("data:image/png;base64,"));
        let bytes = image.bytes().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        let side = (MOCK_MODULES + 2 * MOCK_QUIET) * MOCK_SCALE;
        assert_eq!(decoded.dimensions(), (side, side));
        // top-left finder pattern corner is dark, quiet zone is light
        let corner = MOCK_QUIET * MOCK_SCALE;
        assert_eq!(decoded.get_pixel(corner, corner).0, [0, 0, 0]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0xff, 0xff, 0xff]);
    }

    #[tokio::test]
    async fn mock_generator_is_deterministic() {
        let generator = MockGenerator::new(Duration::ZERO);
        let first = generator.generate(request()).await;
        let second = generator.generate(request()).await;
        assert_eq!(first, second);
    }
}
