/// Remote anime conversion client
///
/// One POST per convert() call: the compressed photo goes out as a data
/// URI, the stylized result comes back the same way. No streaming, no
/// partial results, no retries.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::convert::ConvertError;
use crate::state::data::EncodedImage;

/// The conversion service endpoint
const CONVERSION_ENDPOINT: &str = "https://api.animekan.app/v1/convert";

/// Generation can take a while on the backend's GPU queue
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Request body: the image travels inline as a data URI
#[derive(Debug, Serialize)]
struct ConversionRequest {
    #[serde(rename = "imageUrl")]
    image_url: String,
}

/// Response body. The service answers with exactly one of the two
/// fields; anything else is a malformed payload.
#[derive(Debug, Deserialize)]
struct ConversionResponse {
    #[serde(rename = "animeImageUrl")]
    anime_image_url: Option<String>,
    error: Option<String>,
}

/// Send one image to the conversion service and wait for the result.
pub async fn convert_image(original: EncodedImage) -> Result<EncodedImage, ConvertError> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ConvertError::BackendInvocation(e.to_string()))?;

    let request = ConversionRequest {
        image_url: original.to_data_uri(),
    };

    println!("🎨 Requesting anime conversion ({}KB payload)", original.data().len() / 1024);

    let response = client
        .post(CONVERSION_ENDPOINT)
        .json(&request)
        .send()
        .await
        .map_err(|e| ConvertError::BackendInvocation(e.to_string()))?;

    let status = response.status();

    // Error statuses usually still carry an {error: ...} body worth
    // showing, so try to parse before falling back to the bare status.
    let parsed: Result<ConversionResponse, _> = response.json().await;

    match parsed {
        Ok(body) => interpret_response(body),
        Err(_) if !status.is_success() => Err(ConvertError::BackendInvocation(format!(
            "Service returned HTTP {}",
            status
        ))),
        Err(e) => Err(ConvertError::BackendResponse(format!(
            "Unreadable response: {}",
            e
        ))),
    }
}

/// Classify a parsed response into a result image or an error.
fn interpret_response(response: ConversionResponse) -> Result<EncodedImage, ConvertError> {
    if let Some(message) = response.error {
        return Err(ConvertError::BackendResponse(message));
    }

    let uri = response
        .anime_image_url
        .ok_or_else(|| ConvertError::BackendResponse("Response had no image".to_string()))?;

    EncodedImage::from_data_uri(&uri)
        .map_err(|e| ConvertError::BackendResponse(format!("Unusable image in response: {}", e)))
}
