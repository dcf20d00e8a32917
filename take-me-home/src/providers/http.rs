//! Single-attempt JSON GET shared by the provider clients.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ProviderError;

/// How much of an error body to keep in messages.
const BODY_PREVIEW_CHARS: usize = 200;

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// GET `url` with `query` and decode the body as `T`.
///
/// 401 and 403 map to `Unauthorized`; other non-2xx statuses map to
/// `ApiError` so the retry policy can classify them.
pub(crate) async fn get_json<T, Q>(
    http: &reqwest::Client,
    url: &str,
    query: &Q,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
{
    let response = http.get(url).query(query).send().await?;
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::ApiError {
            status: status.as_u16(),
            message: preview(&body),
        });
    }

    let body = response.text().await?;
    decode(&body)
}

/// Decode a JSON body, keeping a preview of it on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Json {
        message: e.to_string(),
        body: Some(preview(body)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_shape_mismatch_is_json_error() {
        let result: Result<Vec<u32>, _> = decode(r#"{"not": "a list"}"#);
        match result {
            Err(ProviderError::Json { body, .. }) => {
                assert_eq!(body.as_deref(), Some(r#"{"not": "a list"}"#));
            }
            other => panic!("expected Json error, got {other:?}"),
        }
    }

    #[test]
    fn preview_truncates() {
        let long = "x".repeat(500);
        assert_eq!(preview(&long).len(), BODY_PREVIEW_CHARS);
    }
}
