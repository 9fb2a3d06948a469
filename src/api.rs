use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{GuideError, Result};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Send a request and return the body of a successful response.
async fn send(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    body: Option<Vec<u8>>,
) -> Result<Vec<u8>> {
    debug!(%method, url, "sending request");

    let mut request = client.request(method, url).header(ACCEPT, JSON_MEDIA_TYPE);
    if let Some(body) = body {
        request = request.header(CONTENT_TYPE, JSON_MEDIA_TYPE).body(body);
    }

    let response = request.send().await.map_err(|e| GuideError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(GuideError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.bytes().await.map_err(|e| GuideError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })?;
    Ok(body.to_vec())
}

fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| GuideError::Decode {
        url: url.to_owned(),
        source: e,
    })
}

/// GET a URL and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let body = send(client, Method::GET, url, None).await?;
    decode(url, &body)
}

/// Send `payload` as JSON and decode the JSON answer.
pub(crate) async fn send_json<P, T>(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    payload: &P,
) -> Result<T>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let payload = serde_json::to_vec(payload)?;
    let body = send(client, method, url, Some(payload)).await?;
    decode(url, &body)
}

/// Issue a DELETE; any success status is enough.
pub(crate) async fn delete(client: &reqwest::Client, url: &str) -> Result<()> {
    send(client, Method::DELETE, url, None).await.map(|_| ())
}
