use gloo_net::http::Request;
use globe::LoadError;

/// GET `url` and return the body text; non-2xx statuses are failures.
pub async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::Fetch(e.to_string()))?;

    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let body = body.trim();
        let msg = if body.is_empty() {
            format!("HTTP {status} for {url}")
        } else {
            format!("HTTP {status} for {url}: {body}")
        };
        return Err(LoadError::Fetch(msg));
    }

    resp.text().await.map_err(|e| LoadError::Fetch(e.to_string()))
}
