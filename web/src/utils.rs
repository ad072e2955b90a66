use anyhow::{anyhow, bail};
use gloo::net::http::Request;

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) async fn fetch_phrases(url: &str) -> anyhow::Result<String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|err| anyhow!("requesting {url}: {err}"))?;
    if !response.ok() {
        bail!("fetching {} failed with status {}", url, response.status());
    }
    response
        .text()
        .await
        .map_err(|err| anyhow!("reading {url}: {err}"))
}
