use crate::{config::ClientConfig, error::{ClientError, Result}};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::{
    fs,
    fs::File,
    io::{Read, Write},
    path::Path,
    time::Duration,
};
use tracing::debug;

pub fn http_client(cfg: &ClientConfig) -> Result<Client> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()?;
    Ok(client)
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Turn a non-2xx response into [`ClientError::Http`], keeping the backend's `detail`.
pub fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if text.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => text,
    };
    debug!(%status, %detail, "backend returned error");
    Err(ClientError::Http { status, detail })
}

pub fn download_with_progress(
    client: &Client,
    url: &str,
    dest: &Path,
    on_progress: &dyn Fn(u64, u64),
) -> Result<()> {
    let tmp = dest.with_extension("part");

    let mut resp = check_status(client.get(url).send()?)?;

    let total = resp.content_length().unwrap_or(0);

    on_progress(0, total);

    let mut file = File::create(&tmp)?;
    let mut downloaded: u64 = 0;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = resp.read(&mut buf)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])?;
        downloaded += n as u64;
        on_progress(downloaded, total);
    }
    file.flush()?;

    if dest.exists() {
        fs::remove_file(dest).ok();
    }

    fs::rename(&tmp, dest)?;

    on_progress(total.max(downloaded), total.max(downloaded));

    Ok(())
}
