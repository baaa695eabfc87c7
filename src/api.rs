//! Typed calls against the Auralis backend.

use crate::{
    config::ClientConfig,
    error::{ClientError, Result},
    io::net::{check_status, download_with_progress, http_client},
    types::{
        HistoryRecord, LoginBody, MixRequest, MixResult, RegisterBody, TokenResponse,
        UploadedFile,
    },
};
use reqwest::blocking::{multipart::Form, Client, RequestBuilder};
use std::path::Path;
use tracing::debug;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    bearer: Option<String>,
}

impl ApiClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(cfg)?,
            base_url: cfg.base_url().to_string(),
            bearer: None,
        })
    }

    /// Same connection pool, different credentials.
    pub fn with_bearer(&self, token: Option<&str>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            bearer: token.map(str::to_string),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a server-relative path such as `/output/mix.wav`.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authed(&self, rb: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.bearer.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(rb.bearer_auth(token))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        debug!(username, "POST /login");
        let resp = self
            .client
            .post(self.absolute("/login"))
            .json(&LoginBody { username, password })
            .send()?;
        let body: TokenResponse = match check_status(resp) {
            Ok(r) => r.json()?,
            Err(ClientError::Http { .. }) => return Err(ClientError::InvalidCredentials),
            Err(e) => return Err(e),
        };
        Ok(body.access_token)
    }

    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<String> {
        debug!(username, "POST /register");
        let resp = self
            .client
            .post(self.absolute("/register"))
            .json(&RegisterBody {
                username,
                email,
                password,
            })
            .send()?;
        let body: TokenResponse = match check_status(resp) {
            Ok(r) => r.json()?,
            Err(ClientError::Http { status, detail }) => {
                debug!(%status, %detail, "registration rejected");
                return Err(ClientError::RegistrationFailed);
            }
            Err(e) => return Err(e),
        };
        Ok(body.access_token)
    }

    pub fn upload(&self, path: &Path) -> Result<UploadedFile> {
        debug!(path = %path.display(), "POST /upload");
        let form = Form::new().file("file", path)?;
        let rb = self.authed(self.client.post(self.absolute("/upload")))?;
        let resp = check_status(rb.multipart(form).send()?)?;
        Ok(resp.json()?)
    }

    pub fn mix(&self, req: &MixRequest) -> Result<MixResult> {
        debug!(stems = req.stems.len(), auto_gain = req.auto_gain, "POST /mix");
        let rb = self.authed(self.client.post(self.absolute("/mix")))?;
        let resp = check_status(rb.json(req).send()?)?;
        Ok(resp.json()?)
    }

    pub fn history(&self) -> Result<Vec<HistoryRecord>> {
        debug!("GET /history");
        let rb = self.authed(self.client.get(self.absolute("/history")))?;
        let resp = check_status(rb.send()?)?;
        Ok(resp.json()?)
    }

    pub fn delete_history(&self, id: i64) -> Result<()> {
        debug!("DELETE /history/{id}");
        let rb = self.authed(self.client.delete(self.absolute(&format!("/history/{id}"))))?;
        check_status(rb.send()?)?;
        Ok(())
    }

    /// Fetch a served file (stem or mix output) to `dest`.
    pub fn download(&self, url: &str, dest: &Path, on_progress: &dyn Fn(u64, u64)) -> Result<()> {
        download_with_progress(&self.client, &self.absolute(url), dest, on_progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_joins_relative_and_keeps_full_urls() {
        let api = ApiClient::new(&ClientConfig::default().with_api_url("http://h:1/")).unwrap();
        assert_eq!(api.absolute("/output/a.wav"), "http://h:1/output/a.wav");
        assert_eq!(api.absolute("static/b.wav"), "http://h:1/static/b.wav");
        assert_eq!(api.absolute("https://cdn/x.wav"), "https://cdn/x.wav");
    }

    #[test]
    fn authed_calls_need_a_token() {
        let api = ApiClient::new(&ClientConfig::default()).unwrap();
        assert!(matches!(api.history(), Err(ClientError::NotAuthenticated)));
    }
}
