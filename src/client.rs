//! The client context: configuration, HTTP access and the session, created once and
//! passed to whatever needs them.

use crate::{
    api::ApiClient,
    config::ClientConfig,
    error::Result,
    gate::{gate, Navigation, Route},
    io::progress::SimulatedProgress,
    mix::MixWorkflow,
    paths,
    session::{FileTokenStore, Session, SessionStore, TokenStore},
};

pub struct Client {
    config: ClientConfig,
    api: ApiClient,
    session: SessionStore,
}

impl Client {
    pub fn new(config: ClientConfig, store: impl TokenStore + 'static) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::new(&config)?;
        Ok(Self {
            config,
            api,
            session: SessionStore::open(store),
        })
    }

    /// Config from disk and environment, token in the platform data directory.
    pub fn from_env(api_url: Option<&str>) -> Result<Self> {
        let config = ClientConfig::load_with(|k| std::env::var(k).ok(), api_url)?;
        let store = FileTokenStore::new(paths::data_dir()?);
        Self::new(config, store)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    /// API handle carrying the current bearer token, if any.
    pub fn api(&self) -> ApiClient {
        self.api.with_bearer(self.session.token())
    }

    /// Log in and return where the user lands next.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Route> {
        self.session.login(&self.api, username, password)?;
        Ok(Route::after_login())
    }

    pub fn register(&mut self, username: &str, email: &str, password: &str) -> Result<Route> {
        self.session.register(&self.api, username, email, password)?;
        Ok(Route::after_register())
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        gate(self.session(), Route::parse(path))
    }

    pub fn mix_workflow(&self, progress: SimulatedProgress) -> MixWorkflow {
        MixWorkflow::with_progress(self.config.progress, progress)
    }
}
