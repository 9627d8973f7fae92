// Application state module
// Everything a request handler needs, built once at startup and read-only afterwards

use super::types::Config;
use crate::wiki::{PageStore, Templates, Title};

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: PageStore,
    pub templates: Templates,
    /// Title rendered at `/`
    pub front_page: Title,
}

impl AppState {
    /// Build state from configuration: validates the front page title,
    /// creates the data directory and parses the templates.
    pub async fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let front_page = Title::parse(&config.wiki.front_page)?;
        let store = PageStore::new(&config.wiki.data_dir);
        store.ensure_dir().await?;
        let templates = Templates::load(&config.wiki.template_dir)?;

        Ok(Self::from_parts(config, store, templates, front_page))
    }

    pub fn from_parts(
        config: Config,
        store: PageStore,
        templates: Templates,
        front_page: Title,
    ) -> Self {
        Self {
            config,
            store,
            templates,
            front_page,
        }
    }
}
