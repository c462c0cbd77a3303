//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use shop_api::ApiClient;
use shop_auth::Session;
use shop_cache::{Cache, FileStore};
use shop_commerce::cart::{CartStore, PricingRules};
use shop_commerce::checkout::CheckoutController;

use crate::config::ShopConfig;
use crate::output::Output;

/// Storage key for the signed-in session.
pub const SESSION_KEY: &str = "session";

/// Config file names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: ShopConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            ShopConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd)?.unwrap_or_default()
        };

        Ok(Self {
            config,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    ///
    /// The nearest config file wins. One that exists but does not parse is
    /// an error, since it carries the pricing rules.
    fn find_config(start: &Path) -> Result<Option<ShopConfig>> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    let path = config_path.to_string_lossy();
                    tracing::debug!(path = %path, "loading config");
                    return ShopConfig::load(&path).map(Some);
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Directory the records are stored in.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Open the record store.
    pub fn store(&self) -> Result<Arc<FileStore>> {
        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open storage at {}", dir.display()))?;
        Ok(Arc::new(store))
    }

    /// Open the cart, restored from storage.
    pub fn cart(&self) -> Result<Arc<CartStore>> {
        let currency = self.config.pricing.currency()?;
        Ok(Arc::new(CartStore::open(self.store()?, currency)))
    }

    pub fn rules(&self) -> Result<PricingRules> {
        self.config.pricing.rules()
    }

    /// The saved session, if one exists and has not expired.
    pub fn session(&self) -> Result<Option<Session>> {
        let cache = Cache::new(self.store()?);
        let session = match cache.get::<Session>(SESSION_KEY) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session record");
                None
            }
        };
        Ok(session.filter(Session::is_valid))
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        Cache::new(self.store()?)
            .set(SESSION_KEY, session)
            .context("Failed to save session")
    }

    pub fn clear_session(&self) -> Result<()> {
        Cache::new(self.store()?)
            .delete(SESSION_KEY)
            .context("Failed to remove session")
    }

    /// API client carrying the saved session's token.
    pub fn api(&self) -> Result<ApiClient> {
        let client = ApiClient::new(&self.config.api)
            .context("Failed to create API client")?
            .with_currency(self.config.pricing.currency()?);
        Ok(match self.session()? {
            Some(session) => client.with_token(session.token),
            None => client,
        })
    }

    /// Checkout controller over the stored cart, backed by the API.
    pub fn checkout(&self) -> Result<CheckoutController> {
        let api = Arc::new(self.api()?);
        Ok(CheckoutController::new(self.cart()?, api.clone(), api).with_rules(self.rules()?))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
