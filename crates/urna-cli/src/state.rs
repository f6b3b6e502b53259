//! Application state wiring all services together.
//!
//! The conversation service is generic over its store and clients; AppState
//! pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use urna_core::chat::service::ConversationService;
use urna_core::clock::SystemClock;
use urna_core::session::controller::SessionController;
use urna_core::storage::session_store::KvSessionStore;
use urna_infra::backend::ClientKvStore;
use urna_infra::config::{ConfigOverrides, apply_overrides, load_client_config};
use urna_infra::filesystem::resolve_data_dir;
use urna_infra::http::{HttpChatClient, HttpIdentityLookup, build_client};
use urna_infra::memory::MemoryKvStore;
use urna_infra::sqlite::kv::SqliteKvStore;
use urna_infra::sqlite::pool::DatabasePool;
use urna_types::config::ClientConfig;

/// Concrete type aliases for the generics pinned to infra implementations.
pub type ConcreteSessionStore = KvSessionStore<ClientKvStore>;

pub type ConcreteController =
    SessionController<ConcreteSessionStore, HttpIdentityLookup, SystemClock>;

pub type ConcreteConversationService =
    ConversationService<ConcreteSessionStore, HttpIdentityLookup, HttpChatClient, SystemClock>;

/// Start-up options taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct StateOptions {
    pub data_dir: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub ephemeral: bool,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub conversation: Arc<ConcreteConversationService>,
    pub config: ClientConfig,
    pub data_dir: PathBuf,
    pub ephemeral: bool,
}

impl AppState {
    /// Initialize the application state: load config, open storage, wire services.
    pub async fn init(options: StateOptions) -> anyhow::Result<Self> {
        let data_dir = options.data_dir.unwrap_or_else(resolve_data_dir);

        let config = load_client_config(&data_dir).await;
        let config = apply_overrides(config, &options.overrides);

        let kv = if options.ephemeral {
            ClientKvStore::Memory(MemoryKvStore::new())
        } else {
            tokio::fs::create_dir_all(&data_dir).await?;
            let pool = DatabasePool::open_in(&data_dir).await?;
            ClientKvStore::Sqlite(SqliteKvStore::new(pool))
        };

        Self::assemble(config, kv, data_dir, options.ephemeral)
    }

    /// Wire the services over an already opened store.
    pub fn assemble(
        config: ClientConfig,
        kv: ClientKvStore,
        data_dir: PathBuf,
        ephemeral: bool,
    ) -> anyhow::Result<Self> {
        let http = build_client()?;
        let lookup = HttpIdentityLookup::new(http.clone(), config.service.lookup_url());
        let chat = HttpChatClient::new(http, config.service.chat_url());

        let store = KvSessionStore::new(kv, config.session.scope.clone());
        let controller = SessionController::new(store, lookup, SystemClock)
            .with_ttl_ms(config.session.ttl_ms());
        let conversation = ConversationService::new(controller, chat);

        info!(
            data_dir = %data_dir.display(),
            base_url = %config.service.base_url,
            scope = %config.session.scope,
            ephemeral,
            "Application state initialized"
        );

        Ok(Self {
            conversation: Arc::new(conversation),
            config,
            data_dir,
            ephemeral,
        })
    }

    pub fn controller(&self) -> &ConcreteController {
        self.conversation.controller()
    }
}
