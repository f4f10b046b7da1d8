//! Application state wiring all services together.
//!
//! Services are generic over repository and fetcher traits; AppState pins
//! them to the concrete infra implementations.

use std::sync::Arc;

use palaver_core::chat::service::ChatService;
use palaver_core::event::bus::EventBus;
use palaver_core::identity::service::IdentityService;
use palaver_core::message::service::MessageService;
use palaver_infra::auth::TokenSigner;
use palaver_infra::config::AppConfig;
use palaver_infra::remote::{DogApiClient, GoogleUserInfoClient, ZenQuotesClient};
use palaver_infra::sqlite::chat::SqliteChatRepository;
use palaver_infra::sqlite::message::SqliteMessageRepository;
use palaver_infra::sqlite::pool::DatabasePool;
use palaver_infra::sqlite::user::SqliteUserRepository;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService =
    ChatService<SqliteChatRepository, SqliteMessageRepository, DogApiClient>;

pub type ConcreteMessageService =
    MessageService<SqliteChatRepository, SqliteMessageRepository, ZenQuotesClient>;

pub type ConcreteIdentityService = IdentityService<SqliteUserRepository, GoogleUserInfoClient>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub message_service: Arc<ConcreteMessageService>,
    pub identity_service: Arc<ConcreteIdentityService>,
    pub event_bus: EventBus,
    pub tokens: Arc<TokenSigner>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&config.data_dir).await?;

        let db_pool = DatabasePool::new(&config.database_url()).await?;

        let event_bus = EventBus::new(256);

        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            DogApiClient::new(),
        );

        let message_service = MessageService::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            ZenQuotesClient::new(),
            event_bus.clone(),
            config.reply_delay,
        );

        let identity_service = IdentityService::new(
            SqliteUserRepository::new(db_pool.clone()),
            GoogleUserInfoClient::new(),
        );

        let tokens = TokenSigner::new(&config.jwt_secret);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            message_service: Arc::new(message_service),
            identity_service: Arc::new(identity_service),
            event_bus,
            tokens: Arc::new(tokens),
            db_pool,
        })
    }
}
