use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::account::errors::AuthError;
use account_service::domain::account::errors::MailError;
use account_service::domain::account::models::RefreshTokenRecord;
use account_service::domain::account::models::User;
use account_service::domain::account::models::UserId;
use account_service::domain::account::ports::AuthServicePort;
use account_service::domain::account::ports::MailNotifier;
use account_service::domain::account::ports::RefreshTokenRepository;
use account_service::domain::account::ports::UserRepository;
use account_service::domain::account::service::AuthService;
use account_service::domain::account::tokens::TokenService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::TokenPairIssuer;
use chrono::Duration;
use uuid::Uuid;

pub const API_URL: &str = "http://localhost:5000";
pub const CLIENT_URL: &str = "http://localhost:3000";
pub const REFRESH_TTL_DAYS: i64 = 30;

/// Test application that spawns a real server over in-memory adapters
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub mailer: Arc<RecordingMailNotifier>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());
        let mailer = Arc::new(RecordingMailNotifier::default());

        let token_service = TokenService::new(
            TokenPairIssuer::new(
                b"test-access-secret-at-least-32-bytes!",
                b"test-refresh-secret-at-least-32-byte!",
            ),
            refresh_tokens,
            Duration::minutes(30),
            Duration::days(REFRESH_TTL_DAYS),
        );

        let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
            users,
            token_service,
            Arc::clone(&mailer),
            API_URL.to_string(),
        ));

        let router = create_router(auth_service, CLIENT_URL.to_string(), REFRESH_TTL_DAYS);

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to create reqwest client"),
            mailer,
        }
    }

    /// Client without a cookie store, for sending hand-picked cookies.
    pub fn plain_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create reqwest client")
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Activation link of the most recent mail, as sent to the user.
    pub fn last_activation_link(&self) -> String {
        let sent = self.mailer.sent.lock().unwrap();
        let mail = sent.last().expect("No activation mail recorded");
        mail.activation_url
            .rsplit('/')
            .next()
            .expect("Malformed activation URL")
            .to_string()
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub activation_url: String,
}

/// Mail notifier that records sends instead of delivering them. Set
/// `fail_sends` to exercise the delivery-failure path.
#[derive(Default)]
pub struct RecordingMailNotifier {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail_sends: Mutex<bool>,
}

#[async_trait]
impl MailNotifier for RecordingMailNotifier {
    async fn send_activation_mail(&self, to: &str, activation_url: &str) -> Result<(), MailError> {
        if *self.fail_sends.lock().unwrap() {
            return Err(MailError::SendFailed("recording notifier set to fail".to_string()));
        }

        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            activation_url: activation_url.to_string(),
        });

        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailInUse(user.email.as_str().to_string()));
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn find_by_activation_link(&self, link: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.activation_link.as_str() == link)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();

        if !users.contains_key(&user.id.0) {
            return Err(AuthError::NotFound(user.id.to_string()));
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Mutex<HashMap<Uuid, String>>,
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn upsert(&self, user_id: &UserId, token: &str) -> Result<(), AuthError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(user_id.0, token.to_string());
        Ok(())
    }

    async fn remove(&self, token: &str) -> Result<(), AuthError> {
        self.tokens.lock().unwrap().retain(|_, t| t != token);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|(_, t)| t.as_str() == token)
            .map(|(user_id, t)| RefreshTokenRecord {
                user_id: UserId(*user_id),
                token: t.clone(),
            }))
    }
}
