#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Duration, Utc};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use scoreboard::router::init_router;
use scoreboard::state::AppState;
use scoreboard::utils::email::Mailer;
use scoreboard_auth::{Role, UserName, issue_token};
use scoreboard_config::{CorsConfig, EmailConfig, JwtConfig};
use scoreboard_core::AppError;
use scoreboard_db::{MemoryStore, Repository};
use scoreboard_models::{Competition, Round, User, UserInfo};

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Records outgoing mail; optionally fails every send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::internal_error("SMTP relay unreachable"));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        token_expiry: 3600,
    }
}

pub fn email_config() -> EmailConfig {
    EmailConfig {
        enabled: false,
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "scoreboard.noreply@gmail.com".to_string(),
        from_name: "Scoreboard".to_string(),
        base_url: "http://localhost:8080".to_string(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_state(store: Arc<MemoryStore>, mailer: Arc<RecordingMailer>) -> AppState {
    AppState {
        store,
        mailer,
        jwt_config: jwt_config(),
        email_config: email_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_mailer(RecordingMailer::default())
}

pub fn setup_test_app_with_mailer(mailer: RecordingMailer) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(mailer);
    let state = test_state(Arc::clone(&store), Arc::clone(&mailer));
    let router = init_router(state.clone()).unwrap();

    TestApp {
        router,
        state,
        store,
        mailer,
    }
}

/// Sends one request and returns the status and decoded JSON body.
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        send(&self.router, method, uri, body, token).await
    }

    pub fn users(&self) -> Repository<User> {
        self.state.users()
    }

    pub fn competitions(&self) -> Repository<Competition> {
        self.state.competitions()
    }
}

pub fn generate_unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}-{}", Uuid::new_v4().simple(), email)
}

pub fn fake_name() -> UserName {
    UserName {
        first: FirstName().fake(),
        middle: None,
        last: Some(LastName().fake()),
    }
}

pub struct TestUser {
    pub user: User,
    pub password: String,
    pub token: String,
}

impl TestUser {
    pub fn info(&self) -> UserInfo {
        UserInfo {
            email: self.user.email.clone(),
            name: self.user.name.clone(),
        }
    }
}

/// Stores a user directly and issues its token.
pub async fn create_test_user(state: &AppState, role: Role, verified: bool) -> TestUser {
    let password = "testpass123".to_string();
    let email = generate_unique_email();

    let mut user = User {
        id: Uuid::new_v4(),
        verification_url: format!(
            "http://localhost:8080/account/verify/{}/{}",
            email,
            "ab".repeat(32)
        ),
        email,
        name: fake_name(),
        role,
        // Low cost keeps the suite fast; verification reads the cost from the digest.
        hash: bcrypt::hash(&password, 4).unwrap(),
        blocked: false,
        verified,
        token: String::new(),
    };
    let token = issue_token(&user.to_claims(), &state.jwt_config).unwrap();
    user.token = token.clone();

    let user = state.users().save(user).await.unwrap();

    TestUser {
        user,
        password,
        token,
    }
}

pub fn hours_from_now(hours: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours)
}

/// Stores a competition created by `creator` with the given rounds.
pub async fn create_test_competition(
    state: &AppState,
    creator: &TestUser,
    rounds: Vec<Round>,
) -> Competition {
    let competition = Competition {
        id: Uuid::new_v4(),
        name: format!("Competition {}", Uuid::new_v4()),
        description: "Integration test competition".to_string(),
        location: "Main hall".to_string(),
        rounds,
        creator: creator.info(),
        juries: vec![creator.info()],
        tasks: Vec::new(),
    };

    state.competitions().save(competition).await.unwrap()
}

pub fn future_rounds() -> Vec<Round> {
    vec![
        Round {
            start: hours_from_now(24),
            end: hours_from_now(26),
        },
        Round {
            start: hours_from_now(27),
            end: hours_from_now(29),
        },
    ]
}
