//! Documents persisted by the Scoreboard API and the DTOs exchanged with clients.

pub mod competitions;
pub mod users;

pub use competitions::{
    Competition, CompetitionBasic, CompetitionDetails, CompetitionIdRequest, CompetitionListing,
    CompetitionSummary, CompetitionView, CreateCompetitionRequest, Round, UpdateCompetitionRequest,
    UserInfo,
};
pub use users::{
    LoginRequest, LoginResponse, RegisterName, RegisterRequest, ResendResponse,
    ResendVerificationRequest, TokenResponse, User, VerifiedResponse, VerifyEmailRequest,
};
