//! Competition entity, its rounds, and the views returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use scoreboard_auth::{AuthenticatedUser, UserName};
use scoreboard_db::Document;

/// One timed stage of a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Public identity of a user referenced by a competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
    pub name: UserName,
}

impl From<&AuthenticatedUser> for UserInfo {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub rounds: Vec<Round>,
    pub creator: UserInfo,
    #[serde(default)]
    pub juries: Vec<UserInfo>,
    /// One task list per round.
    #[serde(default)]
    pub tasks: Vec<Vec<Value>>,
}

impl Competition {
    pub fn is_creator(&self, email: &str) -> bool {
        self.creator.email == email
    }

    pub fn is_jury(&self, email: &str) -> bool {
        self.juries.iter().any(|jury| jury.email == email)
    }

    /// Start of the first round.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.rounds.first().map(|round| round.start)
    }

    /// Truncates or pads `tasks` so there is exactly one list per round.
    pub fn align_tasks(&mut self) {
        self.tasks.resize_with(self.rounds.len(), Vec::new);
    }
}

impl Document for Competition {
    const COLLECTION: &'static str = "competitions";

    fn id(&self) -> Uuid {
        self.id
    }

    fn before_save(&mut self) {
        self.align_tasks();
    }
}

/// List entry: the competition's span instead of its rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionBasic {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// Fields the list endpoint reads from storage.
#[derive(Debug, Clone, Deserialize)]
pub struct CompetitionListing {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl CompetitionListing {
    pub const FIELDS: [&'static str; 5] = ["id", "name", "description", "location", "rounds"];
}

impl From<CompetitionListing> for CompetitionBasic {
    fn from(listing: CompetitionListing) -> Self {
        Self {
            start: listing.rounds.first().map(|round| round.start),
            end: listing.rounds.last().map(|round| round.end),
            id: listing.id,
            name: listing.name,
            description: listing.description,
            location: listing.location,
        }
    }
}

/// Returned by create, update and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub rounds: Vec<Round>,
}

impl From<Competition> for CompetitionSummary {
    fn from(competition: Competition) -> Self {
        Self {
            id: competition.id,
            name: competition.name,
            description: competition.description,
            location: competition.location,
            rounds: competition.rounds,
        }
    }
}

/// Public view of one competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub rounds: Vec<Round>,
    pub creator: UserInfo,
}

impl From<Competition> for CompetitionView {
    fn from(competition: Competition) -> Self {
        Self {
            id: competition.id,
            name: competition.name,
            description: competition.description,
            location: competition.location,
            rounds: competition.rounds,
            creator: competition.creator,
        }
    }
}

/// View for the competition's juries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionDetails {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub rounds: Vec<Round>,
    pub creator: UserInfo,
    pub juries: Vec<UserInfo>,
}

impl From<Competition> for CompetitionDetails {
    fn from(competition: Competition) -> Self {
        Self {
            id: competition.id,
            name: competition.name,
            description: competition.description,
            location: competition.location,
            rounds: competition.rounds,
            creator: competition.creator,
            juries: competition.juries,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompetitionRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    pub rounds: Vec<Round>,
}

/// Partial update. Absent or empty fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCompetitionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub rounds: Option<Vec<Round>>,
}

/// Carries only the `id` path parameter, unparsed.
#[derive(Debug, Clone, Deserialize)]
pub struct CompetitionIdRequest {
    pub id: String,
}
