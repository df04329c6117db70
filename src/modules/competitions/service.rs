use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use scoreboard_auth::AuthenticatedUser;
use scoreboard_core::AppError;
use scoreboard_db::{Filter, Projection};

use crate::metrics;
use crate::state::AppState;

use super::model::{
    Competition, CompetitionBasic, CompetitionDetails, CompetitionListing, CompetitionSummary,
    CompetitionView, CreateCompetitionRequest, Round, UpdateCompetitionRequest, UserInfo,
};

/// Rounds must be non-empty, each must end no earlier than it starts, and no
/// round may start before the previous one ends.
pub fn validate_rounds(rounds: &[Round]) -> Result<(), AppError> {
    if rounds.is_empty() {
        return Err(AppError::domain(
            "You must have at least one round in your competition",
        ));
    }

    let mut previous_end: Option<DateTime<Utc>> = None;
    for round in rounds {
        if round.start > round.end {
            return Err(AppError::domain("Round cannot start before it has ended"));
        }
        if previous_end.is_some_and(|end| round.start < end) {
            return Err(AppError::domain(
                "Round cannot start before previous round finishes",
            ));
        }
        previous_end = Some(round.end);
    }

    Ok(())
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("Competition with id {} was not found", id))
}

/// Keeps the stored value when a partial update omits a field or sends "".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub struct CompetitionService;

impl CompetitionService {
    /// Loads a competition by its textual id. Ids that are not UUIDs are
    /// reported as not found.
    #[instrument(skip(state), fields(db.collection = "competitions"))]
    pub async fn find(state: &AppState, id: &str) -> Result<Competition, AppError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(not_found(id));
        };

        state
            .competitions()
            .find_by_id(uuid)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(|| not_found(id))
    }

    #[instrument(
        skip(state, dto, creator),
        fields(competition.name = %dto.name, user.email = %creator.email)
    )]
    pub async fn create(
        state: &AppState,
        dto: CreateCompetitionRequest,
        creator: &AuthenticatedUser,
    ) -> Result<CompetitionSummary, AppError> {
        validate_rounds(&dto.rounds)?;

        let creator = UserInfo::from(creator);
        let competition = Competition {
            id: Uuid::new_v4(),
            name: dto.name,
            description: dto.description,
            location: dto.location,
            rounds: dto.rounds,
            juries: vec![creator.clone()],
            creator,
            tasks: Vec::new(),
        };

        let competition = state
            .competitions()
            .save(competition)
            .await
            .map_err(AppError::internal)?;

        metrics::track_competition_operation("created");
        info!(competition.id = %competition.id, "Competition created");

        Ok(competition.into())
    }

    pub async fn get(state: &AppState, id: &str) -> Result<CompetitionView, AppError> {
        Ok(Self::find(state, id).await?.into())
    }

    pub async fn get_detailed(state: &AppState, id: &str) -> Result<CompetitionDetails, AppError> {
        Ok(Self::find(state, id).await?.into())
    }

    #[instrument(skip(state), fields(db.collection = "competitions"))]
    pub async fn list(state: &AppState) -> Result<Vec<CompetitionBasic>, AppError> {
        let listings: Vec<CompetitionListing> = state
            .competitions()
            .find_projected(&Filter::all(), &Projection::include(CompetitionListing::FIELDS))
            .await
            .map_err(AppError::internal)?;

        debug!(count = listings.len(), "Listed competitions");

        Ok(listings.into_iter().map(CompetitionBasic::from).collect())
    }

    #[instrument(skip(state, dto))]
    pub async fn update(
        state: &AppState,
        id: &str,
        dto: UpdateCompetitionRequest,
    ) -> Result<CompetitionSummary, AppError> {
        if let Some(rounds) = &dto.rounds {
            validate_rounds(rounds)?;
        }

        let mut competition = Self::find(state, id).await?;

        if let Some(name) = non_empty(dto.name) {
            competition.name = name;
        }
        if let Some(description) = non_empty(dto.description) {
            competition.description = description;
        }
        if let Some(location) = non_empty(dto.location) {
            competition.location = location;
        }
        if let Some(rounds) = dto.rounds {
            competition.rounds = rounds;
        }

        let competition = state
            .competitions()
            .save(competition)
            .await
            .map_err(AppError::internal)?;

        metrics::track_competition_operation("updated");
        info!(competition.id = %competition.id, "Competition updated");

        Ok(competition.into())
    }

    #[instrument(skip(state))]
    pub async fn remove(state: &AppState, id: &str) -> Result<CompetitionSummary, AppError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(not_found(id));
        };

        let competition = state
            .competitions()
            .delete_by_id(uuid)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(|| not_found(id))?;

        metrics::track_competition_operation("removed");
        info!(competition.id = %competition.id, "Competition removed");

        Ok(competition.into())
    }
}
