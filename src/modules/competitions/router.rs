use scoreboard_auth::Role;

use crate::endpoint::Endpoint;
use crate::middleware::role::{AnyUser, RequireRole};

use super::controller::{
    CreateCompetition, GetCompetition, GetCompetitionDetailed, IsCreator, IsCreatorBeforeStart,
    IsJury, ListCompetitions, RemoveCompetition, UpdateCompetition,
};

pub fn init_competition_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::get("/competition", ListCompetitions)
            .summary("List competitions with their overall span")
            .tag("Competitions"),
        Endpoint::post("/competition", CreateCompetition)
            .require(&["name", "description", "location", "rounds"])
            .authenticated(RequireRole(Role::Jury))
            .summary("Create a competition")
            .tag("Competitions"),
        Endpoint::get("/competition/{id}", GetCompetition)
            .require(&["id"])
            .summary("Get a competition and its creator")
            .tag("Competitions"),
        Endpoint::get("/competition/{id}/detailed", GetCompetitionDetailed)
            .require(&["id"])
            .authenticated(AnyUser)
            .precondition(IsJury)
            .summary("Get a competition with its juries")
            .tag("Competitions"),
        Endpoint::put("/competition/{id}", UpdateCompetition)
            .require(&["id"])
            .authenticated(RequireRole(Role::Jury))
            .precondition(IsCreatorBeforeStart)
            .summary("Update a competition that has not started")
            .tag("Competitions"),
        Endpoint::delete("/competition/{id}", RemoveCompetition)
            .require(&["id"])
            .authenticated(RequireRole(Role::Jury))
            .precondition(IsCreator)
            .summary("Remove a competition")
            .tag("Competitions"),
    ]
}
