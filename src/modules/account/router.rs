use crate::endpoint::Endpoint;
use crate::middleware::role::AnyUser;

use super::controller::{Login, Profile, Register, ResendVerification, VerifyEmail};

pub fn init_account_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::post("/account/register", Register)
            .require(&["email", "password", "name", "role"])
            .summary("Register a new Jury or Competitor account")
            .tag("Account"),
        Endpoint::post("/account/login", Login)
            .require(&["email", "password"])
            .summary("Exchange credentials for a token")
            .tag("Account"),
        Endpoint::post("/account/verify/resend", ResendVerification)
            .require(&["email", "token"])
            .summary("Send the verification mail again")
            .tag("Account"),
        Endpoint::get("/account/verify/{email}/{bytes}", VerifyEmail)
            .require(&["email", "bytes"])
            .summary("Confirm an email address")
            .tag("Account"),
        Endpoint::get("/account/profile", Profile)
            .authenticated(AnyUser)
            .summary("Claims of the current caller")
            .tag("Account"),
    ]
}
