pub mod account;
pub mod competitions;

use crate::endpoint::{EndpointRegistry, RegistryError};

use self::account::router::init_account_endpoints;
use self::competitions::router::init_competition_endpoints;

/// Every endpoint the API serves.
pub fn init_registry() -> Result<EndpointRegistry, RegistryError> {
    EndpointRegistry::new(
        init_account_endpoints()
            .into_iter()
            .chain(init_competition_endpoints()),
    )
}
