use std::sync::Arc;
use tracing::{debug, warn};

use super::product::{Effect, ProductAction};
use crate::net::fetcher::ProductFetcher;
use crate::net::users::UserDirectory;

/// Runs reducer effects and turns their completion into follow-up actions.
///
/// Effects are independent: two fetches in flight are not sequenced, and
/// whichever completes last overwrites the product list.
#[derive(Clone)]
pub struct Environment {
    fetcher: ProductFetcher,
    users: Arc<dyn UserDirectory>,
}

impl Environment {
    pub fn new(fetcher: ProductFetcher, users: Arc<dyn UserDirectory>) -> Self {
        Self { fetcher, users }
    }

    /// Execute `effect`. `None` means nothing is fed back.
    pub async fn run(self, effect: Effect) -> Option<ProductAction> {
        match effect {
            Effect::None | Effect::Dismiss => None,

            Effect::FetchListing { region, wine_type } => {
                let products = self.fetcher.fetch_listing(region, wine_type).await;
                Some(ProductAction::FetchResponse(products))
            }

            Effect::Search { query } => {
                let products = self.fetcher.search(&query).await;
                Some(ProductAction::FetchResponse(products))
            }

            Effect::CheckUser { user_id } => match self.users.check_user(&user_id).await {
                Ok(true) => Some(ProductAction::FetchResponseUserInfo(user_id)),
                Ok(false) => {
                    debug!(user = %user_id, "user not registered");
                    None
                }
                Err(err) => {
                    warn!(user = %user_id, error = %err, "user lookup failed");
                    None
                }
            },
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("base_url", &self.fetcher.base_url())
            .finish()
    }
}
