//! Fully wired in-memory backend for handler and end-to-end tests.
//!
//! Every port is backed by one [`InMemoryStore`], the broadcast change feed,
//! a temporary asset directory and a [`MutableClock`], so tests drive the
//! same services the binary runs without a database.

use std::sync::Arc;

use actix_web::web;
use chrono::{TimeZone, Utc};
use mockable::Clock;
use tempfile::TempDir;
use url::Url;

use crate::domain::ports::{ChangeFeed, IdentityRepository, ProfileRepository};
use crate::domain::{
    AccountService, AssetService, Email, IdentityLoginService, InsightsService, InvestorService,
    Profile, Provisioning, Role, RoundService, SelectionService, StartupService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::ws::origin::AllowedOrigins;
use crate::inbound::ws::state::WsState;
use crate::outbound::live::BroadcastChangeFeed;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::storage::LocalAssetStorage;

use super::clock::MutableClock;

/// Email of the seeded admin account.
pub const ADMIN_EMAIL: &str = "admin@pitchmatch.test";
/// Email of the seeded investor account.
pub const INVESTOR_EMAIL: &str = "investor@pitchmatch.test";
/// Password shared by the seeded accounts.
pub const PASSWORD: &str = "correct horse battery staple";
/// Origin accepted by [`MemoryWorld::ws_state`].
pub const TEST_ORIGIN: &str = "http://localhost:3000";
/// Public base URL used for asset links.
pub const PUBLIC_BASE_URL: &str = "http://pitchmatch.test";

/// In-memory backend with one admin and one investor already provisioned.
pub struct MemoryWorld {
    pub store: Arc<InMemoryStore>,
    pub feed: Arc<BroadcastChangeFeed>,
    pub clock: Arc<MutableClock>,
    pub admin: Profile,
    pub investor: Profile,
    state: HttpState,
    _assets: TempDir,
}

impl MemoryWorld {
    /// World with investor provisioning enabled.
    pub async fn new() -> Self {
        Self::with_provisioning(Provisioning::Enabled).await
    }

    /// World with an explicit provisioning mode.
    ///
    /// # Panics
    ///
    /// Panics when seeding fails; this is test scaffolding.
    pub async fn with_provisioning(provisioning: Provisioning) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let feed = Arc::new(BroadcastChangeFeed::default());
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid start time");
        let clock = Arc::new(MutableClock::new(start));
        let assets = TempDir::new().expect("asset dir");
        let storage =
            Arc::new(LocalAssetStorage::open(assets.path()).expect("open asset storage"));
        let base_url = Url::parse(PUBLIC_BASE_URL).expect("base url");

        let admin = seed_profile(&store, &*clock, ADMIN_EMAIL, Role::Admin).await;
        let investor = seed_profile(&store, &*clock, INVESTOR_EMAIL, Role::Investor).await;

        let dyn_feed: Arc<dyn ChangeFeed> = feed.clone();
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let account = Arc::new(AccountService::new(
            store.clone(),
            store.clone(),
            dyn_clock.clone(),
        ));
        let startups = Arc::new(StartupService::new(
            store.clone(),
            store.clone(),
            dyn_feed.clone(),
            dyn_clock.clone(),
        ));
        let rounds = Arc::new(RoundService::new(
            store.clone(),
            store.clone(),
            dyn_feed.clone(),
            dyn_clock.clone(),
        ));
        let selections = Arc::new(SelectionService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            dyn_feed,
            dyn_clock.clone(),
        ));

        let state = HttpState::new(
            HttpStatePorts {
                login: Arc::new(IdentityLoginService::new(store.clone())),
                account: account.clone(),
                account_command: account,
                investors: Arc::new(InvestorService::new(
                    store.clone(),
                    store.clone(),
                    dyn_clock.clone(),
                    provisioning,
                )),
                startups: startups.clone(),
                startups_query: startups,
                rounds: rounds.clone(),
                rounds_query: rounds,
                selections: selections.clone(),
                selections_query: selections,
                insights: Arc::new(InsightsService::new(
                    store.clone(),
                    store.clone(),
                    store.clone(),
                    store.clone(),
                )),
                assets: Arc::new(AssetService::new(storage, base_url)),
            },
            dyn_clock,
        );

        Self {
            store,
            feed,
            clock,
            admin,
            investor,
            state,
            _assets: assets,
        }
    }

    /// Handler state sharing this world's store, feed and clock.
    pub fn http_state(&self) -> HttpState {
        self.state.clone()
    }

    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.http_state())
    }

    /// WebSocket state accepting [`TEST_ORIGIN`].
    pub fn ws_state(&self) -> WsState {
        let origins =
            AllowedOrigins::parse([TEST_ORIGIN]).expect("test origin is a valid allow-list");
        WsState::new(
            self.state.account.clone(),
            self.state.rounds_query.clone(),
            self.feed.clone(),
            self.state.clock.clone(),
            origins,
        )
    }
}

async fn seed_profile(store: &InMemoryStore, clock: &dyn Clock, email: &str, role: Role) -> Profile {
    let email = Email::new(email).expect("seed email");
    let identity = IdentityRepository::create(store, &email, PASSWORD)
        .await
        .expect("seed identity");
    let profile = Profile {
        id: identity.id,
        email: identity.email,
        role,
        created_at: clock.utc(),
    };
    ProfileRepository::insert(store, &profile)
        .await
        .expect("seed profile");
    profile
}
