//! Builders wiring the driven adapters into HTTP and WebSocket state.
//!
//! The same services run on both storage back ends: Diesel repositories when
//! a pool is configured, one shared [`InMemoryStore`] otherwise.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use pitchmatch::domain::ports::{
    AssetLibrary, ChangeFeed, IdentityRepository, IdentityRepositoryError, ProfileRepository,
    RoundRepository, SelectionRepository, StartupRepository,
};
use pitchmatch::domain::{
    AccountService, AssetService, IdentityLoginService, InsightsService, InvestorService,
    LoginCredentials, RoundService, SelectionService, StartupService,
};
use pitchmatch::inbound::http::state::{HttpState, HttpStatePorts};
use pitchmatch::inbound::ws::state::WsState;
use pitchmatch::outbound::live::BroadcastChangeFeed;
use pitchmatch::outbound::memory::InMemoryStore;
use pitchmatch::outbound::persistence::{
    DieselIdentityRepository, DieselProfileRepository, DieselRoundRepository,
    DieselSelectionRepository, DieselStartupRepository,
};
use pitchmatch::outbound::storage::LocalAssetStorage;

use super::ServerConfig;

/// Application data shared by every worker.
#[derive(Clone)]
pub(crate) struct AppStates {
    pub(crate) http: web::Data<HttpState>,
    pub(crate) ws: web::Data<WsState>,
}

/// Repository adapters backing one storage choice.
struct Repositories<I, P, S, R, Sel> {
    identities: Arc<I>,
    profiles: Arc<P>,
    startups: Arc<S>,
    rounds: Arc<R>,
    selections: Arc<Sel>,
}

/// Collaborators that do not depend on the storage choice.
struct SharedDeps {
    feed: Arc<dyn ChangeFeed>,
    clock: Arc<dyn Clock>,
    assets: Arc<dyn AssetLibrary>,
}

fn build_ports<I, P, S, R, Sel>(
    repos: Repositories<I, P, S, R, Sel>,
    shared: &SharedDeps,
    config: &ServerConfig,
) -> HttpStatePorts
where
    I: IdentityRepository + 'static,
    P: ProfileRepository + 'static,
    S: StartupRepository + 'static,
    R: RoundRepository + 'static,
    Sel: SelectionRepository + 'static,
{
    let Repositories {
        identities,
        profiles,
        startups,
        rounds,
        selections,
    } = repos;

    let account = Arc::new(
        AccountService::new(identities.clone(), profiles.clone(), shared.clock.clone())
            .with_lookup_timeout(config.session_check_timeout),
    );
    let startup_service = Arc::new(StartupService::new(
        startups.clone(),
        rounds.clone(),
        shared.feed.clone(),
        shared.clock.clone(),
    ));
    let round_service = Arc::new(RoundService::new(
        rounds.clone(),
        startups.clone(),
        shared.feed.clone(),
        shared.clock.clone(),
    ));
    let selection_service = Arc::new(SelectionService::new(
        selections.clone(),
        startups.clone(),
        rounds.clone(),
        shared.feed.clone(),
        shared.clock.clone(),
    ));

    HttpStatePorts {
        login: Arc::new(IdentityLoginService::new(identities.clone())),
        account: account.clone(),
        account_command: account,
        investors: Arc::new(InvestorService::new(
            identities,
            profiles.clone(),
            shared.clock.clone(),
            config.provisioning,
        )),
        startups: startup_service.clone(),
        startups_query: startup_service,
        rounds: round_service.clone(),
        rounds_query: round_service,
        selections: selection_service.clone(),
        selections_query: selection_service,
        insights: Arc::new(InsightsService::new(profiles, startups, selections, rounds)),
        assets: shared.assets.clone(),
    }
}

/// Create the configured bootstrap identity unless it already exists.
async fn seed_bootstrap<I>(identities: &I, credentials: Option<&LoginCredentials>) -> std::io::Result<()>
where
    I: IdentityRepository,
{
    let Some(credentials) = credentials else {
        return Ok(());
    };
    match identities
        .create(credentials.email(), credentials.password())
        .await
    {
        Ok(identity) => {
            info!(email = %identity.email, "bootstrap identity created");
            Ok(())
        }
        Err(IdentityRepositoryError::DuplicateEmail { .. }) => {
            info!(email = %credentials.email(), "bootstrap identity already present");
            Ok(())
        }
        Err(error) => Err(std::io::Error::other(format!(
            "seed bootstrap identity: {error}"
        ))),
    }
}

/// Build handler and socket state for `config`.
///
/// # Errors
/// Fails when the asset directory cannot be opened or the bootstrap identity
/// cannot be stored.
pub(crate) async fn build_states(config: &ServerConfig) -> std::io::Result<AppStates> {
    let feed = Arc::new(BroadcastChangeFeed::default());
    let storage = Arc::new(LocalAssetStorage::open(&config.storage_dir)?);
    let shared = SharedDeps {
        feed: feed.clone(),
        clock: Arc::new(DefaultClock),
        assets: Arc::new(AssetService::new(storage, config.public_base_url.clone())),
    };

    let ports = match &config.db_pool {
        Some(pool) => {
            let identities = Arc::new(DieselIdentityRepository::new(pool.clone()));
            seed_bootstrap(identities.as_ref(), config.bootstrap.as_ref()).await?;
            info!("using PostgreSQL repositories");
            build_ports(
                Repositories {
                    identities,
                    profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
                    startups: Arc::new(DieselStartupRepository::new(pool.clone())),
                    rounds: Arc::new(DieselRoundRepository::new(pool.clone())),
                    selections: Arc::new(DieselSelectionRepository::new(pool.clone())),
                },
                &shared,
                config,
            )
        }
        None => {
            let store = Arc::new(InMemoryStore::new());
            seed_bootstrap(store.as_ref(), config.bootstrap.as_ref()).await?;
            info!("no database configured; using in-memory repositories");
            build_ports(
                Repositories {
                    identities: store.clone(),
                    profiles: store.clone(),
                    startups: store.clone(),
                    rounds: store.clone(),
                    selections: store,
                },
                &shared,
                config,
            )
        }
    };

    let http = HttpState::new(ports, shared.clock.clone());
    let ws = WsState::new(
        http.account.clone(),
        http.rounds_query.clone(),
        feed,
        shared.clock,
        config.origins.clone(),
    );
    Ok(AppStates {
        http: web::Data::new(http),
        ws: web::Data::new(ws),
    })
}
