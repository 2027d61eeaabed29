//! Domain primitives, ports and services.
//!
//! Purpose: define the strongly typed entities of the matchmaking event
//! (profiles, startups, rounds, selections), the ports adapters plug into,
//! and the services implementing the use-cases. Nothing here knows about
//! HTTP, WebSockets or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Round controller: [`RoundService`], [`Countdown`], [`CountdownTimer`].
//! - Live sync: [`ChangeEvent`], [`ActiveRoundFollower`].

pub mod active_round_follower;
pub mod account_service;
pub mod asset;
pub mod asset_service;
pub mod auth;
pub mod catalogue;
pub mod change_event;
pub mod countdown;
pub mod error;
pub mod insights;
pub mod insights_service;
pub mod investor_service;
pub mod ports;
pub mod profile;
pub mod round;
pub mod round_service;
pub mod selection;
pub mod selection_service;
pub mod startup;
pub mod startup_service;
pub mod trace_id;

pub use self::account_service::{
    AccountService, DEFAULT_SESSION_CHECK_TIMEOUT, IdentityLoginService,
};
pub use self::active_round_follower::{ActiveRoundFollower, ActiveRoundUpdate};
pub use self::asset::{AssetKind, AssetName, AssetNameError, UnknownAssetKindError};
pub use self::asset_service::{AssetService, MAX_ASSET_BYTES};
pub use self::auth::{Identity, LoginCredentials, LoginValidationError};
pub use self::catalogue::{CatalogueOption, CatalogueOptions};
pub use self::change_event::{ChangeEvent, ChangeKind, ChangeTable};
pub use self::countdown::{
    Countdown, CountdownObserver, CountdownTimer, ENDING_SOON_SECONDS, format_mm_ss,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::insights::{
    Activity, ActivityKind, Dashboard, InsightsSnapshot, InvestorMatches, SectorCount,
    StartupRanking,
};
pub use self::insights_service::InsightsService;
pub use self::investor_service::{InvestorService, Provisioning};
pub use self::profile::{
    Email, EmailValidationError, Profile, ProfileId, ProfileIdError, Role, SessionStatus,
    UnknownRoleError,
};
pub use self::round::{
    ActiveRound, MAX_ROUND_MINUTES, NewRound, Round, RoundDuration, RoundDurationError, RoundId,
    RoundState,
};
pub use self::round_service::RoundService;
pub use self::selection::{SelectedStartup, Selection, ToggleOutcome};
pub use self::selection_service::SelectionService;
pub use self::startup::{
    Startup, StartupDraft, StartupFields, StartupId, StartupValidationError,
};
pub use self::startup_service::StartupService;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use pitchmatch::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
