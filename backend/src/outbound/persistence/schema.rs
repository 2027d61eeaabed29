//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When the
//! migrations change, regenerate with `diesel print-schema` or edit by hand.

diesel::table! {
    /// Email/password authentication records.
    identities (id) {
        id -> Uuid,
        /// Lowercased, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Authorisation records; `id` equals the identity id.
    profiles (id) {
        id -> Uuid,
        email -> Varchar,
        /// `admin` or `investor`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    startups (id) {
        id -> Uuid,
        name -> Text,
        sector -> Text,
        category -> Text,
        country -> Text,
        one_line_pitch -> Text,
        demo_url -> Nullable<Text>,
        pitch_deck_url -> Nullable<Text>,
        logo_url -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pitch rounds. Never deleted; at most one row has `is_active`.
    rounds (id) {
        id -> Uuid,
        current_round_number -> Int4,
        duration_minutes -> Int4,
        starts_at -> Timestamptz,
        is_active -> Bool,
        /// Cleared when the startup is deleted.
        startup_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Investor selections, one row per investor and startup.
    matches (investor_id, startup_id) {
        investor_id -> Uuid,
        startup_id -> Uuid,
        round_id -> Nullable<Uuid>,
        is_top_selected -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(profiles -> identities (id));
diesel::joinable!(rounds -> startups (startup_id));
diesel::joinable!(matches -> profiles (investor_id));
diesel::joinable!(matches -> startups (startup_id));
diesel::joinable!(matches -> rounds (round_id));

diesel::allow_tables_to_appear_in_same_query!(identities, profiles, startups, rounds, matches);
