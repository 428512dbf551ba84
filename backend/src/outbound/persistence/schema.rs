//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered users.
    ///
    /// Only `id`, `name` and `handle` are ever selected by this service.
    users (id) {
        /// Primary key.
        id -> Int8,
        /// Unique login handle.
        handle -> Varchar,
        /// Display name (max 64 characters).
        name -> Varchar,
        /// Credential hash owned by the authentication service.
        password -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed friendship edges, written in symmetric pairs.
    friendships (user_id, friend_id) {
        /// Owner of the edge.
        user_id -> Int8,
        /// Friend listed by the owner.
        friend_id -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Activity events.
    events (id) {
        /// Primary key.
        id -> Int8,
        /// Owning user.
        user_id -> Int8,
        /// Classification tag such as `workout`.
        event_type -> Varchar,
        /// When the activity happened.
        occurred_at -> Timestamptz,
        /// Serialised JSON payload.
        metadata -> Text,
    }
}

diesel::table! {
    /// Reactions on events; unique per `(event_id, user_id)`.
    event_reactions (id) {
        /// Primary key; reassigned whenever a reaction is replaced.
        id -> Int8,
        /// Event reacted to.
        event_id -> Int8,
        /// Reacting user.
        user_id -> Int8,
        /// Reaction label (max 32 characters).
        content -> Varchar,
    }
}

diesel::table! {
    /// Health metrics uploaded by users.
    health_metrics (id) {
        /// Primary key.
        id -> Int8,
        /// Owning user.
        user_id -> Int8,
        /// One of `sleep`, `fitness` or `stress`.
        metric_type -> Varchar,
        /// Numeric value.
        value -> Float8,
        /// Timestamp the value applies to.
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(events -> users (user_id));
diesel::joinable!(event_reactions -> users (user_id));
diesel::joinable!(event_reactions -> events (event_id));
diesel::joinable!(health_metrics -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    friendships,
    events,
    event_reactions,
    health_metrics,
);
