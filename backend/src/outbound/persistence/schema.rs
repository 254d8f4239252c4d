//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Dashboard accounts. `username` is unique.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// One of `admin`, `staff`, `viewer`.
        role -> Varchar,
        last_login -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Login sessions keyed by the SHA-256 hex digest of the cookie token.
    sessions (token_hash) {
        token_hash -> Varchar,
        user_id -> Uuid,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Monitored schools with their embedded device record.
    schools (id) {
        id -> Uuid,
        name -> Text,
        latitude -> Float8,
        longitude -> Float8,
        contact_email -> Text,
        contact_phone -> Text,
        headmaster -> Text,
        province -> Text,
        district -> Text,
        palika -> Text,
        /// One of `online`, `offline`, `maintenance`.
        status -> Varchar,
        last_seen -> Timestamptz,
        looma_id -> Text,
        looma_count -> Int4,
        looma_serial_number -> Text,
        looma_version -> Text,
        looma_last_update -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    access_logs (id) {
        id -> Uuid,
        school_id -> Uuid,
        user_id -> Nullable<Uuid>,
        user_name -> Text,
        action -> Text,
        details -> Nullable<Text>,
        ip_address -> Nullable<Text>,
        logged_at -> Timestamptz,
    }
}

diesel::table! {
    qr_scans (id) {
        id -> Uuid,
        school_id -> Uuid,
        looma_id -> Text,
        staff_name -> Text,
        notes -> Nullable<Text>,
        scanned_at -> Timestamptz,
    }
}

diesel::joinable!(sessions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(access_logs, qr_scans, schools, sessions, users);
