//! Diesel schema for user persistence.

diesel::table! {
    /// User accounts with unique username and email.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Unique account name.
        #[max_length = 50]
        username -> Varchar,
        /// Unique email address.
        #[max_length = 100]
        email -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
