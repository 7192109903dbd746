//! Diesel schema for project persistence.

diesel::table! {
    /// Projects owned by users.
    projects (id) {
        /// Internal project identifier.
        id -> Uuid,
        /// Project name.
        #[max_length = 100]
        name -> Varchar,
        /// Owning user (foreign key to `users.id`).
        owner_id -> Uuid,
        /// Optional description.
        #[max_length = 500]
        description -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
