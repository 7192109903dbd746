//! Diesel schema for task, integration, and event persistence.
//!
//! `tasks` carries a unique index on (source, external_id) named
//! `idx_tasks_external_ref_unique`; the repository maps violations of it
//! to semantic duplicate errors. `events.task_id` references `tasks.id`
//! with `ON DELETE CASCADE` so audit entries disappear with their task.

diesel::table! {
    /// Integration configurations binding projects to external
    /// repositories.
    integrations (id) {
        /// Internal integration identifier.
        id -> Uuid,
        /// Owning project (foreign key to `projects.id`).
        project_id -> Uuid,
        /// Source tag the integration listens for.
        #[sql_name = "type"]
        #[max_length = 100]
        kind -> Varchar,
        /// External repository identifier.
        #[max_length = 100]
        external_id -> Varchar,
        /// Arbitrary configuration payload.
        config -> Jsonb,
        /// Whether the integration participates in reconciliation.
        enabled -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records, optionally carrying an external sync identity.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning project (foreign key to `projects.id`).
        project_id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Optional description.
        #[max_length = 1000]
        description -> Nullable<Varchar>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Source tag of the origin system, if externally synced.
        #[max_length = 100]
        source -> Nullable<Varchar>,
        /// Task identifier within the origin system, if externally synced.
        #[max_length = 100]
        external_id -> Nullable<Varchar>,
        /// Creating user (foreign key to `users.id`), if created by hand.
        created_by -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit events recorded against tasks.
    events (id) {
        /// Internal event identifier.
        id -> Uuid,
        /// Task the event belongs to (foreign key to `tasks.id`,
        /// `ON DELETE CASCADE`).
        task_id -> Uuid,
        /// Event kind tag.
        #[max_length = 100]
        event_type -> Varchar,
        /// Arbitrary event payload.
        payload -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
