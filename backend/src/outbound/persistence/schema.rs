//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// One finished assessment per row.
    ///
    /// Participant details and headline scores are stored as columns for
    /// ad-hoc SQL inspection; `outcome` holds the complete tagged outcome.
    assessment_results (id) {
        id -> Uuid,
        /// Insertion order, used to list results in storage order.
        seq -> Int8,
        participant_name -> Varchar,
        participant_age -> Varchar,
        participant_gender -> Varchar,
        test_date -> Varchar,
        /// `sequence`, `card_matching`, `pattern`, `stroop` or `trail_making`.
        test_kind -> Varchar,
        final_level -> Nullable<Int4>,
        correct_count -> Nullable<Int4>,
        wrong_count -> Nullable<Int4>,
        outcome -> Jsonb,
        recorded_at -> Timestamptz,
    }
}
