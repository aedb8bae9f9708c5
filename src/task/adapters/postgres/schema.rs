//! Diesel schema for annotation workflow persistence.

diesel::table! {
    /// Groups partitioning tasks and users.
    annotation_groups (id) {
        /// Group identifier.
        id -> Int8,
        /// Group name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Annotator accounts.
    annotators (id) {
        /// User identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Unique email, matched case-insensitively.
        #[max_length = 255]
        email -> Varchar,
        /// Role name.
        #[max_length = 32]
        role -> Varchar,
        /// Owning group.
        group_id -> Int8,
    }
}

diesel::table! {
    /// Annotation tasks with their stage lineage.
    annotation_tasks (id) {
        /// Task identifier.
        id -> Int8,
        /// Owning group.
        group_id -> Int8,
        /// Claim batch.
        #[max_length = 255]
        batch_id -> Varchar,
        /// Original source text.
        diplomatic_context -> Text,
        /// Machine suggestion.
        normalised_context -> Nullable<Text>,
        /// Transcriber output.
        corrected_context -> Nullable<Text>,
        /// Reviewer output.
        reviewed_context -> Nullable<Text>,
        /// Final reviewer output.
        final_reviewed_context -> Nullable<Text>,
        /// Transcriber verdict.
        is_correct -> Nullable<Bool>,
        /// Reviewer verdict.
        corrected_is_correct -> Nullable<Bool>,
        /// Final reviewer verdict.
        reviewed_is_correct -> Nullable<Bool>,
        /// Claiming transcriber.
        transcriber_id -> Nullable<Int8>,
        /// Claiming reviewer.
        reviewer_id -> Nullable<Int8>,
        /// Claiming final reviewer.
        final_reviewer_id -> Nullable<Int8>,
        /// Lifecycle state.
        #[max_length = 32]
        state -> Varchar,
        /// Import timestamp.
        created_at -> Timestamptz,
        /// Latest transcriber decision.
        submitted_at -> Nullable<Timestamptz>,
        /// Latest reviewer decision.
        reviewed_at -> Nullable<Timestamptz>,
        /// Latest final reviewer decision.
        final_reviewed_at -> Nullable<Timestamptz>,
        /// Formatted handling time.
        #[max_length = 32]
        duration -> Nullable<Varchar>,
        /// Reviewer rejections.
        reviewer_rejected_count -> Int4,
        /// Final reviewer rejections.
        final_reviewer_rejected_count -> Int4,
    }
}

diesel::joinable!(annotators -> annotation_groups (group_id));
diesel::joinable!(annotation_tasks -> annotation_groups (group_id));

diesel::allow_tables_to_appear_in_same_query!(annotation_groups, annotators, annotation_tasks);
