//! Diesel table definitions for the back-office schema.
//!
//! Timestamps (`created_at`, `updated_at`) are assigned by column defaults
//! and triggers on the database side; the adapters never write them.

diesel::table! {
    clients (id) {
        id -> Uuid,
        display_name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    goals (id) {
        id -> Uuid,
        client_id -> Uuid,
        recorded_by -> Uuid,
        title -> Varchar,
        details -> Nullable<Text>,
        target_on -> Nullable<Date>,
        achieved -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    wins (id) {
        id -> Uuid,
        client_id -> Uuid,
        recorded_by -> Uuid,
        title -> Varchar,
        won_on -> Date,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    tags (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    win_tags (win_id, tag_id) {
        win_id -> Uuid,
        tag_id -> Uuid,
    }
}

diesel::table! {
    assignments (id) {
        id -> Uuid,
        client_id -> Uuid,
        recorded_by -> Uuid,
        title -> Varchar,
        assigned_on -> Date,
        completed -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    activity_periods (id) {
        id -> Uuid,
        client_id -> Uuid,
        // Null for system-generated periods (slot assignment side effects).
        recorded_by -> Nullable<Uuid>,
        starts_on -> Date,
        ends_on -> Date,
        payment_slot_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    nps_scores (id) {
        id -> Uuid,
        client_id -> Uuid,
        recorded_by -> Uuid,
        score -> Int2,
        recorded_on -> Date,
        comment -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    testimonials (id) {
        id -> Uuid,
        client_id -> Uuid,
        recorded_by -> Uuid,
        quote -> Text,
        given_on -> Date,
        published -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    payment_plan_templates (id) {
        id -> Uuid,
        name -> Varchar,
        program_months -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    template_slots (id) {
        id -> Uuid,
        // Restricting foreign key: a template cannot be deleted while
        // referenced.
        template_id -> Uuid,
        amount_due_cents -> Int8,
        months_to_delay -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    payment_plans (id) {
        id -> Uuid,
        client_id -> Uuid,
        recorded_by -> Uuid,
        template_id -> Nullable<Uuid>,
        term_starts_on -> Date,
        term_ends_on -> Date,
        total_amount_cents -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    payment_slots (id) {
        id -> Uuid,
        // Deleting a plan cascades to its slots.
        plan_id -> Uuid,
        // Null when the slot was produced by schedule expansion.
        recorded_by -> Nullable<Uuid>,
        amount_due_cents -> Int8,
        amount_paid_cents -> Int8,
        due_on -> Date,
        notes -> Text,
        payment_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    payments (id) {
        id -> Uuid,
        client_id -> Uuid,
        amount_cents -> Int8,
        paid_on -> Date,
        payment_slot_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(goals -> clients (client_id));
diesel::joinable!(wins -> clients (client_id));
diesel::joinable!(win_tags -> wins (win_id));
diesel::joinable!(win_tags -> tags (tag_id));
diesel::joinable!(assignments -> clients (client_id));
diesel::joinable!(activity_periods -> clients (client_id));
diesel::joinable!(nps_scores -> clients (client_id));
diesel::joinable!(testimonials -> clients (client_id));
diesel::joinable!(template_slots -> payment_plan_templates (template_id));
diesel::joinable!(payment_plans -> clients (client_id));
diesel::joinable!(payment_slots -> payment_plans (plan_id));
diesel::joinable!(payments -> clients (client_id));

diesel::allow_tables_to_appear_in_same_query!(
    clients,
    goals,
    wins,
    tags,
    win_tags,
    assignments,
    activity_periods,
    nps_scores,
    testimonials,
    payment_plan_templates,
    template_slots,
    payment_plans,
    payment_slots,
    payments,
);
