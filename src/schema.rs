diesel::table! {
    articles (id) {
        id -> Integer,
        title -> Text,
        full_text -> Text,
        category_id -> Nullable<Integer>,
        user_id -> Integer,
        published_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    categories (id) {
        id -> Integer,
        name -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    organization_user (user_id, organization_id) {
        user_id -> Integer,
        organization_id -> Integer,
        role_id -> Integer,
    }
}

diesel::table! {
    roles (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    sessions (id) {
        id -> Integer,
        user_id -> Integer,
        organization_id -> Nullable<Integer>,
        organization_name -> Nullable<Text>,
        organization_role_id -> Nullable<Integer>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    users (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
        password_hash -> Text,
        role_id -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::joinable!(articles -> categories (category_id));
diesel::joinable!(articles -> users (user_id));
diesel::joinable!(users -> roles (role_id));

diesel::allow_tables_to_appear_in_same_query!(
    articles,
    categories,
    organization_user,
    roles,
    sessions,
    users,
);
