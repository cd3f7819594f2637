diesel::table! {
    posts (id) {
        id -> BigInt,
        title -> Text,
        body -> Text,
        author -> Text,
        category -> Text,
        created_ns -> BigInt,
    }
}
