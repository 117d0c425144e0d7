diesel::table! {
    packages (name) {
        name -> Text,
        curated -> Bool,
        tag -> Nullable<Text>,
        description -> Nullable<Text>,
        native -> Bool,
    }
}
