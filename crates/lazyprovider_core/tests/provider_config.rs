use lazyprovider_core::{
    ColumnValue, ContentDispatcher, ContentValues, NoopNotifier, ProviderConfig, ResourceUri,
    SqliteStore,
};
use std::sync::Arc;

const CONFIG: &str = r#"{
    "authority": "com.example.provider",
    "catalog": [
        {"table_name": "Items", "entity": "com.example.Item"},
        {"table_name": "Tags", "entity": "com.example.Tag"}
    ],
    "schema": [
        "CREATE TABLE Items (_id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);",
        "CREATE TABLE Tags (_id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT);"
    ]
}"#;

#[test]
fn config_file_drives_router_and_storage() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("provider.json");
    let mut config: ProviderConfig = serde_json::from_str(CONFIG).unwrap();
    config.database_path = Some(dir.path().join("provider.db"));
    std::fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = ProviderConfig::load(&config_path).unwrap();
    assert_eq!(loaded, config);

    let router = Arc::new(loaded.build_router().unwrap());
    let conn = loaded.open_connection().unwrap();
    let dispatcher = ContentDispatcher::new(router, SqliteStore::new(&conn), NoopNotifier);

    let tags = ResourceUri::parse("content://com.example.provider/tags").unwrap();
    let created = dispatcher
        .insert(&tags, &ContentValues::new().with("label", "urgent"))
        .unwrap()
        .unwrap();
    assert_eq!(created.path_segments()[0], "tags");

    let rows = dispatcher.query(&tags, None, None, &[], None).unwrap();
    assert_eq!(rows.get(0, "label"), Some(&ColumnValue::from("urgent")));
    assert_eq!(
        dispatcher.get_type(&created).unwrap(),
        "vnd.com.example.provider.item/vnd.com.example.provider.Tags"
    );
}

#[test]
fn catalog_order_fixes_route_codes() {
    let config = ProviderConfig::from_json_str(CONFIG).unwrap();
    let router = config.build_router().unwrap();

    let tags_item = ResourceUri::parse("content://com.example.provider/tags/5").unwrap();
    assert_eq!(router.match_uri(&tags_item).map(|code| code.get()), Some(4));
}

#[test]
fn missing_config_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let err = ProviderConfig::load(&missing).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}
