use map_maker::config::{
    ENV_APP_ID, ENV_LAT_FIELD, ENV_MASTER_KEY, ENV_PASSWORD, ENV_SERVER_URL, ENV_TABLE,
    ENV_USERNAME,
};
use map_maker::{ConnectionSettings, LocationFields, MapError, StoreClient};
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_blank_server_defaults_to_localhost() {
    let settings = ConnectionSettings::from_lookup(lookup_from(&[
        (ENV_SERVER_URL, "   "),
        (ENV_APP_ID, "mapApp"),
        (ENV_TABLE, "Cities"),
    ]))
    .expect("settings should load");

    assert_eq!(settings.server_url, "localhost");
    assert_eq!(settings.app_id, "mapApp");
    assert_eq!(settings.table, "Cities");
    assert_eq!(settings.credentials, None);
    assert_eq!(settings.fields, LocationFields::default());

    let client = StoreClient::from_settings(&settings).expect("client should build");
    assert_eq!(client.server_url, "http://localhost");
}

#[test]
fn test_missing_required_values() {
    let no_app = ConnectionSettings::from_lookup(lookup_from(&[(ENV_TABLE, "Cities")]));
    assert!(matches!(no_app, Err(MapError::Config(msg)) if msg.contains(ENV_APP_ID)));

    let no_table = ConnectionSettings::from_lookup(lookup_from(&[(ENV_APP_ID, "mapApp")]));
    assert!(matches!(no_table, Err(MapError::Config(msg)) if msg.contains(ENV_TABLE)));
}

#[test]
fn test_credentials_and_field_overrides() {
    let settings = ConnectionSettings::from_lookup(lookup_from(&[
        (ENV_SERVER_URL, "http://maps.internal:1338/parse"),
        (ENV_APP_ID, "mapApp"),
        (ENV_TABLE, "Cities"),
        (ENV_MASTER_KEY, "mk"),
        (ENV_USERNAME, "cartographer"),
        (ENV_PASSWORD, "s3cret"),
        (ENV_LAT_FIELD, "latitude"),
    ]))
    .unwrap();

    let credentials = settings.credentials.as_ref().expect("credentials present");
    assert_eq!(credentials.username, "cartographer");
    assert_eq!(credentials.password, "s3cret");
    assert!(!format!("{:?}", credentials).contains("s3cret"));
    assert_eq!(settings.master_key.as_deref(), Some("mk"));
    assert_eq!(settings.fields.lat, "latitude");
    assert_eq!(settings.fields.long, "long");
}

#[test]
fn test_username_without_password_is_rejected() {
    let result = ConnectionSettings::from_lookup(lookup_from(&[
        (ENV_APP_ID, "mapApp"),
        (ENV_TABLE, "Cities"),
        (ENV_USERNAME, "cartographer"),
    ]));
    assert!(matches!(result, Err(MapError::Config(_))));
}
