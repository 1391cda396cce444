use std::io::Write;

use chrono::NaiveTime;
use secrecy::ExposeSecret;
use serial_test::serial;
use tempfile::NamedTempFile;

use scan_diary::{
    catalog::CatalogMode,
    config::{AppConfig, ConfigLoadError},
    meal::MealType,
};

const VARS: [&str; 6] = [
    "SPARKY_API_KEY",
    "SPARKY_URL",
    "USDA_PROVIDER_ID",
    "LUNCH_WINDOW",
    "CATALOG_MODE",
    "SCALE_URL",
];

// SAFETY (all tests): env mutation is serialized with `#[serial]`.
fn clear_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

fn write_config(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tempfile");
    file.write_all(body.as_bytes()).expect("write");
    file
}

#[test]
#[serial]
fn file_then_environment() {
    clear_env();
    let file = write_config(
        r#"
sparky_url = "http://10.1.1.86:3010/"
scale_url = "http://10.1.1.90/weight"
catalog_mode = "create_or_get"

[meals]
Lunch = "11:30-14:00"
"#,
    );
    unsafe {
        std::env::set_var("SPARKY_API_KEY", "secret");
        std::env::set_var("USDA_PROVIDER_ID", "  ");
        std::env::set_var("CATALOG_MODE", "direct");
    }

    let cfg = AppConfig::load(Some(file.path())).expect("config");
    clear_env();

    assert_eq!(cfg.api_key.expose_secret(), "secret");
    assert_eq!(cfg.tracker_url, "http://10.1.1.86:3010");
    assert_eq!(cfg.scale_url.as_deref(), Some("http://10.1.1.90/weight"));
    // Blank counts as unset.
    assert!(cfg.usda_provider_id.is_none());
    assert_eq!(cfg.catalog_mode, CatalogMode::Direct);
    assert_eq!(
        cfg.meals.resolve(NaiveTime::from_hms_opt(13, 45, 0).unwrap()),
        MealType::Lunch
    );
}

#[test]
#[serial]
fn missing_key_fails_even_with_file() {
    clear_env();
    let file = write_config("sparky_url = \"http://localhost:3010\"\n");
    let err = AppConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Invalid(_)));
    assert!(err.to_string().contains("SPARKY_API_KEY"));
}

#[test]
#[serial]
fn unreadable_and_malformed_files_are_reported() {
    clear_env();
    unsafe { std::env::set_var("SPARKY_API_KEY", "secret") };

    let missing = std::path::Path::new("/nonexistent/scan-diary.toml");
    assert!(matches!(
        AppConfig::load(Some(missing)),
        Err(ConfigLoadError::Read { .. })
    ));

    let file = write_config("meals = 5\n");
    assert!(matches!(
        AppConfig::load(Some(file.path())),
        Err(ConfigLoadError::Parse { .. })
    ));
    clear_env();
}
