//! Layering of built-in defaults, `flow-labs.toml` and `FLOW_LABS_*` variables.

use std::path::PathBuf;

use flow_labs::config::DemoConfig;
use serial_test::serial;

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("flow-labs-{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn set_env(key: &str, value: &str) {
    // tests touching the environment run under #[serial]
    unsafe { std::env::set_var(key, value) }
}

fn remove_env(key: &str) {
    unsafe { std::env::remove_var(key) }
}

#[test]
#[serial]
fn env_overrides_window_settings() {
    set_env("FLOW_LABS_WINDOW__TITLE", "Title From Env");
    set_env("FLOW_LABS_WINDOW__WIDTH", "800");
    let config = DemoConfig::titled("Cubes").load_from("does/not/exist.toml").unwrap();
    remove_env("FLOW_LABS_WINDOW__TITLE");
    remove_env("FLOW_LABS_WINDOW__WIDTH");

    assert_eq!(config.window.title, "Title From Env");
    assert_eq!(config.window.width, 800);
    assert_eq!(config.window.height, 720);
}

#[test]
#[serial]
fn file_overrides_demo_defaults() {
    let path = write_config(
        "file",
        r#"
clear_colour = [1.0, 0.0, 0.0, 1.0]

[window]
vsync = false
max_fps = 30.0
"#,
    );
    let config = DemoConfig::titled("Solar System")
        .with_max_fps(120.0)
        .load_from(&path)
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.window.title, "Solar System");
    assert!(!config.window.vsync);
    assert_eq!(config.window.max_fps, Some(30.0));
    assert_eq!(config.clear_colour, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
#[serial]
fn env_wins_over_file() {
    let mut table = toml::Table::new();
    table.insert("assets_dir".into(), toml::Value::String("/from/file".into()));
    let path = write_config("layered", &toml::to_string(&table).unwrap());
    set_env("FLOW_LABS_ASSETS_DIR", "/from/env");
    let config = DemoConfig::default().load_from(&path);
    remove_env("FLOW_LABS_ASSETS_DIR");
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.unwrap().assets_dir, PathBuf::from("/from/env"));
}

#[test]
#[serial]
fn absolute_assets_dir_is_kept_even_when_missing() {
    let path = write_config("assets", "assets_dir = \"/no/such/assets\"\n");
    let config = DemoConfig::default().load_from(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.assets_dir, PathBuf::from("/no/such/assets"));
}

#[test]
#[serial]
fn malformed_values_are_reported() {
    set_env("FLOW_LABS_WINDOW__WIDTH", "wide");
    let result = DemoConfig::default().load_from("does/not/exist.toml");
    remove_env("FLOW_LABS_WINDOW__WIDTH");

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
