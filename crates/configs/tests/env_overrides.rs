use configs::{AppConfig, Backend};

// Environment variables are process-wide, so every override is exercised in a single test.
#[test]
fn env_overrides_apply_on_top_of_file() -> Result<(), anyhow::Error> {
    let tmp = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&tmp, "[storage]\nbackend = \"session\"\ndata_dir = \"from-file\"\n")?;

    std::env::set_var("CONTAINER_CONFIG_PATH", &tmp);
    std::env::remove_var("CONTAINER_BACKEND");
    std::env::remove_var("CONTAINER_DATA_DIR");

    let cfg = AppConfig::load_and_validate()?;
    assert_eq!(cfg.storage.backend, Backend::Session);
    assert_eq!(cfg.storage.data_dir, "from-file");

    std::env::set_var("CONTAINER_BACKEND", "local");
    std::env::set_var("CONTAINER_DATA_DIR", "from-env");
    let cfg = AppConfig::load_and_validate()?;
    assert_eq!(cfg.storage.backend, Backend::Local);
    assert_eq!(cfg.storage.data_dir, "from-env");

    std::env::set_var("CONTAINER_BACKEND", "bogus");
    assert!(AppConfig::load_and_validate().is_err());

    // missing file falls back to defaults
    std::env::remove_var("CONTAINER_BACKEND");
    std::env::remove_var("CONTAINER_DATA_DIR");
    std::env::set_var("CONTAINER_CONFIG_PATH", tmp.with_extension("missing"));
    let cfg = AppConfig::load_and_validate()?;
    assert_eq!(cfg.storage.backend, Backend::Memory);
    assert_eq!(cfg.storage.data_dir, "data");

    std::env::remove_var("CONTAINER_CONFIG_PATH");
    let _ = std::fs::remove_file(&tmp);
    Ok(())
}
