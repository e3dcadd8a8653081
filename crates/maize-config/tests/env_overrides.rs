use figment::Jail;
use maize_config::{Environment, MaizeConfig};
use pretty_assertions::assert_eq;

#[test]
fn defaults_without_any_source() {
    Jail::expect_with(|_jail| {
        let config = MaizeConfig::load().expect("config loads");
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.clerk.verify_timeout_ms, 5000);
        assert!(config.auth.allow_dev_header);
        Ok(())
    });
}

#[test]
fn nested_env_vars_map_to_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("MAIZECARE_CLERK__SECRET_KEY", "sk_from_env");
        jail.set_env("MAIZECARE_AUTH__ALLOW_DEV_HEADER", "false");
        jail.set_env("MAIZECARE_GENERAL__ENVIRONMENT", "production");
        jail.set_env("MAIZECARE_UPLOADS__MAX_BYTES", "1024");

        let config = MaizeConfig::load().expect("config loads");
        assert_eq!(config.clerk.secret_key, "sk_from_env");
        assert!(!config.auth.allow_dev_header);
        assert_eq!(config.general.environment, Environment::Production);
        assert_eq!(config.uploads.max_bytes, 1024);
        Ok(())
    });
}

#[test]
fn unprefixed_env_is_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("SERVER__PORT", "1234");
        let config = MaizeConfig::load().expect("config loads");
        assert_eq!(config.server.port, 5000);
        Ok(())
    });
}

#[test]
fn explicit_file_sits_below_env() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[database]
path = "from-file.db"

[server]
port = 7000
"#,
        )?;
        jail.set_env("MAIZECARE_SERVER__PORT", "7001");

        let config =
            MaizeConfig::load_from_file(std::path::Path::new("custom.toml")).expect("loads");
        assert_eq!(config.database.path, "from-file.db");
        assert_eq!(config.server.port, 7001);
        Ok(())
    });
}
