//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use merit_config::{ConfigError, DisplayFormat, MeritConfig, PROJECT_CONFIG};

#[test]
fn loads_output_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[output]
format = "table"
max_width = 120
indent = 2
"#,
        )?;

        let config: MeritConfig = Figment::from(Serialized::defaults(MeritConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.output.format, DisplayFormat::Table);
        assert_eq!(config.output.max_width, 120);
        assert_eq!(config.output.indent, 2);
        assert_eq!(config.input.format, merit_core::Format::Json);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".merit")?;
        jail.create_file(
            PROJECT_CONFIG,
            r#"
[input]
format = "yaml"
"#,
        )?;

        let config = MeritConfig::load().expect("config loads");
        assert_eq!(config.input.format, merit_core::Format::Yaml);
        assert_eq!(config.output.max_width, 80);
        Ok(())
    });
}

#[test]
fn partial_section_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[output]\nmax_width = 100\n")?;

        let config: MeritConfig = Figment::from(Serialized::defaults(MeritConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.output.max_width, 100);
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.output.format, DisplayFormat::Json);
        Ok(())
    });
}

#[test]
fn out_of_range_width_fails_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".merit")?;
        jail.create_file(PROJECT_CONFIG, "[output]\nmax_width = 12\n")?;

        let err = MeritConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}

#[test]
fn unknown_format_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".merit")?;
        jail.create_file(PROJECT_CONFIG, "[output]\nformat = \"xml\"\n")?;

        let err = MeritConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}
