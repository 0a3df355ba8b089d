use figment::Jail;
use merit_config::{DisplayFormat, MeritConfig, PROJECT_CONFIG};

#[test]
fn env_sets_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("MERIT_OUTPUT__FORMAT", "raw");
        jail.set_env("MERIT_OUTPUT__MAX_WIDTH", "100");
        jail.set_env("MERIT_INPUT__FORMAT", "yaml");

        let config = MeritConfig::load().expect("config loads");
        assert_eq!(config.output.format, DisplayFormat::Raw);
        assert_eq!(config.output.max_width, 100);
        assert_eq!(config.input.format, merit_core::Format::Yaml);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".merit")?;
        jail.create_file(PROJECT_CONFIG, "[output]\nindent = 8\n")?;
        jail.set_env("MERIT_OUTPUT__INDENT", "2");

        let config = MeritConfig::load().expect("config loads");
        assert_eq!(config.output.indent, 2);
        Ok(())
    });
}

#[test]
fn dotenv_file_feeds_env_layer() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "MERIT_OUTPUT__MAX_WIDTH=90\n")?;

        let config = MeritConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.output.max_width, 90);
        Ok(())
    });
}
