//! Tests for settings resolution

use super::*;
use clap::CommandFactory;
use std::ffi::OsStr;

fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("jsontv").chain(args.iter().copied()))
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_defaults_with_single_url() {
    let settings =
        Settings::resolve(parse(&["--url", "http://a/guide"]).unwrap(), FileConfig::default())
            .unwrap();

    assert_eq!(settings.urls, strings(&["http://a/guide"]));
    assert_eq!(settings.channel_map, None);
    assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT));
    assert!(!settings.fake_data);
    assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(settings.logo_base, DEFAULT_LOGO_BASE);
    assert_eq!(settings.retries, 3);
}

#[test]
fn test_missing_url_is_config_error() {
    let result = Settings::resolve(Cli::default(), FileConfig::default());
    assert!(matches!(result, Err(GuideError::Config(_))));

    let cli = Cli {
        urls: strings(&["", "  "]),
        ..Cli::default()
    };
    let result = Settings::resolve(cli, FileConfig::default());
    assert!(matches!(result, Err(GuideError::Config(_))));
}

#[test]
fn test_repeated_and_comma_separated_urls_keep_order() {
    let cli = parse(&["--url", "b,c", "--url=a", "--fake-data"]).unwrap();
    let settings = Settings::resolve(cli, FileConfig::default()).unwrap();
    assert_eq!(settings.urls, strings(&["b", "c", "a"]));
    assert!(settings.fake_data);
}

#[test]
fn test_command_line_wins_over_file() {
    let file = FileConfig {
        urls: strings(&["file-url"]),
        channel_map: Some("file-map.json".to_string()),
        output: Some("file.xml".to_string()),
        retries: Some(7),
        ..FileConfig::default()
    };
    let cli = parse(&["--output", "cli.xml", "--retries", "5"]).unwrap();

    let settings = Settings::resolve(cli, file).unwrap();
    assert_eq!(settings.urls, strings(&["file-url"]));
    assert_eq!(settings.channel_map.as_deref(), Some("file-map.json"));
    assert_eq!(settings.output, PathBuf::from("cli.xml"));
    assert_eq!(settings.retries, 5);
    assert_eq!(settings.download_config().max_retries, 5);
}

#[test]
fn test_zero_retries_in_file_is_rejected() {
    let file = FileConfig {
        urls: strings(&["u"]),
        retries: Some(0),
        ..FileConfig::default()
    };
    let result = Settings::resolve(Cli::default(), file);
    assert!(matches!(result, Err(GuideError::Config(_))));
}

#[test]
fn test_settings_are_bound_to_environment_variables() {
    let command = Cli::command();
    for (id, env) in [
        ("urls", ENV_URLS),
        ("channel_map", ENV_CHANNEL_MAP),
        ("output", ENV_OUTPUT),
        ("fake_data", ENV_FAKE_DATA),
        ("user_agent", ENV_USER_AGENT),
        ("logo_base", ENV_LOGO_BASE),
        ("retries", ENV_RETRIES),
    ] {
        let arg = command
            .get_arguments()
            .find(|a| a.get_id().as_str() == id)
            .unwrap_or_else(|| panic!("no argument {}", id));
        assert_eq!(arg.get_env(), Some(OsStr::new(env)), "{}", id);
    }
}

#[test]
fn test_bad_arguments_are_rejected() {
    assert!(parse(&["--url", "a", "--bogus"]).is_err());
    assert!(parse(&["--url"]).is_err());
    assert!(parse(&["--url", "a", "--retries", "zero"]).is_err());
    assert!(parse(&["--url", "a", "--retries", "0"]).is_err());

    let err = parse(&["--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_file_config_deserializes_with_defaults() {
    let config: FileConfig = serde_json::from_str(r#"{"urls": ["x"], "fake_data": true}"#).unwrap();
    assert_eq!(config.urls, strings(&["x"]));
    assert!(config.fake_data);
    assert_eq!(config.output, None);
}
