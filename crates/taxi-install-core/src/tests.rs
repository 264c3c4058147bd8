use std::path::{Path, PathBuf};

use super::*;

#[test]
fn parse_release_metadata() {
    let content = r#"{
  "name": "taxi-cli",
  "desc": "Taxi command line tooling",
  "latest_version": "1.2.3",
  "versions": ["1.2.3", "1.2.2"],
  "owner": "taxi-lang"
}"#;

    let metadata = ReleaseMetadata::from_json_str(content).expect("metadata should parse");
    assert_eq!(metadata.latest_version, "1.2.3");
    assert_eq!(metadata.name.as_deref(), Some("taxi-cli"));
    assert_eq!(
        metadata.latest().expect("latest version must validate").as_str(),
        "1.2.3"
    );
}

#[test]
fn release_metadata_rejects_non_json_body() {
    let err = ReleaseMetadata::from_json_str("<html>rate limited</html>")
        .expect_err("html must not parse as metadata");
    assert!(matches!(err, InstallError::Parse { .. }));
    assert!(
        err.to_string().contains("invalid release metadata"),
        "unexpected error: {err}"
    );
}

#[test]
fn release_metadata_requires_latest_version() {
    let err = ReleaseMetadata::from_json_str(r#"{"name": "taxi-cli"}"#)
        .expect_err("missing latest_version must fail");
    assert!(matches!(err, InstallError::Parse { .. }));
    assert!(err.to_string().contains("latest_version"));
}

#[test]
fn release_metadata_rejects_null_latest_version() {
    let err = ReleaseMetadata::from_json_str(r#"{"latest_version": null}"#)
        .expect_err("null latest_version must fail");
    assert!(matches!(err, InstallError::Parse { .. }));
}

#[test]
fn release_version_trims_and_accepts_qualifiers() {
    let version = ReleaseVersion::parse(" 0.9.2-SNAPSHOT+build_7 ").expect("must parse");
    assert_eq!(version.as_str(), "0.9.2-SNAPSHOT+build_7");
    assert_eq!(version.to_string(), "0.9.2-SNAPSHOT+build_7");
}

#[test]
fn release_version_rejects_path_and_url_metacharacters() {
    for raw in ["", "   ", "..", "1.2/3", "1.2.3?x=1", "1 2", "1.2.3%2F", "../1.0"] {
        let err = ReleaseVersion::parse(raw).expect_err("unsafe version must fail");
        assert!(
            matches!(err, InstallError::Parse { .. }),
            "unexpected error for '{raw}': {err}"
        );
    }
}

#[test]
fn release_version_compares_semver_when_possible() {
    let older: ReleaseVersion = "1.9.0".parse().expect("must parse");
    let newer: ReleaseVersion = "1.10.0".parse().expect("must parse");
    assert!(newer.is_newer_than(&older));
    assert!(!older.is_newer_than(&newer));
    assert!(!newer.is_newer_than(&newer.clone()));

    let tagged: ReleaseVersion = "v1.10.1".parse().expect("must parse");
    assert!(tagged.is_newer_than(&newer));
}

#[test]
fn release_version_falls_back_to_inequality_for_non_semver() {
    let current: ReleaseVersion = "0.1".parse().expect("must parse");
    let other: ReleaseVersion = "0.2".parse().expect("must parse");
    assert!(current.semver().is_none());
    assert!(other.is_newer_than(&current));
    assert!(!current.is_newer_than(&current.clone()));
}

#[test]
fn default_config_matches_home_layout() {
    let config = InstallerConfig::for_home("/home/alice");
    assert_eq!(config.install_dir, PathBuf::from("/home/alice/.taxi"));
    assert_eq!(config.bin_dir, PathBuf::from("/home/alice/bin"));
    assert_eq!(config.runtime_command, "java -jar");
    assert_eq!(config.launcher_name, "taxi");
    assert_eq!(config.artifact_file_name, "taxi-cli.jar");
    assert_eq!(config.metadata_url, DEFAULT_METADATA_URL);
    config.validate().expect("defaults must validate");
}

#[test]
fn download_url_substitutes_every_placeholder() {
    let config = InstallerConfig::for_home("/home/alice");
    let version = ReleaseVersion::parse("1.2.3").expect("must parse");
    assert_eq!(
        config.download_url(&version),
        "https://bintray.com/taxi-lang/releases/download_file?file_path=lang%2Ftaxi%2Ftaxi-cli%2F1.2.3%2Ftaxi-cli-1.2.3.jar"
    );
}

#[test]
fn config_file_overlays_defaults() {
    let content = r#"
metadata_url = "http://mirror.test/meta"
download_url_template = "http://mirror.test/taxi-cli-{version}.jar"
install_dir = "opt/taxi"
bin_dir = "/usr/local/bin"
runtime_command = "/usr/lib/jvm/bin/java -jar"
"#;
    let file = ConfigFile::from_toml_str(content).expect("config should parse");
    let home = Path::new("/home/alice");
    let mut config = InstallerConfig::for_home(home);
    config.apply_file(home, file);

    assert_eq!(config.metadata_url, "http://mirror.test/meta");
    assert_eq!(config.install_dir, PathBuf::from("/home/alice/opt/taxi"));
    assert_eq!(config.bin_dir, PathBuf::from("/usr/local/bin"));
    assert_eq!(config.runtime_command, "/usr/lib/jvm/bin/java -jar");
    assert_eq!(config.launcher_name, DEFAULT_LAUNCHER_NAME);
    config.validate().expect("overlaid config must validate");
}

#[test]
fn config_file_rejects_unknown_keys() {
    let err = ConfigFile::from_toml_str("metadata_uri = \"http://typo.test\"\n")
        .expect_err("unknown key must fail");
    assert!(
        err.chain()
            .any(|cause| matches!(
                cause.downcast_ref::<InstallError>(),
                Some(InstallError::Config { .. })
            )),
        "unexpected error: {err:#}"
    );
}

#[test]
fn config_validation_requires_version_placeholder() {
    let mut config = InstallerConfig::for_home("/home/alice");
    config.download_url_template = "http://mirror.test/taxi-cli.jar".to_string();
    let err = config.validate().expect_err("template without placeholder must fail");
    assert!(err.to_string().contains(VERSION_PLACEHOLDER));
}

#[test]
fn config_validation_rejects_nested_file_names() {
    let mut config = InstallerConfig::for_home("/home/alice");
    config.launcher_name = "../taxi".to_string();
    assert!(config.validate().is_err());

    let mut config = InstallerConfig::for_home("/home/alice");
    config.artifact_file_name = "lib/taxi-cli.jar".to_string();
    assert!(config.validate().is_err());

    let mut config = InstallerConfig::for_home("/home/alice");
    config.artifact_file_name = config.launcher_name.clone();
    assert!(config.validate().is_err());
}

#[test]
fn config_validation_rejects_multiline_runtime() {
    let mut config = InstallerConfig::for_home("/home/alice");
    config.runtime_command = "java -jar\nrm -rf".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn filesystem_error_names_action_and_path() {
    let err = InstallError::filesystem(
        "create directory",
        "/home/alice/.taxi",
        std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    );
    assert_eq!(err.to_string(), "failed to create directory /home/alice/.taxi");
}
