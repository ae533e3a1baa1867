use routerkit_core::config::*;
use routerkit_core::Error;

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routerkit.json");

    let config = Config::new()
        .with_parser(ParserConfig::strict())
        .with_output(OutputConfig::default().with_precision(3));
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routerkit.toml");

    let config = Config::new().with_toolpath(ToolpathConfig::new().with_parallel(true));
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert!(loaded.toolpath.parallel);
    assert_eq!(loaded.geometry, GeometryConfig::default());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routerkit.yaml");
    let err = Config::new().save_to_file(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_invalid_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"geometry": {"max_arc_segment_angle": -1.0}}"#).unwrap();
    assert!(Config::load_from_file(&path).is_err());
}
