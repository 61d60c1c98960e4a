use std::io::Write;
use tforge_kernel::config::load_config;
use tforge_kernel::domain::config::ApiConfig;

#[test]
fn loads_a_toml_file_over_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[server]
port = 8181

[security]
api_token = "file-token"

[toolchain]
max_concurrent_builds = 2

[toolchain.deployer]
args = ["--endpoint", "https://rpc.example"]
"#
    )?;

    let cfg: ApiConfig = load_config(Some(file.path()))?;
    assert_eq!(cfg.server.port, 8181);
    assert_eq!(cfg.security.api_token, "file-token");
    assert_eq!(cfg.toolchain.max_concurrent_builds, 2);
    assert_eq!(cfg.toolchain.deployer.args, vec!["--endpoint", "https://rpc.example"]);
    assert_eq!(cfg.toolchain.compiler.program, "python3.9");
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_error() {
    let res: Result<ApiConfig, _> = load_config(Some("/definitely/not/here/tforge.toml"));
    assert!(res.is_err());
}

#[test]
fn malformed_values_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[server]\nport = \"not-a-port\"")?;

    let err = load_config::<ApiConfig>(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("deserialize"));
    Ok(())
}
