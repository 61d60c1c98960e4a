use serde_json::json;
use tforge_domain::config::{ApiConfig, CompilerConfig, DeployerConfig, ServerConfig};
use tforge_domain::constants::{DEFAULT_CONTRACT_ARTIFACT, DEFAULT_METADATA_URL};

#[test]
fn defaults_reproduce_the_reference_toolchain() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 8000);
    assert!(server.cors_permissive);
    assert!(server.ssl.is_none());

    let compiler = CompilerConfig::default();
    assert_eq!(compiler.program, "python3.9");
    assert_eq!(compiler.contract_artifact, DEFAULT_CONTRACT_ARTIFACT);

    let deployer = DeployerConfig::default();
    assert_eq!(deployer.program, "octez-client");
    assert_eq!(deployer.transfer_amount, ".0001");
    assert_eq!(deployer.burn_cap, "1");
    assert_eq!(deployer.marker, "New contract ");
    assert_eq!(deployer.address_len, 36);

    let cfg = ApiConfig::default();
    assert!(cfg.security.api_token.is_empty());
    assert_eq!(cfg.template.metadata_url, DEFAULT_METADATA_URL);
}

#[test]
fn partial_documents_keep_defaults_for_the_rest() {
    let raw = json!({
        "server": { "port": 9090 },
        "security": { "api_token": "s3cret" },
        "toolchain": {
            "scratch_dir": "/var/tmp/forge",
            "compiler": { "program": "smartpy", "args": ["test"] },
            "deployer": { "args": ["--endpoint", "https://ghostnet.example"] }
        }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 9090);
    assert_eq!(cfg.security.api_token, "s3cret");
    assert_eq!(cfg.toolchain.scratch_dir, std::path::PathBuf::from("/var/tmp/forge"));
    assert_eq!(cfg.toolchain.compiler.args, vec!["test".to_owned()]);
    assert_eq!(cfg.toolchain.compiler.timeout_secs, 120);
    assert_eq!(cfg.toolchain.deployer.program, "octez-client");
    assert_eq!(cfg.toolchain.max_concurrent_builds, 4);
}

#[test]
fn deref_mut_copies_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.security.api_token = "rotated".to_owned();

    assert!(original.security.api_token.is_empty());
    assert_eq!(changed.security.api_token, "rotated");
}
