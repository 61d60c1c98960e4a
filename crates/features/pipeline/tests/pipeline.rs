#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tforge_composer::GeneratedArtifact;
use tforge_domain::config::ToolchainConfig;
use tforge_pipeline::{DeployOutcome, Pipeline, PipelineError};

const OWNER: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";
const ADDRESS: &str = "KT1HbQepzV1nVGg8QVznG7z4RcHseD5kwqBn";

const COMPILER_OK: &str = r#"
id="${1%.py}"
id="${id#contract_}"
mkdir -p "$id"
echo 'parameter unit; storage unit; code { CDR; NIL operation; PAIR };' > "$id/step_003_cont_0_contract.tz"
echo 'Unit' > "$id/step_003_cont_0_storage.tz"
"#;

struct Harness {
    tools: TempDir,
    scratch: TempDir,
}

impl Harness {
    fn new() -> Self {
        Self { tools: tempfile::tempdir().unwrap(), scratch: tempfile::tempdir().unwrap() }
    }

    fn script(&self, name: &str, body: &str) -> String {
        let path = self.tools.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    fn args_log(&self) -> PathBuf {
        self.tools.path().join("deployer.args")
    }

    fn pipeline(&self, compiler: &str, deployer: &str) -> Pipeline {
        let mut config = ToolchainConfig { scratch_dir: self.scratch.path().to_path_buf(), ..Default::default() };
        config.compiler.program = compiler.to_owned();
        config.compiler.timeout_secs = 10;
        config.deployer.program = deployer.to_owned();
        config.deployer.timeout_secs = 10;
        Pipeline::new(&config)
    }

    fn scratch_is_empty(&self) -> bool {
        fs::read_dir(self.scratch.path()).unwrap().next().is_none()
    }
}

fn artifact() -> GeneratedArtifact {
    GeneratedArtifact::new(tforge_kernel::safe_nanoid!(), "print('contract')\n".to_owned())
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(str::to_owned).collect()
}

#[tokio::test]
async fn successful_run_reports_the_address_and_cleans_up() {
    let h = Harness::new();
    let compiler = h.script("compiler", COMPILER_OK);
    let deployer = h.script(
        "deployer",
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\necho 'Operation successfully injected'\necho 'New contract {ADDRESS} originated.'\n",
            h.args_log().display()
        ),
    );

    let artifact = artifact();
    let report = h.pipeline(&compiler, &deployer).run(&artifact, OWNER).await.unwrap();

    assert_eq!(report.outcome, DeployOutcome::Deployed { address: ADDRESS.to_owned() });
    assert_eq!(report.outcome.address().map(str::len), Some(36));
    assert_eq!(report.fingerprint, artifact.fingerprint);
    assert!(h.scratch_is_empty());

    let args = read_lines(&h.args_log());
    assert_eq!(&args[..3], ["originate", "contract", artifact.contract_id.as_str()]);
    assert_eq!(args[6], OWNER);
    assert_eq!(args[8], "parameter unit; storage unit; code { CDR; NIL operation; PAIR };");
    assert_eq!(args[10], "Unit");
}

#[tokio::test]
async fn compiler_failure_leaves_no_scratch_artifacts() {
    let h = Harness::new();
    let compiler = h.script("compiler", "mkdir -p partial\necho 'SyntaxError: boom' >&2\nexit 1\n");
    let deployer = h.script("deployer", "exit 0\n");

    let err = h.pipeline(&compiler, &deployer).run(&artifact(), OWNER).await.unwrap_err();
    let PipelineError::Compile { message, .. } = &err else {
        panic!("expected a compile error, got {err}");
    };
    assert!(message.contains("SyntaxError: boom"), "{message}");
    assert!(h.scratch_is_empty());
}

#[tokio::test]
async fn missing_artifacts_are_compile_errors() {
    let h = Harness::new();
    let compiler = h.script("compiler", "exit 0\n");
    let deployer = h.script("deployer", "exit 0\n");

    let err = h.pipeline(&compiler, &deployer).run(&artifact(), OWNER).await.unwrap_err();
    assert!(err.to_string().contains("step_003_cont_0_contract.tz"), "{err}");
    assert!(h.scratch_is_empty());
}

#[tokio::test]
async fn rejected_deployments_are_outcomes_not_errors() {
    let h = Harness::new();
    let compiler = h.script("compiler", COMPILER_OK);
    let deployer = h.script("deployer", "echo 'Error: unknown account' >&2\nexit 1\n");

    let report = h.pipeline(&compiler, &deployer).run(&artifact(), OWNER).await.unwrap();
    assert_eq!(report.outcome, DeployOutcome::Rejected { exit_code: 1 });
    assert_eq!(report.outcome.address(), None);
    assert!(h.scratch_is_empty());
}

#[tokio::test]
async fn unlaunchable_deployer_is_a_launch_error() {
    let h = Harness::new();
    let compiler = h.script("compiler", COMPILER_OK);
    let missing = h.tools.path().join("no-such-deployer").display().to_string();

    let err = h.pipeline(&compiler, &missing).run(&artifact(), OWNER).await.unwrap_err();
    assert!(matches!(err, PipelineError::DeployLaunch { .. }), "{err}");
    assert!(h.scratch_is_empty());
}

#[tokio::test]
async fn slow_compilers_time_out() {
    let h = Harness::new();
    let compiler = h.script("compiler", "sleep 5\n");
    let deployer = h.script("deployer", "exit 0\n");

    let mut config = ToolchainConfig { scratch_dir: h.scratch.path().to_path_buf(), ..Default::default() };
    config.compiler.program = compiler;
    config.compiler.timeout_secs = 1;
    config.deployer.program = deployer;

    let err = Pipeline::new(&config).run(&artifact(), OWNER).await.unwrap_err();
    assert!(matches!(err, PipelineError::Timeout { secs: 1, .. }), "{err}");
    assert!(h.scratch_is_empty());
}

#[tokio::test]
async fn closed_pipeline_is_busy() {
    let h = Harness::new();
    let pipeline = h.pipeline("true", "true");
    pipeline.close();
    let err = pipeline.run(&artifact(), OWNER).await.unwrap_err();
    assert!(matches!(err, PipelineError::Busy { .. }));
}

#[tokio::test]
async fn ids_that_could_escape_the_scratch_root_are_refused() {
    let h = Harness::new();
    let pipeline = h.pipeline("true", "true");
    let evil = GeneratedArtifact::new("../../etc/xx", String::new());
    let err = pipeline.run(&evil, OWNER).await.unwrap_err();
    assert!(matches!(err, PipelineError::Internal { .. }));
    assert!(h.scratch_is_empty());
}
