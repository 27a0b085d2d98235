use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Exit code and canned output for one terraform subcommand.
pub struct Step {
    pub exit_code: i32,
    pub output: &'static str,
}

impl Step {
    pub fn ok(output: &'static str) -> Self {
        Self {
            exit_code: 0,
            output,
        }
    }

    pub fn fail(output: &'static str) -> Self {
        Self {
            exit_code: 1,
            output,
        }
    }
}

/// Scripted behavior of the fake terraform binary.
pub struct FakeBehavior {
    pub init: Step,
    pub first_apply: Step,
    pub second_apply: Step,
    pub destroy: Step,
}

impl Default for FakeBehavior {
    fn default() -> Self {
        Self {
            init: Step::ok("Terraform has been successfully initialized!"),
            first_apply: Step::ok("Apply complete! Resources: 1 added, 0 changed, 0 destroyed."),
            second_apply: Step::ok("Apply complete! Resources: 1 added, 0 changed, 0 destroyed."),
            destroy: Step::ok("Destroy complete! Resources: 1 destroyed."),
        }
    }
}

/// A fake `terraform` binary plus a template directory, for driving the
/// orchestrator without real infrastructure. The script records every
/// subcommand it receives, so tests can assert on invocation order.
pub struct FakeTerraform {
    root: TempDir,
}

impl FakeTerraform {
    pub fn install(behavior: &FakeBehavior) -> Self {
        let root = tempfile::tempdir().unwrap();
        let log = root.path().join("invocations.log");
        fs::write(&log, "").unwrap();

        let script = format!(
            r#"#!/bin/sh
log="{log}"
echo "$1" >> "$log"
case "$1" in
  version)
    echo "Terraform v1.6.6"
    exit 0
    ;;
  init)
    cat <<'INIT'
{init_output}
INIT
    exit {init_code}
    ;;
  apply)
    applies=$(grep -c '^apply$' "$log")
    if [ "$applies" -le 1 ]; then
      cat <<'FIRST_APPLY'
{first_output}
FIRST_APPLY
      exit {first_code}
    fi
    cat <<'SECOND_APPLY'
{second_output}
SECOND_APPLY
    exit {second_code}
    ;;
  destroy)
    cat <<'DESTROY'
{destroy_output}
DESTROY
    exit {destroy_code}
    ;;
  *)
    echo "unexpected terraform subcommand: $1" >&2
    exit 64
    ;;
esac
"#,
            log = log.display(),
            init_output = behavior.init.output,
            init_code = behavior.init.exit_code,
            first_output = behavior.first_apply.output,
            first_code = behavior.first_apply.exit_code,
            second_output = behavior.second_apply.output,
            second_code = behavior.second_apply.exit_code,
            destroy_output = behavior.destroy.output,
            destroy_code = behavior.destroy.exit_code,
        );

        let binary = root.path().join("terraform");
        fs::write(&binary, script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&binary).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&binary, perms).unwrap();
        }

        let template = root.path().join("template");
        fs::create_dir(&template).unwrap();
        fs::write(template.join("main.tf"), "# test fixture\n").unwrap();

        Self { root }
    }

    pub fn binary(&self) -> PathBuf {
        self.root.path().join("terraform")
    }

    pub fn template(&self) -> PathBuf {
        self.root.path().join("template")
    }

    /// Subcommands recorded by the fake binary, in invocation order.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.root.path().join("invocations.log"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
