use std::path::{Path, PathBuf};

use snapbox::{
    Data,
    cmd::{Command, OutputAssert, cargo_bin},
};
use tempfile::TempDir;

use crate::helpers::{
    assert, commit_all, copy_dir_contents, get_tags, head_files, head_message, init,
};

/// The release date every test uses, so snapshots don't depend on the clock.
pub const RELEASE_DATE: &str = "2016-05-20";

pub struct TestCase {
    file_name: &'static str,
    env: Option<(&'static str, &'static str)>,
    expected_tags: Option<&'static [&'static str]>,
    expected_commit: Option<(&'static str, &'static [&'static str])>,
}

impl TestCase {
    /// Create a new `TestCase`. `file_name` should be an invocation of `file!()`.
    pub const fn new(file_name: &'static str) -> Self {
        Self {
            file_name,
            env: None,
            expected_tags: None,
            expected_commit: None,
        }
    }

    pub const fn env(mut self, key: &'static str, value: &'static str) -> Self {
        self.env = Some((key, value));
        self
    }

    /// The tags expected to point at `HEAD` afterward.
    pub const fn expected_tags(mut self, expected_tags: &'static [&'static str]) -> Self {
        self.expected_tags = Some(expected_tags);
        self
    }

    /// The message and (sorted) files expected in the release commit at `HEAD`.
    pub const fn expected_commit(
        mut self,
        message: &'static str,
        files: &'static [&'static str],
    ) -> Self {
        self.expected_commit = Some((message, files));
        self
    }

    /// Set up a new temporary directory with the contents of the `in` directory (if any),
    /// tracked in a fresh Git repo.
    pub fn arrange(&self) -> TempDir {
        let working_dir = tempfile::tempdir().unwrap();
        let path = working_dir.path();

        let in_dir = self.in_dir();
        if in_dir.exists() {
            copy_dir_contents(&in_dir, path);
        }

        init(path);
        commit_all(path, "Initial commit");

        working_dir
    }

    /// Run `yankee` with `args` in `working_dir`, and again with `--dry-run` if there's a snapshot
    /// for it.
    pub fn act(&self, working_dir: TempDir, args: &str) -> Asserts {
        let data_path = self.data_path();
        let mut real = Command::new(cargo_bin!("yankee"))
            .current_dir(working_dir.path())
            .arg("--date")
            .arg(RELEASE_DATE)
            .with_assert(assert());
        let mut dry_run = Command::new(cargo_bin!("yankee"))
            .current_dir(working_dir.path())
            .arg("--date")
            .arg(RELEASE_DATE)
            .with_assert(assert());

        for arg in args.split_whitespace() {
            real = real.arg(arg);
            dry_run = dry_run.arg(arg);
        }
        if let Some((key, value)) = self.env {
            real = real.env(key, value);
            dry_run = dry_run.env(key, value);
        }
        dry_run = dry_run.arg("--dry-run");

        // The dry run has to go first, so it sees the same files as the real run.
        let dry_run = if Self::dry_run_stdout(data_path).exists() {
            Some(dry_run.assert())
        } else {
            None
        };

        Asserts {
            dry_run,
            real: real.assert(),
            working_dir,
        }
    }

    pub fn assert(&self, asserts: Asserts) {
        let Asserts {
            real,
            dry_run,
            working_dir,
        } = asserts;
        let data_path = self.data_path();
        if let Some(dry_run) = dry_run {
            dry_run
                .success()
                .stdout_eq(Data::read_from(&Self::dry_run_stdout(data_path), None));
        }

        let stderr_file = data_path.join("stderr.log");
        if stderr_file.exists() {
            real.failure()
                .stderr_eq(Data::read_from(&stderr_file, None));
        } else {
            let stdout_file = data_path.join("stdout.log");
            let output = if stdout_file.exists() {
                Data::read_from(&stdout_file, None)
            } else {
                "".into()
            };
            real.success().stdout_eq(output);
        }

        let path = working_dir.path();

        let in_dir = self.in_dir();
        if in_dir.exists() {
            let mut out_dir = data_path.join("out");
            if !out_dir.exists() {
                out_dir = in_dir;
            }
            assert().subset_matches(out_dir, path);
        }

        if let Some(expected_tags) = self.expected_tags {
            pretty_assertions::assert_eq!(expected_tags, get_tags(path));
        }
        if let Some((message, files)) = self.expected_commit {
            pretty_assertions::assert_eq!(message, head_message(path));
            pretty_assertions::assert_eq!(files, head_files(path));
        }
    }

    fn dry_run_stdout(data_path: &Path) -> PathBuf {
        data_path.join("dryrun_stdout.log")
    }

    /// Runs `.arrange()`, `.act()`, and `.assert()`.
    pub fn run(self, args: &str) {
        self.assert(self.act(self.arrange(), args));
    }

    fn data_path(&self) -> &Path {
        Path::new(self.file_name).parent().unwrap()
    }

    fn in_dir(&self) -> PathBuf {
        self.data_path().join("in")
    }
}

pub struct Asserts {
    real: OutputAssert,
    dry_run: Option<OutputAssert>,
    working_dir: TempDir,
}
