//! Explicit execution context for source operations

use std::sync::Arc;

use vend_fs::NormalizedPath;
use vend_git::{GitClient, VersionControl};

use crate::reporter::{Reporter, TracingReporter};
use crate::shell::{ShellExecutor, SystemShell};

/// Everything a source operation needs besides the source itself.
///
/// `root` is the directory holding the working trees; a source named `dep`
/// lives at `root/dep`. Operations never consult or change the process
/// working directory, so contexts can be cloned into worker threads.
#[derive(Clone)]
pub struct SyncContext {
    root: NormalizedPath,
    git: Arc<dyn VersionControl>,
    shell: Arc<dyn ShellExecutor>,
    reporter: Arc<dyn Reporter>,
    symlinks: bool,
}

impl SyncContext {
    /// Context rooted at `root` using git2, the system shell and tracing
    /// output.
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self {
            root: root.into(),
            git: Arc::new(GitClient::new()),
            shell: Arc::new(SystemShell::new()),
            reporter: Arc::new(TracingReporter::new()),
            symlinks: vend_fs::link::symlinks_supported(),
        }
    }

    pub fn with_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_git(mut self, git: Arc<dyn VersionControl>) -> Self {
        self.git = git;
        self
    }

    pub fn with_shell(mut self, shell: Arc<dyn ShellExecutor>) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Override the symbolic-link capability detected for this platform.
    pub fn with_symlinks(mut self, enabled: bool) -> Self {
        self.symlinks = enabled;
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn git(&self) -> &dyn VersionControl {
        self.git.as_ref()
    }

    pub fn shell(&self) -> &dyn ShellExecutor {
        self.shell.as_ref()
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn symlinks(&self) -> bool {
        self.symlinks
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("root", &self.root)
            .field("symlinks", &self.symlinks)
            .finish_non_exhaustive()
    }
}
