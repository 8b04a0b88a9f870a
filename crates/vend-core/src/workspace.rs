//! Project-level orchestration over every declared source

use std::sync::Arc;
use std::thread;

use vend_fs::{NormalizedPath, io, link};

use crate::context::SyncContext;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::reporter::{RecordingReporter, Style};
use crate::source::{Identity, Source, UpdateOptions};

/// Options shared by install and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Restrict to these sources; empty means all.
    pub names: Vec<String>,
    /// Overwrite uncommitted changes and occupied link paths.
    pub force: bool,
    /// Always fetch from the remote.
    pub fetch: bool,
    /// Keep untracked files and local modifications.
    pub keep_changes: bool,
    pub skip_scripts: bool,
    /// Install declared revisions even when locked ones exist.
    pub skip_lock: bool,
    /// Synchronize sources on separate threads.
    pub parallel: bool,
}

impl InstallOptions {
    fn update_options(&self) -> UpdateOptions {
        UpdateOptions {
            force: self.force,
            fetch: self.fetch,
            clean: !self.keep_changes,
        }
    }
}

/// A project directory with a manifest.
#[derive(Debug)]
pub struct Workspace {
    root: NormalizedPath,
    manifest_path: NormalizedPath,
    manifest: Manifest,
    context: SyncContext,
}

impl Workspace {
    /// Open the project at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestNotFound`] if `root` has no manifest.
    pub fn open(root: impl Into<NormalizedPath>) -> Result<Self> {
        let root = root.into();
        let manifest_path = Manifest::find(&root).ok_or_else(|| Error::ManifestNotFound {
            path: root.to_native(),
        })?;
        let manifest = Manifest::load(&manifest_path)?;
        let context = SyncContext::new(manifest.sources_root(&root));
        Ok(Self {
            root,
            manifest_path,
            manifest,
            context,
        })
    }

    /// Use `context` for every operation; its root is replaced by this
    /// project's sources directory.
    pub fn with_context(mut self, context: SyncContext) -> Self {
        self.context = context.with_root(self.sources_root());
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn manifest_path(&self) -> &NormalizedPath {
        &self.manifest_path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    /// Directory holding the working trees.
    pub fn sources_root(&self) -> NormalizedPath {
        self.manifest.sources_root(&self.root)
    }

    /// Working tree path of the declared source `name`.
    pub fn working_tree(&self, name: &str) -> Result<NormalizedPath> {
        self.manifest
            .find_source(name)
            .map(|source| source.working_tree(&self.context))
            .ok_or_else(|| Error::SourceNotFound {
                name: name.to_string(),
            })
    }

    /// Bring sources to their locked revisions, or to their declared ones
    /// when nothing is locked or `skip_lock` is set.
    ///
    /// Returns how many sources were processed.
    pub fn install(&self, options: &InstallOptions) -> Result<usize> {
        let use_locked = !options.skip_lock && !self.manifest.sources_locked.is_empty();
        let candidates = if use_locked {
            tracing::debug!("Installing locked sources");
            &self.manifest.sources_locked
        } else {
            &self.manifest.sources
        };
        let sources = select(candidates, &options.names)?;
        self.synchronize(&sources, options)?;
        Ok(sources.len())
    }

    /// Bring declared sources to the latest matching revisions, fetching
    /// every one, then re-lock them when `lock` is set.
    pub fn update(&mut self, options: &InstallOptions, lock: bool) -> Result<usize> {
        let options = InstallOptions {
            fetch: true,
            ..options.clone()
        };
        let sources = select(&self.manifest.sources, &options.names)?;
        self.synchronize(&sources, &options)?;

        if lock {
            let names: Vec<String> = sources.iter().map(|s| s.name().to_string()).collect();
            self.lock(&names)?;
        }
        Ok(sources.len())
    }

    /// Identify every declared source; missing trees are reported as such.
    pub fn list(&self, allow_dirty: bool) -> Result<Vec<Identity>> {
        let sources = Source::dedup_by_name(self.manifest.sources.iter().cloned());
        sources
            .iter()
            .map(|source| {
                self.context
                    .reporter()
                    .show(&[source.to_string()], Style::Message);
                self.context.reporter().indent();
                let identity = source.identify(&self.context, allow_dirty, true);
                self.context.reporter().dedent();
                identity
            })
            .collect()
    }

    /// Pin the selected sources to their current commits in
    /// `sources_locked` and save the manifest.
    pub fn lock(&mut self, names: &[String]) -> Result<usize> {
        let sources = select(&self.manifest.sources, names)?;
        let locked = sources
            .iter()
            .map(|source| source.lock(&self.context, None))
            .collect::<Result<Vec<_>>>()?;
        let count = locked.len();

        self.manifest.merge_locked(locked);
        self.manifest.save(&self.manifest_path)?;
        tracing::info!(count, path = %self.manifest_path, "Locked sources");
        Ok(count)
    }

    /// Delete every working tree and declared link.
    ///
    /// Refuses while any tree has uncommitted changes unless `force`.
    pub fn uninstall(&self, force: bool) -> Result<()> {
        let sources = Source::dedup_by_name(
            self.manifest
                .sources
                .iter()
                .chain(&self.manifest.sources_locked)
                .cloned(),
        );

        if !force {
            for source in &sources {
                source.identify(&self.context, false, true)?;
            }
        }

        for source in &sources {
            if let Some(target) = source.link_target(&self.root)
                && link::is_symlink(&target)
            {
                tracing::info!(link = %target, "Removing symbolic link");
                link::remove_symlink(&target)?;
            }
        }

        let sources_root = self.sources_root();
        tracing::info!(path = %sources_root, "Removing sources");
        io::remove_path(&sources_root)?;
        Ok(())
    }

    fn synchronize(&self, sources: &[Source], options: &InstallOptions) -> Result<()> {
        if options.parallel && sources.len() > 1 {
            return self.synchronize_parallel(sources, options);
        }

        for source in sources {
            self.synchronize_one(&self.context, source, options)?;
        }
        Ok(())
    }

    /// One thread per source. Each thread reports into its own buffer, and
    /// the buffers are replayed in declaration order once all are done.
    fn synchronize_parallel(&self, sources: &[Source], options: &InstallOptions) -> Result<()> {
        let outcomes: Vec<(Arc<RecordingReporter>, Result<()>)> = thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|source| {
                    let buffer = Arc::new(RecordingReporter::new());
                    let ctx = self.context.clone().with_reporter(buffer.clone());
                    let handle = scope.spawn(move || self.synchronize_one(&ctx, source, options));
                    (buffer, handle)
                })
                .collect();
            handles
                .into_iter()
                .map(|(buffer, handle)| match handle.join() {
                    Ok(result) => (buffer, result),
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        let reporter = self.context.reporter();
        let mut first_error = None;
        for (buffer, result) in outcomes {
            buffer.replay(reporter);
            if let Err(error) = result
                && first_error.is_none()
            {
                first_error = Some(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn synchronize_one(
        &self,
        ctx: &SyncContext,
        source: &Source,
        options: &InstallOptions,
    ) -> Result<()> {
        let reporter = ctx.reporter();
        reporter.show(&[source.to_string()], Style::Message);
        reporter.indent();

        let result = (|| -> Result<()> {
            source.update_files(ctx, &options.update_options())?;
            source.create_link(ctx, &self.root, options.force)?;
            if !options.skip_scripts {
                source.run_scripts(ctx)?;
            }
            Ok(())
        })();

        reporter.dedent();
        result
    }
}

/// Sources from `candidates` named in `names` (all when empty), in manifest
/// order and unique by name.
fn select(candidates: &[Source], names: &[String]) -> Result<Vec<Source>> {
    if let Some(unknown) = names
        .iter()
        .find(|name| !candidates.iter().any(|s| s.name() == name.as_str()))
    {
        return Err(Error::SourceNotFound {
            name: unknown.clone(),
        });
    }

    let selected = candidates
        .iter()
        .filter(|s| names.is_empty() || names.iter().any(|n| n == s.name()))
        .cloned();
    Ok(Source::dedup_by_name(selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source(name: &str) -> Source {
        Source::new(format!("https://example/{name}.git"), name).unwrap()
    }

    #[test]
    fn test_select_all_dedups_in_order() {
        let candidates = vec![source("b"), source("a"), source("b").with_rev("v2")];

        let selected = select(&candidates, &[]).unwrap();

        let names: Vec<&str> = selected.iter().map(Source::name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(selected[0].rev(), "master");
    }

    #[test]
    fn test_select_by_name_keeps_manifest_order() {
        let candidates = vec![source("a"), source("b"), source("c")];

        let selected = select(&candidates, &["c".to_string(), "a".to_string()]).unwrap();

        let names: Vec<&str> = selected.iter().map(Source::name).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_select_unknown_name() {
        let candidates = vec![source("a")];

        let result = select(&candidates, &["missing".to_string()]);

        assert!(matches!(result, Err(Error::SourceNotFound { name }) if name == "missing"));
    }
}
