use super::errors::{InterpreterError, RuntimeResult};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Source of a module that was found, keyed by its absolute path.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub key: PathBuf,
    pub source: Rc<str>,
}

/// Finds module files and remembers which ones are being evaluated.
///
/// Both the content cache and the in-progress set are keyed by the
/// current-directory-joined absolute path of the candidate that was found.
#[derive(Debug)]
pub struct ModuleLoader {
    module_dir: PathBuf,
    cache: HashMap<PathBuf, Rc<str>>,
    in_progress: HashSet<PathBuf>,
}

impl ModuleLoader {
    pub fn new(module_dir: impl Into<PathBuf>) -> Self {
        ModuleLoader {
            module_dir: module_dir.into(),
            cache: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// The import path as written, with the source extension appended if it
    /// is missing.
    pub fn normalize(path: &str) -> String {
        if path.ends_with(".gct") {
            path.to_owned()
        } else {
            format!("{}.gct", path)
        }
    }

    /// Where to look for `path`, in order: as given, under the module
    /// directory, and by file name alone under the module directory.
    pub fn candidates(&self, path: &str) -> [PathBuf; 3] {
        let path = PathBuf::from(path);
        let basename = path
            .file_name()
            .map_or_else(|| path.clone(), PathBuf::from);

        [
            path.clone(),
            self.module_dir.join(&path),
            self.module_dir.join(basename),
        ]
    }

    /// Reads the first candidate that exists, from the cache if possible.
    pub fn load(&mut self, path: &str) -> RuntimeResult<LoadedModule> {
        let cwd = std::env::current_dir().map_err(InterpreterError::ImportPath)?;
        let candidates = self.candidates(path);
        let mut last_error = None;

        for candidate in candidates.iter() {
            let key = absolute_key(&cwd, candidate);

            if let Some(source) = self.cache.get(&key) {
                debug!(path = %key.display(), "import served from cache");
                return Ok(LoadedModule {
                    key,
                    source: source.clone(),
                });
            }

            debug!(candidate = %candidate.display(), "trying import candidate");
            match fs::read_to_string(candidate) {
                Ok(contents) => {
                    debug!(path = %key.display(), bytes = contents.len(), "loaded module");
                    let source: Rc<str> = Rc::from(contents);
                    self.cache.insert(key.clone(), source.clone());
                    return Ok(LoadedModule { key, source });
                }
                Err(e) => last_error = Some(e),
            }
        }

        let reason = last_error.unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no candidate paths")
        });
        Err(InterpreterError::ImportNotFound {
            reason,
            tried: candidates,
        })
    }

    /// Marks a module as being evaluated. Returns false if it already was,
    /// which means the import is part of a cycle.
    pub fn enter(&mut self, key: &Path) -> bool {
        self.in_progress.insert(key.to_path_buf())
    }

    pub fn exit(&mut self, key: &Path) {
        self.in_progress.remove(key);
    }

    #[cfg(test)]
    fn is_cached(&self, key: &Path) -> bool {
        self.cache.contains_key(key)
    }
}

/// Absolute form of a candidate with `.` and `..` resolved lexically, so
/// that different spellings of one file share a cache and cycle key.
fn absolute_key(cwd: &Path, candidate: &Path) -> PathBuf {
    let mut key = PathBuf::new();
    for component in cwd.join(candidate).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                key.pop();
            }
            other => key.push(other.as_os_str()),
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_normalize() {
        assert_eq!(ModuleLoader::normalize("lib/math"), "lib/math.gct");
        assert_eq!(ModuleLoader::normalize("util.gct"), "util.gct");
    }

    #[test]
    fn test_candidates() {
        let loader = ModuleLoader::new("modules");
        let [given, under_dir, by_name] = loader.candidates("lib/math.gct");
        assert_eq!(given, PathBuf::from("lib/math.gct"));
        assert_eq!(under_dir, PathBuf::from("modules/lib/math.gct"));
        assert_eq!(by_name, PathBuf::from("modules/math.gct"));
    }

    #[test]
    fn test_load_from_module_dir_by_basename() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("helpers.gct"), "var x = 1;").expect("write module");

        let mut loader = ModuleLoader::new(dir.path());
        let module = loader
            .load("does/not/exist/helpers.gct")
            .expect("module found by basename");

        assert_eq!(&*module.source, "var x = 1;");
        assert_eq!(module.key, dir.path().join("helpers.gct"));
        assert!(loader.is_cached(&module.key));
    }

    #[test]
    fn test_cached_source_survives_file_removal() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("cached.gct");
        fs::write(&file, "const y = 2;").expect("write module");

        let mut loader = ModuleLoader::new(dir.path());
        loader.load("cached.gct").expect("first load");
        fs::remove_file(&file).expect("remove module");

        let module = loader.load("cached.gct").expect("served from cache");
        assert_eq!(&*module.source, "const y = 2;");
    }

    #[test]
    fn test_not_found_lists_candidates() {
        let dir = tempdir().expect("tempdir");
        let mut loader = ModuleLoader::new(dir.path());

        let message = loader
            .load("missing.gct")
            .map(|_| ())
            .map_err(|e| e.to_string())
            .err()
            .expect("missing module is an error");

        assert!(message.starts_with("could not import file: "));
        let tried = format!(
            "Tried: missing.gct, {}, and {}",
            dir.path().join("missing.gct").display(),
            dir.path().join("missing.gct").display()
        );
        assert!(message.ends_with(&tried), "{}", message);
    }

    #[test]
    fn test_absolute_key_resolves_dots() {
        let cwd = Path::new("/work/project");
        assert_eq!(
            absolute_key(cwd, Path::new("lib/../math.gct")),
            PathBuf::from("/work/project/math.gct")
        );
        assert_eq!(
            absolute_key(cwd, Path::new("./modules/./math.gct")),
            PathBuf::from("/work/project/modules/math.gct")
        );
        assert_eq!(
            absolute_key(cwd, Path::new("../../../../math.gct")),
            PathBuf::from("/math.gct")
        );
        assert_eq!(
            absolute_key(cwd, Path::new("/abs/x/../y.gct")),
            PathBuf::from("/abs/y.gct")
        );
    }

    #[test]
    fn test_spellings_of_one_file_share_a_key() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("sub")).expect("create subdir");
        fs::write(dir.path().join("shared.gct"), "var s = 1;").expect("write module");

        let mut loader = ModuleLoader::new(dir.path());
        let direct = loader.load("shared.gct").expect("direct spelling");
        let dotted = loader.load("sub/../shared.gct").expect("dotted spelling");
        assert_eq!(direct.key, dotted.key);
    }

    #[test]
    fn test_enter_detects_cycles() {
        let mut loader = ModuleLoader::new("modules");
        let key = PathBuf::from("/tmp/a.gct");

        assert!(loader.enter(&key));
        assert!(!loader.enter(&key));
        loader.exit(&key);
        assert!(loader.enter(&key));
    }
}
