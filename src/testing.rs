//! In-memory fakes for exercising builds without a disk or a compiler.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};

use crate::context::ServiceContext;
use crate::error::PortError;
use crate::ports::{Clock, FileSystem, ProcessOutput, ProcessRunner};

pub(crate) const COMPILER: &str = "fake-cc";
pub(crate) const LINKER: &str = "fake-ld";

pub(crate) fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

enum Node {
    Dir,
    File { contents: String, modified: SystemTime },
}

/// Filesystem held in a map. Writes made by the fake toolchain are stamped
/// from a counter starting at 1000 seconds, newer than any test fixture.
pub(crate) struct MemoryFs {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
    ticks: AtomicU64,
}

impl MemoryFs {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self { nodes: Mutex::new(BTreeMap::new()), ticks: AtomicU64::new(1_000) })
    }

    pub(crate) fn add_dir(&self, path: impl AsRef<Path>) {
        let mut nodes = self.nodes.lock().unwrap();
        for ancestor in path.as_ref().ancestors() {
            if !ancestor.as_os_str().is_empty() {
                nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
            }
        }
    }

    pub(crate) fn add_file(&self, path: impl AsRef<Path>, contents: &str, secs: u64) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.nodes.lock().unwrap().insert(
            path.to_path_buf(),
            Node::File { contents: contents.to_string(), modified: at(secs) },
        );
    }

    /// Writes a file stamped with the next tick.
    pub(crate) fn write_now(&self, path: impl AsRef<Path>, contents: &str) {
        let secs = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.add_file(path, contents, secs);
    }

    pub(crate) fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        matches!(self.nodes.lock().unwrap().get(path.as_ref()), Some(Node::Dir))
    }
}

impl FileSystem for Arc<MemoryFs> {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        match self.nodes.lock().unwrap().get(path) {
            Some(Node::File { contents, .. }) => Ok(contents.clone()),
            Some(Node::Dir) => Err(format!("{} is a directory", path.display()).into()),
            None => Err(format!("{} not found", path.display()).into()),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.nodes.lock().unwrap().get(path), Some(Node::File { .. }))
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        match self.nodes.lock().unwrap().get(path)? {
            Node::File { modified, .. } => Some(*modified),
            Node::Dir => Some(at(0)),
        }
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let nodes = self.nodes.lock().unwrap();
        if !matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(format!("{} is not a directory", path.display()).into());
        }
        Ok(nodes
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name()?.to_str().map(ToString::to_string))
            .collect())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        self.add_dir(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError> {
        self.nodes.lock().unwrap().retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

/// Toolchain double. Compiles write an object plus a `-MMD` style
/// dependency file into the [`MemoryFs`]; links write the executable.
pub(crate) struct FakeToolchain {
    fs: Arc<MemoryFs>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    failing_sources: Vec<String>,
    headers: HashMap<String, Vec<String>>,
    link_exit: i32,
    test_exit: i32,
}

impl FakeToolchain {
    pub(crate) fn new(fs: &Arc<MemoryFs>) -> Self {
        Self {
            fs: Arc::clone(fs),
            calls: Mutex::new(Vec::new()),
            failing_sources: Vec::new(),
            headers: HashMap::new(),
            link_exit: 0,
            test_exit: 0,
        }
    }

    /// Compiling a source whose file name is `name` exits 1.
    pub(crate) fn failing(mut self, name: &str) -> Self {
        self.failing_sources.push(name.to_string());
        self
    }

    /// Headers recorded in the dependency file written for `name`.
    pub(crate) fn with_headers(mut self, name: &str, headers: &[&str]) -> Self {
        self.headers.insert(name.to_string(), headers.iter().map(ToString::to_string).collect());
        self
    }

    pub(crate) fn link_exit(mut self, code: i32) -> Self {
        self.link_exit = code;
        self
    }

    /// Exit status of the linked test executable.
    pub(crate) fn test_exit(mut self, code: i32) -> Self {
        self.test_exit = code;
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, program: &str) -> Vec<Vec<String>> {
        self.calls().into_iter().filter(|(p, _)| p == program).map(|(_, args)| args).collect()
    }

    fn compile(&self, args: &[String]) -> ProcessOutput {
        let [.., source, _, object] = args else {
            return exit(2, "bad compile invocation");
        };
        let name = Path::new(source).file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if self.failing_sources.iter().any(|f| f == name) {
            return exit(1, &format!("{source}:1:1: error: expected unqualified-id"));
        }
        let mut record = format!("{object}: {source}");
        for header in self.headers.get(name).into_iter().flatten() {
            record.push_str(&format!(" \\\n  {header}"));
        }
        record.push('\n');
        self.fs.write_now(object, "\x7fELF");
        self.fs.write_now(Path::new(object).with_extension("d"), &record);
        exit(0, "")
    }

    fn link(&self, args: &[String]) -> ProcessOutput {
        if self.link_exit != 0 {
            return exit(self.link_exit, "ld: undefined symbol: main");
        }
        match args {
            [.., flag, executable] if flag == "-o" => {
                self.fs.write_now(executable, "\x7fELF");
                exit(0, "")
            }
            _ => exit(2, "bad link invocation"),
        }
    }
}

fn exit(code: i32, stderr: &str) -> ProcessOutput {
    ProcessOutput { exit_code: code, stdout: String::new(), stderr: stderr.to_string() }
}

impl ProcessRunner for Arc<FakeToolchain> {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, PortError> {
        self.calls.lock().unwrap().push((program.to_string(), args.to_vec()));
        Ok(match program {
            COMPILER => self.compile(args),
            LINKER => self.link(args),
            _ => exit(0, ""),
        })
    }

    fn run_inherited(&self, program: &str, args: &[String]) -> Result<i32, PortError> {
        self.calls.lock().unwrap().push((program.to_string(), args.to_vec()));
        Ok(self.test_exit)
    }
}

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::default()
    }
}

pub(crate) fn context(fs: &Arc<MemoryFs>, toolchain: &Arc<FakeToolchain>) -> ServiceContext {
    ServiceContext {
        fs: Box::new(Arc::clone(fs)),
        process: Box::new(Arc::clone(toolchain)),
        clock: Box::new(FixedClock),
    }
}
