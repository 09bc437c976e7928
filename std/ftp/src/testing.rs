//! In-memory FTP server used by the test suites.

use crate::config::FtpConfig;
use crate::error::Fault;
use crate::listing::{DirEntry, EntryKind};
use crate::session::{Connector, RemoteFs};
use std::io::Read;
use std::sync::{Arc, Mutex};

const MODIFIED: &str = "2024-01-01T00:00:00.000Z";

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
    Link,
}

#[derive(Debug, Default)]
struct State {
    /// Absolute paths in creation order. `/` is implicit.
    nodes: Vec<(String, Node)>,
    refuse: Option<String>,
    opened: usize,
    closed: usize,
}

impl State {
    fn node(&self, path: &str) -> Option<&Node> {
        self.nodes.iter().find(|(p, _)| p == path).map(|(_, n)| n)
    }

    fn is_dir(&self, path: &str) -> bool {
        path == "/" || matches!(self.node(path), Some(Node::Dir))
    }

    fn children(&self, dir: &str) -> impl Iterator<Item = &(String, Node)> {
        self.nodes.iter().filter(move |(p, _)| parent(p) == dir)
    }

    fn remove(&mut self, path: &str) {
        self.nodes.retain(|(p, _)| p != path);
    }
}

fn parent(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((head, _)) => head,
    }
}

fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}

fn rejected(msg: impl Into<String>) -> Fault {
    Fault::Protocol(msg.into())
}

/// Shared handle onto an in-memory directory tree.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryConnector {
    state: Arc<Mutex<State>>,
}

impl MemoryConnector {
    pub(crate) fn with_dir(self, path: &str) -> Self {
        self.insert(path, Node::Dir);
        self
    }

    pub(crate) fn with_file(self, path: &str, content: &[u8]) -> Self {
        self.insert(path, Node::File(content.to_vec()));
        self
    }

    pub(crate) fn with_link(self, path: &str) -> Self {
        self.insert(path, Node::Link);
        self
    }

    /// Make every subsequent connect attempt fail with `message`.
    pub(crate) fn refusing(self, message: &str) -> Self {
        self.state.lock().unwrap().refuse = Some(message.into());
        self
    }

    pub(crate) fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.state.lock().unwrap().node(path) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub(crate) fn is_dir(&self, path: &str) -> bool {
        self.state.lock().unwrap().is_dir(path)
    }

    /// `(opened, closed)` session counts.
    pub(crate) fn sessions(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.opened, state.closed)
    }

    fn insert(&self, path: &str, node: Node) {
        self.state.lock().unwrap().nodes.push((normalize(path), node));
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, _config: &FtpConfig) -> Result<Box<dyn RemoteFs>, Fault> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.refuse {
            return Err(Fault::Connect(message.clone()));
        }
        state.opened += 1;
        Ok(Box::new(MemoryFs {
            state: Arc::clone(&self.state),
            cwd: "/".into(),
        }))
    }
}

struct MemoryFs {
    state: Arc<Mutex<State>>,
    cwd: String,
}

impl MemoryFs {
    fn resolve(&self, path: &str) -> String {
        if path.starts_with('/') {
            normalize(path)
        } else {
            normalize(&format!("{}/{path}", self.cwd))
        }
    }
}

impl RemoteFs for MemoryFs {
    fn list_entries(&mut self, path: &str) -> Result<Vec<DirEntry>, Fault> {
        let dir = self.resolve(path);
        let state = self.state.lock().unwrap();
        if !state.is_dir(&dir) {
            return Err(rejected(format!("550 {path}: No such directory")));
        }
        Ok(state
            .children(&dir)
            .map(|(p, node)| {
                let (kind, size) = match node {
                    Node::Dir => (EntryKind::Directory, 4096),
                    Node::File(content) => (EntryKind::File, content.len() as u64),
                    Node::Link => (EntryKind::Other, 0),
                };
                DirEntry {
                    name: p.rsplit('/').next().unwrap_or_default().to_string(),
                    kind,
                    size,
                    modified: MODIFIED.into(),
                }
            })
            .collect())
    }

    fn retrieve(&mut self, path: &str) -> Result<Vec<u8>, Fault> {
        let target = self.resolve(path);
        match self.state.lock().unwrap().node(&target) {
            Some(Node::File(content)) => Ok(content.clone()),
            _ => Err(rejected(format!("550 {path}: No such file"))),
        }
    }

    fn store(&mut self, path: &str, reader: &mut dyn Read) -> Result<u64, Fault> {
        let target = self.resolve(path);
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        let mut state = self.state.lock().unwrap();
        if !state.is_dir(parent(&target)) {
            return Err(rejected(format!("553 {path}: No such directory")));
        }
        if state.is_dir(&target) {
            return Err(rejected(format!("553 {path}: Is a directory")));
        }
        let len = content.len() as u64;
        match state.nodes.iter().position(|(p, _)| *p == target) {
            Some(i) => state.nodes[i].1 = Node::File(content),
            None => state.nodes.push((target, Node::File(content))),
        }
        Ok(len)
    }

    fn change_dir(&mut self, path: &str) -> Result<(), Fault> {
        let target = self.resolve(path);
        if !self.state.lock().unwrap().is_dir(&target) {
            return Err(rejected(format!("550 {path}: No such directory")));
        }
        self.cwd = target;
        Ok(())
    }

    fn make_dir(&mut self, path: &str) -> Result<(), Fault> {
        let target = self.resolve(path);
        let mut state = self.state.lock().unwrap();
        if target == "/" || state.node(&target).is_some() {
            return Err(rejected(format!("550 {path}: File exists")));
        }
        if !state.is_dir(parent(&target)) {
            return Err(rejected(format!("550 {path}: No such directory")));
        }
        state.nodes.push((target, Node::Dir));
        Ok(())
    }

    fn remove_file(&mut self, path: &str) -> Result<(), Fault> {
        let target = self.resolve(path);
        let mut state = self.state.lock().unwrap();
        if !matches!(state.node(&target), Some(Node::File(_) | Node::Link)) {
            return Err(rejected(format!("550 {path}: No such file")));
        }
        state.remove(&target);
        Ok(())
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), Fault> {
        let target = self.resolve(path);
        let mut state = self.state.lock().unwrap();
        if target == "/" || !state.is_dir(&target) {
            return Err(rejected(format!("550 {path}: No such directory")));
        }
        if state.children(&target).next().is_some() {
            return Err(rejected(format!("550 {path}: Directory not empty")));
        }
        state.remove(&target);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Fault> {
        self.state.lock().unwrap().closed += 1;
        Ok(())
    }
}
