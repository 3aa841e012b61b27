use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;


/// Identity of a module within a module graph.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Arc<str>);

impl ModuleId {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for ModuleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ModuleId({})", self.0)
	}
}

impl fmt::Display for ModuleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ModuleId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

/// One step of a [`ModulePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
	/// A named field, rendered `name`.
	Field(&'static str),
	/// A positional child, rendered `name[index]`.
	Index(&'static str, usize),
	/// A labelled child, rendered `name(label)`.
	Label(&'static str, Arc<str>),
}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Field(name) => f.write_str(name),
			Self::Index(name, index) => write!(f, "{name}[{index}]"),
			Self::Label(name, label) => write!(f, "{name}({label})"),
		}
	}
}

#[derive(Debug)]
struct PathNode {
	parent: Option<Arc<PathNode>>,
	segment: Segment,
	depth: usize,
}

/// Immutable position inside a module's document tree.
///
/// Paths are persistent lists: extending a path allocates one node and
/// shares the parent, so every recursive descent can build its own path
/// without save/restore bookkeeping on a shared cursor.
#[derive(Clone, Default)]
pub struct ModulePath {
	tail: Option<Arc<PathNode>>,
}

impl ModulePath {
	/// The empty path (the module itself).
	pub fn root() -> Self {
		Self::default()
	}

	pub fn is_root(&self) -> bool {
		self.tail.is_none()
	}

	pub fn depth(&self) -> usize {
		self.tail.as_ref().map_or(0, |node| node.depth)
	}

	/// Returns a new path extended by `segment`.
	pub fn join(&self, segment: Segment) -> Self {
		Self {
			tail: Some(Arc::new(PathNode {
				parent: self.tail.clone(),
				segment,
				depth: self.depth() + 1,
			})),
		}
	}

	pub fn field(&self, name: &'static str) -> Self {
		self.join(Segment::Field(name))
	}

	pub fn index(&self, name: &'static str, index: usize) -> Self {
		self.join(Segment::Index(name, index))
	}

	pub fn label(&self, name: &'static str, label: impl Into<Arc<str>>) -> Self {
		self.join(Segment::Label(name, label.into()))
	}

	/// Returns the path without its last segment.
	pub fn parent(&self) -> Option<Self> {
		self.tail.as_ref().map(|node| Self { tail: node.parent.clone() })
	}

	pub fn last(&self) -> Option<&Segment> {
		self.tail.as_ref().map(|node| &node.segment)
	}

	/// Segments from the root to the tip.
	pub fn segments(&self) -> SmallVec<[Segment; 8]> {
		let mut out: SmallVec<[Segment; 8]> = SmallVec::new();
		let mut cursor = self.tail.as_ref();
		while let Some(node) = cursor {
			out.push(node.segment.clone());
			cursor = node.parent.as_ref();
		}
		out.reverse();
		out
	}

	/// Returns true if `prefix` is an ancestor of (or equal to) this path.
	pub fn starts_with(&self, prefix: &ModulePath) -> bool {
		let (mine, theirs) = (self.segments(), prefix.segments());
		mine.len() >= theirs.len() && mine[..theirs.len()] == theirs[..]
	}
}

impl PartialEq for ModulePath {
	fn eq(&self, other: &Self) -> bool {
		match (&self.tail, &other.tail) {
			(Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
			_ => self.depth() == other.depth() && self.segments() == other.segments(),
		}
	}
}

impl Eq for ModulePath {}

impl Hash for ModulePath {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.segments().hash(state);
	}
}

impl fmt::Display for ModulePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, segment) in self.segments().iter().enumerate() {
			if idx > 0 {
				f.write_str("/")?;
			}
			write!(f, "{segment}")?;
		}
		Ok(())
	}
}

impl fmt::Debug for ModulePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ModulePath({self})")
	}
}

impl Serialize for ModulePath {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// A module plus a path inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleLocation {
	pub module: ModuleId,
	pub path: ModulePath,
}

impl ModuleLocation {
	pub fn new(module: ModuleId, path: ModulePath) -> Self {
		Self { module, path }
	}

	/// Location of the module itself.
	pub fn module_root(module: ModuleId) -> Self {
		Self::new(module, ModulePath::root())
	}

	pub fn join(&self, segment: Segment) -> Self {
		Self::new(self.module.clone(), self.path.join(segment))
	}

	pub fn field(&self, name: &'static str) -> Self {
		Self::new(self.module.clone(), self.path.field(name))
	}

	pub fn index(&self, name: &'static str, index: usize) -> Self {
		Self::new(self.module.clone(), self.path.index(name, index))
	}

	pub fn label(&self, name: &'static str, label: impl Into<Arc<str>>) -> Self {
		Self::new(self.module.clone(), self.path.label(name, label))
	}
}

impl fmt::Display for ModuleLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.path.is_root() {
			write!(f, "{}", self.module)
		} else {
			write!(f, "{}:{}", self.module, self.path)
		}
	}
}

/// Source position of a document element, supplied by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
	/// 1-based line.
	pub line: u32,
	/// 1-based column.
	pub column: u32,
	/// Byte offset from the start of the file.
	pub offset: usize,
	/// Length in bytes.
	pub length: usize,
}

/// Map from rendered [`ModulePath`] strings to source spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceMap {
	spans: BTreeMap<String, SourceSpan>,
}

impl SourceMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, path: &ModulePath, span: SourceSpan) {
		self.spans.insert(path.to_string(), span);
	}

	pub fn is_empty(&self) -> bool {
		self.spans.is_empty()
	}

	/// Returns the span of the deepest recorded ancestor of `path`.
	pub fn lookup(&self, path: &ModulePath) -> Option<SourceSpan> {
		let mut cursor = Some(path.clone());
		while let Some(current) = cursor {
			if let Some(span) = self.spans.get(&current.to_string()) {
				return Some(*span);
			}
			cursor = current.parent();
		}
		None
	}
}
