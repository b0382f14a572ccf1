use crate::chain::IntoChain;
use crate::path::split_path;
use crate::route::Binding;
use crate::trie::Node;
use http::Method;

/// The route table: registration surface plus lookup.
///
/// Registration is a startup-phase, `&mut self` affair. Lookups take
/// `&self`, so a finished router can be shared behind an `Arc` across
/// request tasks with no locking. If a deployment must register while
/// serving, it wraps the router in a read-write lock or swaps a fresh
/// copy in; the router itself does not carry that machinery.
#[derive(Default)]
pub struct Router {
    root: Node,
    prefix: Vec<String>,
    stack: Vec<Vec<String>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `steps` for `method` at `pattern`, under the current
    /// scope prefix. The steps argument may be a single step, a
    /// [`Chain`](crate::Chain), or vectors of either; nested sequences
    /// flatten in order. Registering the same method+path again
    /// replaces the earlier route silently.
    pub fn add(&mut self, method: Method, pattern: &str, steps: impl IntoChain) {
        let mut segments = self.prefix.clone();
        segments.extend(split_path(pattern).into_iter().map(str::to_owned));

        self.root
            .register(method, pattern, &segments, Vec::new(), steps.into_chain());
    }

    pub fn get(&mut self, pattern: &str, steps: impl IntoChain) {
        self.add(Method::GET, pattern, steps);
    }

    pub fn put(&mut self, pattern: &str, steps: impl IntoChain) {
        self.add(Method::PUT, pattern, steps);
    }

    pub fn post(&mut self, pattern: &str, steps: impl IntoChain) {
        self.add(Method::POST, pattern, steps);
    }

    pub fn delete(&mut self, pattern: &str, steps: impl IntoChain) {
        self.add(Method::DELETE, pattern, steps);
    }

    /// Runs `f` with the router's prefix extended by `prefix` (given a
    /// leading slash if missing, trailing slash dropped); every `add`
    /// inside sees the longer prefix. The prior prefix is restored when
    /// `f` returns, including when it unwinds.
    pub fn scope(&mut self, prefix: &str, f: impl FnOnce(&mut Router)) {
        let mut normalized = if prefix.starts_with('/') {
            prefix.to_owned()
        } else {
            format!("/{prefix}")
        };
        if normalized.ends_with('/') {
            normalized.pop();
        }

        self.stack.push(self.prefix.clone());
        self.prefix
            .extend(split_path(&normalized).into_iter().map(str::to_owned));

        let mut guard = ScopeGuard { router: self };
        f(&mut *guard.router);
    }

    /// Looks up the chain for `method` + `path`.
    ///
    /// `None` is the normal no-match outcome; the caller decides what a
    /// miss means (fallback, 404, ...).
    pub fn route(&self, method: &Method, path: &str) -> Option<Binding> {
        let segments = split_path(path);
        self.root.find(method, &segments, Vec::new())
    }
}

/// Restores the pre-scope prefix on every exit path out of `scope`.
struct ScopeGuard<'a> {
    router: &'a mut Router,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Some(prev) = self.router.stack.pop() {
            self.router.prefix = prev;
        }
    }
}
