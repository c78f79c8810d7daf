//! Output interceptors applied to every rendered embed.

use parking_lot::RwLock;

type Interceptor = Box<dyn Fn(String) -> String + Send + Sync>;

/// An ordered list of `(String) -> String` interceptors.
///
/// Interceptors run in registration order; each receives the previous one's
/// output. With no interceptors the fragment passes through unchanged.
#[derive(Default)]
pub struct OutputHooks {
    interceptors: RwLock<Vec<Interceptor>>,
}

impl OutputHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, interceptor: F)
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.interceptors.write().push(Box::new(interceptor));
    }

    pub fn apply(&self, output: String) -> String {
        self.interceptors
            .read()
            .iter()
            .fold(output, |acc, interceptor| interceptor(acc))
    }

    pub fn len(&self) -> usize {
        self.interceptors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for OutputHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputHooks")
            .field("interceptors", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_without_interceptors() {
        let hooks = OutputHooks::new();
        assert!(hooks.is_empty());
        assert_eq!(hooks.apply("<iframe>".into()), "<iframe>");
    }

    #[test]
    fn applies_in_registration_order() {
        let hooks = OutputHooks::new();
        hooks.register(|s| format!("{s}a"));
        hooks.register(|s| format!("{s}b"));
        hooks.register(|s| s.to_uppercase());

        assert_eq!(hooks.len(), 3);
        assert_eq!(hooks.apply("x".into()), "XAB");
    }
}
