//! Call adapters and the registry that selects them.
//!
//! A [`CallAdapterFactory`] inspects a declared [`ReturnType`] and, if it
//! recognises it, creates a [`CallAdapter`] that decorates plain calls. The
//! [`CallAdapterRegistry`] asks its factories in registration order; the first
//! one whose [`CallAdapterFactory::matches`] returns `true` wins.

use tracing::debug;

use crate::{Call, CallError, ReturnType};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Turns a plain call into the call type a caller declared.
pub trait CallAdapter<T>: Send + Sync {
    /// The response type the adapted call delivers (e.g. `User` for `EventCall<User>`).
    fn response_type(&self) -> &str;

    /// Decorates `call`.
    fn adapt(&self, call: Box<dyn Call<T>>) -> Box<dyn Call<T>>;
}

/// Produces [`CallAdapter`]s for the return types it recognises.
pub trait CallAdapterFactory<T>: Send + Sync {
    /// Returns `true` if this factory handles `return_type`.
    fn matches(&self, return_type: &ReturnType) -> bool;

    /// Creates the adapter for a matched `return_type`.
    ///
    /// Only called after [`CallAdapterFactory::matches`] returned `true`.
    fn create(&self, return_type: &ReturnType) -> Result<Box<dyn CallAdapter<T>>, CallError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Ordered collection of adapter factories.
pub struct CallAdapterRegistry<T> {
    factories: Vec<Box<dyn CallAdapterFactory<T>>>,
}

impl<T> CallAdapterRegistry<T> {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Appends `factory`. Earlier registrations take precedence.
    pub fn register(&mut self, factory: impl CallAdapterFactory<T> + 'static) -> &mut Self {
        self.factories.push(Box::new(factory));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns the adapter of the first factory that matches `return_type`.
    pub fn adapter_for(&self, return_type: &ReturnType) -> Result<Box<dyn CallAdapter<T>>, CallError> {
        for (index, factory) in self.factories.iter().enumerate() {
            if factory.matches(return_type) {
                debug!(%return_type, factory_index = index, "call adapter factory matched");
                return factory.create(return_type);
            }
        }
        Err(CallError::NoAdapter {
            return_type: return_type.to_string(),
        })
    }
}

impl<T> Default for CallAdapterRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Direct adapter
// ---------------------------------------------------------------------------

/// Factory for the plain `Call<R>` return type. Its adapter returns calls unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCallAdapterFactory;

/// Raw type name handled by [`DirectCallAdapterFactory`].
pub const CALL_TYPE_NAME: &str = "Call";

struct DirectCallAdapter {
    response_type: String,
}

impl<T> CallAdapter<T> for DirectCallAdapter {
    fn response_type(&self) -> &str {
        &self.response_type
    }

    fn adapt(&self, call: Box<dyn Call<T>>) -> Box<dyn Call<T>> {
        call
    }
}

impl<T> CallAdapterFactory<T> for DirectCallAdapterFactory {
    fn matches(&self, return_type: &ReturnType) -> bool {
        return_type.simple_name() == CALL_TYPE_NAME
    }

    fn create(&self, return_type: &ReturnType) -> Result<Box<dyn CallAdapter<T>>, CallError> {
        Ok(Box::new(DirectCallAdapter {
            response_type: return_type.response_type()?.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::{Callback, Request, Response};

    struct StubCall(Request);

    impl Call<()> for StubCall {
        fn enqueue(&self, _callback: Option<Box<dyn Callback<()>>>) -> Result<(), CallError> {
            Ok(())
        }
        fn execute(&self) -> Result<Response<()>, CallError> {
            Ok(Response::new(200, Vec::new(), None))
        }
        fn cancel(&self) {}
        fn is_canceled(&self) -> bool {
            false
        }
        fn is_executed(&self) -> bool {
            false
        }
        fn clone_call(&self) -> Box<dyn Call<()>> {
            Box::new(StubCall(self.0.clone()))
        }
        fn request(&self) -> &Request {
            &self.0
        }
    }

    /// Matches a fixed raw name and counts how often `create` ran.
    struct NamedFactory {
        name: &'static str,
        label: &'static str,
        created: Arc<AtomicUsize>,
    }

    struct LabelAdapter(&'static str);

    impl CallAdapter<()> for LabelAdapter {
        fn response_type(&self) -> &str {
            self.0
        }
        fn adapt(&self, call: Box<dyn Call<()>>) -> Box<dyn Call<()>> {
            call
        }
    }

    impl CallAdapterFactory<()> for NamedFactory {
        fn matches(&self, return_type: &ReturnType) -> bool {
            return_type.simple_name() == self.name
        }
        fn create(&self, _return_type: &ReturnType) -> Result<Box<dyn CallAdapter<()>>, CallError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(LabelAdapter(self.label)))
        }
    }

    fn named(name: &'static str, label: &'static str) -> (NamedFactory, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        (
            NamedFactory {
                name,
                label,
                created: Arc::clone(&created),
            },
            created,
        )
    }

    #[test]
    fn first_matching_factory_wins() {
        let (first, first_count) = named("Stream", "first");
        let (second, second_count) = named("Stream", "second");
        let mut registry = CallAdapterRegistry::new();
        registry.register(first).register(second);

        let adapter = registry
            .adapter_for(&ReturnType::parse("Stream<Event>").unwrap())
            .unwrap();

        assert_eq!(adapter.response_type(), "first");
        assert_eq!(first_count.load(Ordering::SeqCst), 1);
        assert_eq!(second_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_matching_factories_are_skipped() {
        let (other, other_count) = named("Other", "other");
        let (stream, _) = named("Stream", "stream");
        let mut registry = CallAdapterRegistry::new();
        registry.register(other).register(stream);

        let adapter = registry
            .adapter_for(&ReturnType::parse("Stream<Event>").unwrap())
            .unwrap();

        assert_eq!(adapter.response_type(), "stream");
        assert_eq!(other_count.load(Ordering::SeqCst), 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unmatched_return_type_is_an_error() {
        let registry = CallAdapterRegistry::<()>::new();
        assert!(registry.is_empty());

        let err = registry
            .adapter_for(&ReturnType::parse("Future<User>").unwrap())
            .err()
            .unwrap();

        assert!(matches!(err, CallError::NoAdapter { ref return_type } if return_type == "Future<User>"));
    }

    #[test]
    fn direct_adapter_returns_call_unchanged() {
        let mut registry = CallAdapterRegistry::<()>::new();
        registry.register(DirectCallAdapterFactory);

        let adapter = registry
            .adapter_for(&ReturnType::parse("Call<User>").unwrap())
            .unwrap();
        let call = adapter.adapt(Box::new(StubCall(Request::get("http://localhost/users").unwrap())));

        assert_eq!(adapter.response_type(), "User");
        assert_eq!(call.request().url(), "http://localhost/users");
    }

    #[test]
    fn direct_adapter_requires_parameterized_call() {
        let factory = DirectCallAdapterFactory;
        let bare = ReturnType::parse("Call").unwrap();

        assert!(CallAdapterFactory::<()>::matches(&factory, &bare));
        assert!(matches!(
            CallAdapterFactory::<()>::create(&factory, &bare),
            Err(CallError::InvalidReturnType { .. })
        ));
    }
}
