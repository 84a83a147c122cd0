//! Adapter factory for `EventCall<R>` return types.

use std::sync::Arc;

use calls::{Call, CallAdapter, CallAdapterFactory, CallError, CallbackExecutor, ReturnType};
use tracing::debug;

use crate::ExecutorCallbackCall;

/// Raw type name recognised by [`EventCallAdapterFactory`].
pub const EVENT_CALL_TYPE_NAME: &str = "EventCall";

/// Produces adapters that wrap calls in [`ExecutorCallbackCall`].
///
/// Matches return types whose raw name is `EventCall` (with or without a path
/// prefix). Every adapter it creates delivers on the executor given to
/// [`EventCallAdapterFactory::new`].
#[derive(Clone)]
pub struct EventCallAdapterFactory {
    callback_executor: Arc<dyn CallbackExecutor>,
}

impl EventCallAdapterFactory {
    pub fn new(callback_executor: Arc<dyn CallbackExecutor>) -> Self {
        Self { callback_executor }
    }
}

impl<T: Send + 'static> CallAdapterFactory<T> for EventCallAdapterFactory {
    fn matches(&self, return_type: &ReturnType) -> bool {
        return_type.simple_name() == EVENT_CALL_TYPE_NAME
    }

    fn create(&self, return_type: &ReturnType) -> Result<Box<dyn CallAdapter<T>>, CallError> {
        let response_type = return_type.response_type()?.to_string();
        debug!(%return_type, response_type = %response_type, "creating event call adapter");

        Ok(Box::new(EventCallAdapter {
            response_type,
            callback_executor: Arc::clone(&self.callback_executor),
        }))
    }
}

struct EventCallAdapter {
    response_type: String,
    callback_executor: Arc<dyn CallbackExecutor>,
}

impl<T: Send + 'static> CallAdapter<T> for EventCallAdapter {
    fn response_type(&self) -> &str {
        &self.response_type
    }

    fn adapt(&self, call: Box<dyn Call<T>>) -> Box<dyn Call<T>> {
        Box::new(ExecutorCallbackCall::new(
            Arc::clone(&self.callback_executor),
            call,
        ))
    }
}

#[cfg(test)]
mod tests {
    use calls::{CallAdapterRegistry, DirectCallAdapterFactory, Task};

    use super::*;

    struct Immediate;

    impl CallbackExecutor for Immediate {
        fn execute(&self, task: Task) {
            task()
        }
    }

    fn factory() -> EventCallAdapterFactory {
        EventCallAdapterFactory::new(Arc::new(Immediate))
    }

    #[test]
    fn matches_only_event_call_types() {
        let factory = factory();
        let matches = |sig: &str| {
            CallAdapterFactory::<()>::matches(&factory, &ReturnType::parse(sig).unwrap())
        };

        assert!(matches("EventCall<User>"));
        assert!(matches("api::EventCall<User>"));
        assert!(matches("EventCall"));
        assert!(!matches("Call<User>"));
        assert!(!matches("EventCallback<User>"));
    }

    #[test]
    fn create_exposes_response_type() {
        let adapter: Box<dyn CallAdapter<()>> = factory()
            .create(&ReturnType::parse("EventCall<Vec<User>>").unwrap())
            .unwrap();

        assert_eq!(adapter.response_type(), "Vec<User>");
    }

    #[test]
    fn create_rejects_unparameterized_event_call() {
        let result: Result<Box<dyn CallAdapter<()>>, _> =
            factory().create(&ReturnType::parse("EventCall").unwrap());

        match result {
            Err(CallError::InvalidReturnType { return_type, .. }) => {
                assert_eq!(return_type, "EventCall")
            }
            Err(other) => panic!("expected InvalidReturnType, got {other:?}"),
            Ok(_) => panic!("expected InvalidReturnType, got an adapter"),
        }
    }

    #[test]
    fn registry_prefers_event_call_over_direct_adapter() {
        let mut registry = CallAdapterRegistry::<()>::new();
        registry.register(factory()).register(DirectCallAdapterFactory);

        let event = registry
            .adapter_for(&ReturnType::parse("EventCall<User>").unwrap())
            .unwrap();
        let direct = registry
            .adapter_for(&ReturnType::parse("Call<User>").unwrap())
            .unwrap();

        assert_eq!(event.response_type(), "User");
        assert_eq!(direct.response_type(), "User");
        assert!(registry
            .adapter_for(&ReturnType::parse("Stream<User>").unwrap())
            .is_err());
    }
}
