//! Assembles a gateway from a provider, a config, and collaborators.

use crate::config::GatewayConfig;
use crate::gateway::ToolGateway;
use std::sync::Arc;
use toolgate_core::{
    CacheStore, Error, EventDispatcher, Result, SchemaValidator, ToolLogger, TracingLogger,
};
use toolgate_middleware::{
    EventMiddleware, LoggingMiddleware, Middleware, MiddlewarePipeline, ValidatingMiddleware,
};
use toolgate_provider::{CachingProvider, ToolProvider};

/// Builds the layer stack `provider → [cache] → pipeline → façade`.
///
/// Built-in middleware is added in the order logging, events, validating,
/// followed by any extra middleware in the order it was supplied.
///
/// ```rust,ignore
/// let gateway = GatewayBuilder::new(provider)
///     .config(GatewayConfig::load("toolgate.toml")?)
///     .cache_store(Arc::new(InMemoryCacheStore::new()))
///     .validator(validator)
///     .build()?;
/// ```
pub struct GatewayBuilder {
    provider: Arc<dyn ToolProvider>,
    config: GatewayConfig,
    cache_store: Option<Arc<dyn CacheStore>>,
    validator: Option<Arc<dyn SchemaValidator>>,
    logger: Arc<dyn ToolLogger>,
    dispatcher: Option<Arc<dyn EventDispatcher>>,
    extra: Vec<Arc<dyn Middleware>>,
}

impl GatewayBuilder {
    /// Start from `provider` with the default config.
    pub fn new(provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            provider,
            config: GatewayConfig::default(),
            cache_store: None,
            validator: None,
            logger: Arc::new(TracingLogger),
            dispatcher: None,
            extra: Vec::new(),
        }
    }

    /// Use `config`.
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Cache store for the caching layer.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Schema validator for the validating middleware.
    pub fn validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Logger for the logging middleware. Defaults to [`TracingLogger`].
    pub fn logger(mut self, logger: Arc<dyn ToolLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Event dispatcher for the event middleware.
    pub fn event_dispatcher(mut self, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Append a custom middleware after the built-in ones.
    pub fn middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.extra.push(middleware);
        self
    }

    /// Validate the config and assemble the gateway.
    ///
    /// Fails with a configuration error if caching is enabled without a
    /// cache store.
    pub fn build(self) -> Result<ToolGateway> {
        let config = self.config;
        config.validate()?;

        let provider: Arc<dyn ToolProvider> = if config.cache.enabled {
            let store = self.cache_store.ok_or_else(|| {
                Error::config("cache.enabled is set but no cache store was supplied")
            })?;
            let caching =
                CachingProvider::new(self.provider, store).with_options(config.cache.options())?;
            Arc::new(caching)
        } else {
            self.provider
        };

        let pipeline = MiddlewarePipeline::new(Arc::clone(&provider));
        if config.logging.enabled {
            pipeline.add(
                LoggingMiddleware::new(self.logger).log_arguments(config.logging.log_arguments),
            );
        }
        if config.events.enabled {
            match self.dispatcher {
                Some(dispatcher) => {
                    pipeline.add(EventMiddleware::new(dispatcher));
                }
                None => tracing::debug!("events.enabled is set but no dispatcher was supplied"),
            }
        }
        if config.validation.enabled {
            match self.validator {
                Some(validator) => {
                    pipeline.add(
                        ValidatingMiddleware::new(Arc::clone(&provider), validator)
                            .strict(config.validation.strict),
                    );
                }
                None => tracing::debug!("validation.enabled is set but no validator was supplied"),
            }
        }
        for middleware in self.extra {
            pipeline.add_arc(middleware);
        }

        tracing::info!(
            prefix = %config.gateway.tool_prefix,
            cache = config.cache.enabled,
            middleware = pipeline.count(),
            "Built tool gateway"
        );

        Ok(ToolGateway::new(Arc::new(pipeline))
            .with_prefix(config.gateway.tool_prefix)
            .assign_request_ids(config.gateway.assign_request_ids))
    }
}

// ============================================================================
// Tests
// ============================================================================
