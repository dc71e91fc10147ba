//! Schema: rules plus messages, validated against a source value

use std::borrow::Cow;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::debug;

use rulebook_core::{Descriptor, Messages, Result, ValidateOptions, Validator};

use crate::registry::Registry;
use crate::report::ValidationReport;
use crate::resolver::Resolver;
use crate::scheduler::run_series;
use crate::task::build_series;

/// A set of field rules with the message catalog used to report them
#[derive(Debug, Clone)]
pub struct Schema {
    rules: Descriptor,
    messages: Messages,
    registry: Arc<Registry>,
}

impl Schema {
    /// Schema over `rules` with the built-in validators
    pub fn new(rules: Descriptor) -> Self {
        Self::with_registry(rules, Arc::new(Registry::default()))
    }

    /// Schema over `rules` resolving types through `registry`
    pub fn with_registry(rules: Descriptor, registry: Arc<Registry>) -> Self {
        Self {
            rules,
            messages: Messages::default(),
            registry,
        }
    }

    /// Schema from a JSON descriptor
    ///
    /// # Errors
    ///
    /// [`SchemaError::Configuration`](rulebook_core::SchemaError::Configuration)
    /// when the descriptor is missing or not an object, and any rule parse
    /// error.
    pub fn from_json(descriptor: &Value) -> Result<Self> {
        Ok(Self::new(Descriptor::from_json(descriptor)?))
    }

    pub(crate) fn nested(rules: Descriptor, messages: Messages, registry: Arc<Registry>) -> Self {
        Self {
            rules,
            messages,
            registry,
        }
    }

    /// Replace every rule
    pub fn define(&mut self, rules: Descriptor) {
        self.rules = rules;
    }

    /// Replace every rule from a JSON descriptor.
    ///
    /// On error the current rules are kept.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::from_json`].
    pub fn define_json(&mut self, descriptor: &Value) -> Result<()> {
        self.rules = Descriptor::from_json(descriptor)?;
        Ok(())
    }

    /// Effective message catalog
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Merge `overrides` onto this schema's catalog and return the result.
    ///
    /// Other schemas sharing the same catalog are unaffected.
    pub fn merge_messages(&mut self, overrides: &Value) -> &Messages {
        self.messages.merge(overrides);
        &self.messages
    }

    /// Declared rules
    pub fn rules(&self) -> &Descriptor {
        &self.rules
    }

    /// Registry used to resolve rule types
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Register `validator` for `type_name` in this schema's registry.
    ///
    /// Every schema sharing the registry sees the new type.
    pub fn register(&self, type_name: impl Into<String>, validator: impl Validator + 'static) {
        self.registry.register(type_name, validator);
    }

    /// Validate `source` against the rules.
    ///
    /// `source` is never modified; transforms work on a private copy.
    ///
    /// # Errors
    ///
    /// Configuration errors only, such as a rule naming an unknown type
    /// without its own validator. Failed rules are reported in the
    /// [`ValidationReport`].
    pub fn validate<'a>(
        &'a self,
        source: &'a Value,
        options: ValidateOptions,
    ) -> BoxFuture<'a, Result<ValidationReport>> {
        async move {
            let messages = match &options.messages {
                Some(overrides) => {
                    let mut messages = self.messages.clone();
                    messages.merge(overrides);
                    Cow::Owned(messages)
                }
                None => Cow::Borrowed(&self.messages),
            };

            let (series, source) = build_series(&self.rules, source, &options, &self.registry)?;
            debug!(
                fields = series.len(),
                tasks = series.values().map(Vec::len).sum::<usize>(),
                "validating"
            );

            let resolver = Resolver {
                source: &*source,
                options: &options,
                messages: &*messages,
                registry: &self.registry,
            };
            let results = run_series(
                &series,
                |field| options.stops_on_first_error(field),
                |task| resolver.resolve(task),
            )
            .await?;

            let report = ValidationReport::aggregate(results);
            debug!(errors = report.error_count(), "validation finished");
            Ok(report)
        }
        .boxed()
    }
}
