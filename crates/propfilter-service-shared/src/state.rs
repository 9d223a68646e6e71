//! Application state shared by the router's handlers and middleware.

use std::sync::Arc;

use propfilter_lib::FilterStep;

use crate::chain::ErrorChain;
use crate::config::{Environment, ServiceConfig, DEFAULT_BODY_LIMIT};

/// Shared application state.
///
/// Cheap to clone. Holds nothing request-specific: every request owns its
/// body and derived records.
#[derive(Debug, Clone)]
pub struct AppState {
    filter_step: FilterStep,
    errors: Arc<ErrorChain>,
    body_limit: usize,
}

impl AppState {
    /// State with the given filter step and an error chain for `environment`.
    pub fn new(filter_step: FilterStep, environment: Environment) -> Self {
        Self {
            filter_step,
            errors: Arc::new(ErrorChain::new(environment)),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.filter_step(), config.environment).with_body_limit(config.body_limit)
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    pub fn filter_step(&self) -> &FilterStep {
        &self.filter_step
    }

    pub fn errors(&self) -> Arc<ErrorChain> {
        Arc::clone(&self.errors)
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}
