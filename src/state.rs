use std::sync::Arc;

use crate::config::Config;
use crate::photos::{self, PhotoStore};
use crate::rate_limit::SubmissionRateLimiter;
use crate::sinks::{self, SubmissionSink};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub sink: Arc<dyn SubmissionSink>,
    pub photo_store: Arc<dyn PhotoStore>,
    pub submission_limiter: SubmissionRateLimiter,
}

impl AppState {
    /// State with the sink and photo store the configuration selects.
    pub fn from_config(config: Config) -> Self {
        let sink = sinks::build(&config);
        let photo_store = photos::build(&config.photos);
        Self::new(config, sink, photo_store)
    }

    pub fn new(config: Config, sink: Arc<dyn SubmissionSink>, photo_store: Arc<dyn PhotoStore>) -> Self {
        Self {
            submission_limiter: SubmissionRateLimiter::new(config.rate_limit),
            config,
            sink,
            photo_store,
        }
    }
}
