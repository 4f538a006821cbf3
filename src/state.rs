use crate::inference::OllamaClient;
use crate::rate_limit::SlidingWindowLimiter;

// app's shared state, built once in main and handed to the router
pub struct AppState {
    pub limiter: SlidingWindowLimiter,
    pub inference: OllamaClient,
}
