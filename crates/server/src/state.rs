use service::mocks::MockService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub mocks: MockService,
    /// Normalized route prefix: empty or `/segment` without trailing slash.
    pub prefix: String,
}

impl AppState {
    pub fn new(mocks: MockService, prefix: impl Into<String>) -> Self {
        Self { mocks, prefix: prefix.into() }
    }
}
