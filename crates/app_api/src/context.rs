use llmsh_app::{AppPaths, AppState};

#[derive(Clone)]
pub struct AppContext {
    pub app_state: AppState,
    pub paths: AppPaths,
}
