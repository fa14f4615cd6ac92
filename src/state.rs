use crate::coordinator::RequestCoordinator;

// app's shared state, built once at startup and shared by Arc
pub struct AppState {
    pub coordinator: RequestCoordinator,
}

impl AppState {
    pub fn new(coordinator: RequestCoordinator) -> Self {
        Self { coordinator }
    }
}
