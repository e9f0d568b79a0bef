//! Gateway 应用状态

use std::sync::Arc;

use crate::sentiment::SentimentService;

/// Gateway 应用状态
///
/// 请求之间只共享只读的服务实例，无需加锁
#[derive(Clone)]
pub struct AppState {
    service: Arc<dyn SentimentService>,
}

impl AppState {
    pub fn new(service: Arc<dyn SentimentService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &dyn SentimentService {
        self.service.as_ref()
    }
}
