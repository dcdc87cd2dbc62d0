use std::sync::Arc;

use crate::config::ViewConfig;
use crate::extract::ColumnLayout;
use crate::fetch::PageSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PageSource>,
    pub columns: Arc<ColumnLayout>,
    pub views: ViewConfig,
}
