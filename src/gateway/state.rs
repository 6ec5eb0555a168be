use std::sync::Arc;

use crate::pipeline::{DocumentIndexer, QueryPipeline};

#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<QueryPipeline>,
    pub indexer: Arc<DocumentIndexer>,
}

impl GatewayState {
    pub fn new(pipeline: Arc<QueryPipeline>, indexer: Arc<DocumentIndexer>) -> Self {
        Self { pipeline, indexer }
    }
}
