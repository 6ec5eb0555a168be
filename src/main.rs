//! Attest HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use attest::config::Config;
use attest::embedding::{EmbedderConfig, OpenAiEmbedder};
use attest::gateway::{GatewayState, create_router};
use attest::generation::{GeneratorConfig, OpenAiGenerator};
use attest::moderation::{ModerationGate, ModeratorConfig, OpenAiModerator};
use attest::pipeline::{DocumentIndexer, QueryPipeline, RetryPolicy};
use attest::reranking::{HttpReranker, HttpRerankerConfig, LexicalReranker, RerankClient};
use attest::retrieval::Retriever;
use attest::vectordb::{QdrantStore, VectorStore};
use attest::verification::AnswerVerifier;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
 █████╗ ████████╗████████╗███████╗███████╗████████╗
██╔══██╗╚══██╔══╝╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
███████║   ██║      ██║   █████╗  ███████╗   ██║
██╔══██║   ██║      ██║   ██╔══╝  ╚════██║   ██║
██║  ██║   ██║      ██║   ███████╗███████║   ██║
╚═╝  ╚═╝   ╚═╝      ╚═╝   ╚══════╝╚══════╝   ╚═╝

        RETRIEVE. GROUND. VERIFY.
"#
    );

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Attest starting"
    );

    let embedder = Arc::new(OpenAiEmbedder::new(
        EmbedderConfig::new(config.api_base.clone(), config.api_key.clone())
            .with_model(config.embedding_model.clone(), config.embedding_dimension),
    ));

    let store = Arc::new(
        QdrantStore::new(
            &config.qdrant_url,
            config.collection.clone(),
            config.embedding_dimension as u64,
        )
        .await?,
    );
    store.ensure_collection().await?;
    tracing::info!(
        qdrant_url = %config.qdrant_url,
        collection = %config.collection,
        "Vector store ready"
    );

    let reranker: Arc<dyn RerankClient> = match &config.rerank_endpoint {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "Using HTTP cross-encoder reranker");
            Arc::new(HttpReranker::new(HttpRerankerConfig::new(endpoint.clone()))?)
        }
        None => {
            tracing::warn!("No ATTEST_RERANK_ENDPOINT configured, using lexical reranker");
            Arc::new(LexicalReranker::new())
        }
    };

    let llm = Arc::new(OpenAiGenerator::new(
        GeneratorConfig {
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            ..GeneratorConfig::new(config.api_base.clone(), config.api_key.clone())
        }
        .with_model(config.llm_model.clone()),
    ));

    let moderator = Arc::new(OpenAiModerator::new(ModeratorConfig::new(
        config.api_base.clone(),
        config.api_key.clone(),
    )));
    let moderation = if config.moderation_enabled {
        ModerationGate::new(moderator)
    } else {
        tracing::warn!("Content moderation disabled by configuration");
        ModerationGate::disabled(moderator)
    };

    let retry = RetryPolicy::new(
        config.retry_attempts,
        Duration::from_millis(config.retry_base_delay_ms),
    );

    let retriever = Retriever::new(
        embedder.clone(),
        store.clone(),
        reranker,
        config.retrieval_config(),
    )?;
    let verifier = AnswerVerifier::new(config.verifier_config())?;

    let pipeline = Arc::new(QueryPipeline::new(
        moderation, retriever, llm, verifier, retry,
    ));
    let indexer = Arc::new(DocumentIndexer::new(
        config.chunking_config(),
        embedder,
        store,
        retry,
    )?);

    let app = create_router(GatewayState::new(pipeline, indexer));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Attest shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
