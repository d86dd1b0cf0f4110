use std::sync::Arc;

use tracing::info;

use crate::config::BotConfig;
use crate::server;
use crate::store::FileStore;
use crate::tasks::digest_loop;

/// Brings the bot up: the monthly digest loop in the background, the
/// registration endpoint in the foreground. Runs until killed.
pub async fn run_api(store: Arc<FileStore>, config: BotConfig) {
    tokio::spawn({
        let store = store.clone();
        let config = config.clone();
        async move {
            digest_loop::run_digest_loop(store, config).await;
        }
    });

    let routes = server::routes(store, config.admin_token.clone());
    info!("registration endpoint listening on 0.0.0.0:{}", config.listen_port);
    warp::serve(routes).run(([0, 0, 0, 0], config.listen_port)).await;
}
