use crate::auth::{require_user, AuthProvider, User};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::remote::{GraphqlClient, GraphqlRemote, Remote};
use std::sync::Arc;

/// Everything a service needs to talk to the outside world.
///
/// Built once at startup and shared by `Arc`.
pub struct KanbanContext {
    config: ClientConfig,
    auth: Arc<dyn AuthProvider>,
    remote: Arc<dyn Remote>,
}

impl KanbanContext {
    pub fn new(config: ClientConfig, auth: Arc<dyn AuthProvider>, remote: Arc<dyn Remote>) -> Self {
        Self {
            config,
            auth,
            remote,
        }
    }

    /// Context backed by the hosted GraphQL service described by `config`
    pub fn connect(config: ClientConfig, auth: Arc<dyn AuthProvider>) -> Result<Self> {
        let client = GraphqlClient::new(&config, Arc::clone(&auth))?;
        tracing::debug!(endpoint = client.endpoint(), "using GraphQL endpoint");
        let remote: Arc<dyn Remote> = Arc::new(GraphqlRemote::new(client));
        Ok(Self::new(config, auth, remote))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.auth
    }

    pub fn remote(&self) -> &Arc<dyn Remote> {
        &self.remote
    }

    /// The signed-in user, or `AuthenticationRequired`
    pub async fn require_user(&self) -> Result<User> {
        require_user(self.auth.as_ref()).await
    }
}
