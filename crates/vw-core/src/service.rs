use crate::config::ManagerConfig;
use crate::error::VlanResult;
use async_trait::async_trait;

/// Lifecycle hooks for a long-lived component hosted by the management
/// agent.
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    /// Adopts a new configuration. Called before `start`.
    async fn initialize(&mut self, config: &ManagerConfig) -> VlanResult<()>;

    async fn start(&self) -> VlanResult<()>;

    async fn stop(&self) -> VlanResult<()> {
        Ok(())
    }

    async fn cleanup(&self) -> VlanResult<()> {
        Ok(())
    }
}
