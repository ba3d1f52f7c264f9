use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use std::time::Duration;
use vx_gateway::Delay;

/// Browser timer used for the simulated gateway latency.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooDelay;

#[async_trait(?Send)]
impl Delay for GlooDelay {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}
