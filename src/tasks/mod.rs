//! Background scheduled tasks for the application.
//!
//! Currently this closes campaigns whose application deadline has passed.
//! Call `spawn_all` once during startup to launch them.

use crate::services::CampaignService;
use std::time::Duration;

const CLOSE_EXPIRED_INTERVAL: Duration = Duration::from_secs(3600);

/// Spawn all background tasks.
///
/// Each task is idempotent and detached via `tokio::spawn`; this function does not block.
pub fn spawn_all(campaign_service: CampaignService) {
    // 截止日已过的招募中活动自动关闭（每小时）
    tokio::spawn(async move {
        loop {
            match campaign_service.close_expired_campaigns().await {
                Ok(n) if n > 0 => log::info!("Expired campaigns closed: {n}"),
                Ok(_) => {}
                Err(e) => log::error!("Failed to close expired campaigns: {e:?}"),
            }
            tokio::time::sleep(CLOSE_EXPIRED_INTERVAL).await;
        }
    });
}
