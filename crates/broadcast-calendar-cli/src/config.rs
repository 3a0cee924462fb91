use anyhow::{Context, Result};
use broadcast_calendar::{BroadcastCalendar, CutoverRule};
use clap::Args;
use tracing::debug;

/// Options shared by every subcommand. Each falls back to an environment variable.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// IANA timezone whose wall clock defines the broadcast week
    #[arg(long, global = true, env = "BCAL_TZ", default_value = "UTC")]
    pub tz: String,

    /// Weekly cutover that starts a broadcast week, as weekday@HH:MM
    #[arg(long, global = true, env = "BCAL_CUTOVER", default_value = "fri@19:00")]
    pub cutover: CutoverRule,
}

impl Config {
    pub fn calendar(&self) -> Result<BroadcastCalendar> {
        let calendar = BroadcastCalendar::from_timezone_name(&self.tz)
            .with_context(|| format!("failed to load timezone (--tz / BCAL_TZ = {})", self.tz))?
            .with_cutover(self.cutover);
        debug!(tz = %calendar.timezone(), cutover = %calendar.cutover(), "calendar configured");
        Ok(calendar)
    }
}
