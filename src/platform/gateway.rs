//! Gateway event handler
//!
//! Bridges serenity's event callbacks into the room flows. Every handler
//! catches and logs its own failures; nothing here propagates an error out of
//! the event loop. The periodic sweep task is spawned once on the first
//! `ready` event and keeps running across gateway reconnects.

use crate::platform::discord::DiscordPlatform;
use crate::rooms::{RoomProvisioner, RoomReclaimer, TeamRandomizer};
use crate::types::{
    ChannelId, CommandIssuer, RoleId, UserId, VoiceTransition, GENERIC_FAILURE_REPLY,
};
use serenity::all::{
    Context, EventHandler, GuildId as DiscordGuildId, Message, Ready,
    RoleId as DiscordRoleId, VoiceState,
};
use serenity::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Subcommand that triggers team randomization
const RANDOMIZE_SUBCOMMAND: &str = "custom";

/// Serenity event handler wiring gateway events into the room flows
pub struct GatewayHandler {
    provisioner: RoomProvisioner,
    reclaimer: Arc<RoomReclaimer>,
    randomizer: TeamRandomizer,
    required_role: RoleId,
    command_prefix: String,
    sweep_interval: Duration,
    sweep_started: AtomicBool,
}

impl GatewayHandler {
    pub fn new(
        provisioner: RoomProvisioner,
        reclaimer: Arc<RoomReclaimer>,
        randomizer: TeamRandomizer,
        required_role: RoleId,
        command_prefix: String,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            provisioner,
            reclaimer,
            randomizer,
            required_role,
            command_prefix,
            sweep_interval,
            sweep_started: AtomicBool::new(false),
        }
    }

    /// Resolve the command issuer's role and current voice channel
    async fn resolve_issuer(
        &self,
        ctx: &Context,
        guild: DiscordGuildId,
        msg: &Message,
    ) -> crate::error::Result<CommandIssuer> {
        let holds_required_role = msg
            .author
            .has_role(ctx, guild, DiscordRoleId::new(self.required_role.0))
            .await?;

        let voice_channel = ctx
            .cache
            .guild(guild)
            .and_then(|g| {
                g.voice_states
                    .get(&msg.author.id)
                    .and_then(|state| state.channel_id)
            })
            .map(|id| ChannelId(id.get()));

        Ok(CommandIssuer {
            user: UserId(msg.author.id.get()),
            holds_required_role,
            voice_channel,
        })
    }
}

#[async_trait]
impl EventHandler for GatewayHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Gateway session ready"
        );

        // Reconnects re-emit ready; the sweep task must only exist once
        if self.sweep_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let platform = DiscordPlatform::unbound(&ctx);
        let reclaimer = self.reclaimer.clone();
        let period = self.sweep_interval;

        info!(period_ms = period.as_millis() as u64, "Starting reclamation sweep task");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // interval fires immediately; skip the initial tick so the first
            // sweep runs one full period after startup
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match reclaimer.sweep(&platform).await {
                    Ok(report) if report.examined > 0 => {
                        debug!(?report, "Sweep cycle complete");
                    }
                    Ok(_) => {}
                    Err(err) => warn!(error = %err, "Sweep cycle failed"),
                }
            }
        });
    }

    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let Some(guild) = new.guild_id.or_else(|| old.as_ref().and_then(|s| s.guild_id)) else {
            return;
        };
        let Some(transition) = voice_transition(old.as_ref(), &new) else {
            return;
        };

        debug!(
            user = %transition.user,
            old = ?transition.old_channel,
            new = ?transition.new_channel,
            "Voice state transition"
        );

        let platform = DiscordPlatform::for_guild(&ctx, guild);

        if let Err(err) = self
            .provisioner
            .handle_transition(&platform, &transition)
            .await
        {
            error!(error = %err, user = %transition.user, "Provisioning flow failed");
        }

        if let Err(err) = self
            .reclaimer
            .handle_departure(&platform, &transition)
            .await
        {
            error!(error = %err, user = %transition.user, "Reactive reclamation failed");
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild) = msg.guild_id else {
            return;
        };
        let Some(subcommand) = parse_subcommand(&msg.content, &self.command_prefix) else {
            return;
        };
        if subcommand != RANDOMIZE_SUBCOMMAND {
            return;
        }

        let issuer = match self.resolve_issuer(&ctx, guild, &msg).await {
            Ok(issuer) => issuer,
            Err(err) => {
                error!(error = %err, user = %msg.author.id, "Failed to resolve command issuer");
                return;
            }
        };

        let platform = DiscordPlatform::for_guild(&ctx, guild);
        let reply = match self.randomizer.randomize(&platform, &issuer).await {
            Ok(outcome) => outcome.reply_text(),
            Err(err) => {
                error!(error = %err, issuer = %issuer.user, "Team randomize failed");
                GENERIC_FAILURE_REPLY
            }
        };

        if let Err(err) = msg.channel_id.say(&ctx.http, reply).await {
            warn!(error = %err, "Failed to send command reply");
        }
    }
}

/// Convert serenity voice states into a transition; `None` when the subject
/// member is unknown
fn voice_transition(old: Option<&VoiceState>, new: &VoiceState) -> Option<VoiceTransition> {
    let display_name = new.member.as_ref().map(|m| m.display_name().to_string())?;

    Some(VoiceTransition {
        user: UserId(new.user_id.get()),
        display_name,
        old_channel: old
            .and_then(|state| state.channel_id)
            .map(|id| ChannelId(id.get())),
        new_channel: new.channel_id.map(|id| ChannelId(id.get())),
    })
}

/// Extract the lowercased subcommand from a prefixed message, if any
fn parse_subcommand(content: &str, prefix: &str) -> Option<String> {
    let rest = content.strip_prefix(prefix)?;
    rest.trim()
        .split_whitespace()
        .next()
        .map(|word| word.to_lowercase())
}
