//! Serenity-backed implementation of the voice platform boundary
//!
//! All platform objects are validated here once; the room flows downstream
//! only ever see the typed capability set. A 404 from the platform is folded
//! into `None`/success so reclamation can race with external deletions.

use crate::error::{Result, RoomServiceError};
use crate::platform::provider::VoicePlatform;
use crate::types::{CategoryId, ChannelId, UserId, VoiceChannelSnapshot};
use async_trait::async_trait;
use serenity::all::{
    Cache, Channel, ChannelId as DiscordChannelId, ChannelType, Context, CreateChannel,
    EditMember, GuildChannel, GuildId as DiscordGuildId, Http, UserId as DiscordUserId,
};
use serenity::http::{HttpError, StatusCode};
use serenity::Error as SerenityError;
use std::sync::Arc;

/// Production platform client over serenity's HTTP API and gateway cache
///
/// Channel fetches and deletions work on any channel id; creation and member
/// relocation are guild operations and require a guild-bound instance.
#[derive(Clone)]
pub struct DiscordPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    guild: Option<DiscordGuildId>,
}

impl DiscordPlatform {
    /// Platform bound to a guild, for event paths that create or move
    pub fn for_guild(ctx: &Context, guild: DiscordGuildId) -> Self {
        Self {
            http: ctx.http.clone(),
            cache: ctx.cache.clone(),
            guild: Some(guild),
        }
    }

    /// Guild-free platform for the sweep task, which only fetches and deletes
    pub fn unbound(ctx: &Context) -> Self {
        Self {
            http: ctx.http.clone(),
            cache: ctx.cache.clone(),
            guild: None,
        }
    }

    fn bound_guild(&self, operation: &str) -> Result<DiscordGuildId> {
        self.guild.ok_or_else(|| {
            RoomServiceError::MissingGuildContext {
                operation: operation.to_string(),
            }
            .into()
        })
    }

    /// Resolve a guild voice channel over HTTP; `None` when it is gone or not
    /// a voice channel
    async fn resolve_voice_channel(&self, channel: ChannelId) -> Result<Option<GuildChannel>> {
        match self.http.get_channel(DiscordChannelId::new(channel.0)).await {
            Ok(Channel::Guild(guild_channel)) if guild_channel.kind == ChannelType::Voice => {
                Ok(Some(guild_channel))
            }
            Ok(_) => Ok(None),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(RoomServiceError::platform("fetch_channel", err).into()),
        }
    }

    /// Count members connected to a voice channel, from the gateway cache
    fn cached_occupancy(&self, guild: DiscordGuildId, channel: DiscordChannelId) -> usize {
        self.cache
            .guild(guild)
            .map(|g| {
                g.voice_states
                    .values()
                    .filter(|state| state.channel_id == Some(channel))
                    .count()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl VoicePlatform for DiscordPlatform {
    async fn create_voice_channel(
        &self,
        name: &str,
        category: Option<CategoryId>,
    ) -> Result<ChannelId> {
        let guild = self.bound_guild("create_voice_channel")?;

        let mut builder = CreateChannel::new(name).kind(ChannelType::Voice);
        if let Some(parent) = category {
            builder = builder.category(DiscordChannelId::new(parent.0));
        }

        let channel = guild
            .create_channel(&self.http, builder)
            .await
            .map_err(|err| RoomServiceError::platform("create_voice_channel", err))?;

        Ok(ChannelId(channel.id.get()))
    }

    async fn channel_category(&self, channel: ChannelId) -> Result<Option<CategoryId>> {
        match self.resolve_voice_channel(channel).await? {
            Some(guild_channel) => Ok(guild_channel.parent_id.map(|p| CategoryId(p.get()))),
            None => Err(RoomServiceError::ChannelNotFound {
                channel_id: channel.to_string(),
            }
            .into()),
        }
    }

    async fn fetch_voice_channel(
        &self,
        channel: ChannelId,
    ) -> Result<Option<VoiceChannelSnapshot>> {
        let Some(guild_channel) = self.resolve_voice_channel(channel).await? else {
            return Ok(None);
        };

        let member_count = self.cached_occupancy(guild_channel.guild_id, guild_channel.id);
        Ok(Some(VoiceChannelSnapshot {
            id: channel,
            name: guild_channel.name.clone(),
            member_count,
        }))
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<()> {
        match DiscordChannelId::new(channel.0).delete(&self.http).await {
            Ok(_) => Ok(()),
            // Already gone, e.g. the reactive path and the sweep raced
            Err(err) if is_not_found(&err) => Ok(()),
            Err(err) => Err(RoomServiceError::platform("delete_channel", err).into()),
        }
    }

    async fn move_member(&self, user: UserId, channel: ChannelId) -> Result<()> {
        let guild = self.bound_guild("move_member")?;

        guild
            .edit_member(
                &self.http,
                DiscordUserId::new(user.0),
                EditMember::new().voice_channel(DiscordChannelId::new(channel.0)),
            )
            .await
            .map_err(|err| RoomServiceError::platform("move_member", err))?;

        Ok(())
    }

    async fn voice_channel_members(&self, channel: ChannelId) -> Result<Vec<UserId>> {
        let Some(guild_channel) = self.resolve_voice_channel(channel).await? else {
            return Err(RoomServiceError::ChannelNotFound {
                channel_id: channel.to_string(),
            }
            .into());
        };

        let members = self
            .cache
            .guild(guild_channel.guild_id)
            .map(|g| {
                g.voice_states
                    .values()
                    .filter(|state| state.channel_id == Some(guild_channel.id))
                    .map(|state| UserId(state.user_id.get()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(members)
    }
}

/// Whether a serenity error is a 404 from the REST API
fn is_not_found(err: &SerenityError) -> bool {
    matches!(
        err,
        SerenityError::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code == StatusCode::NOT_FOUND
    )
}
