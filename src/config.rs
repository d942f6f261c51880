use serenity::model::id::GuildId;
use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN is not set")]
    MissingToken,
    #[error("TIERVOTE_GUILD_ID `{0}` is not a valid guild id")]
    InvalidGuildId(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// Register commands on this guild only; global registration otherwise.
    pub guild_id: Option<GuildId>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let guild_id = match lookup("TIERVOTE_GUILD_ID").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => Some(GuildId(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidGuildId(raw.clone()))?,
            )),
            None => None,
        };

        Ok(Self { token, guild_id })
    }
}
