use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use axum_extra::extract::{CookieJar, PrivateCookieJar};
use saddlebag_api_types::world::Realm;
use saddlebag_api_types::{FfxivRegion, FormChoice, HomeDefaults, ValidationErrors, WowRegion};
use serde::Deserialize;

use super::oauth::DiscordAuthConfig;
use crate::catalog::Catalog;

pub(crate) const FFXIV_WORLD_COOKIE: &str = "ffxiv_world";
pub(crate) const WOW_REGION_COOKIE: &str = "wow_region";
pub(crate) const WOW_REALM_COOKIE: &str = "wow_realm";
pub(crate) const THEME_COOKIE: &str = "theme";
pub(crate) const DISCORD_ID_COOKIE: &str = "discord_id";
pub(crate) const DISCORD_NAME_COOKIE: &str = "discord_name";
pub(crate) const DISCORD_AVATAR_COOKIE: &str = "discord_avatar";

const DEFAULT_WORLD: &str = "Balmung";
const DEFAULT_DATACENTER: &str = "Crystal";
const REALM_SEPARATOR: &str = "---";

/// The visual theme mode of the application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ThemeMode {
    System,
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub(crate) const ALL: [ThemeMode; 3] = [ThemeMode::System, ThemeMode::Dark, ThemeMode::Light];

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            ThemeMode::System => "Match system",
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "system" => ThemeMode::System,
            "light" => ThemeMode::Light,
            _ => ThemeMode::Dark,
        })
    }
}

/// Discord account shown in the header once logged in
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DiscordIdentity {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) avatar_url: Option<String>,
}

/// Per visitor settings, read from cookies on every request
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Preferences {
    pub(crate) ffxiv_world: String,
    pub(crate) ffxiv_datacenter: String,
    pub(crate) ffxiv_region: FfxivRegion,
    pub(crate) wow_region: WowRegion,
    pub(crate) wow_realm: Realm,
    pub(crate) theme: ThemeMode,
    pub(crate) discord: Option<DiscordIdentity>,
    /// Whether the server has Discord login configured
    pub(crate) login_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            ffxiv_world: DEFAULT_WORLD.to_string(),
            ffxiv_datacenter: DEFAULT_DATACENTER.to_string(),
            ffxiv_region: FfxivRegion::NorthAmerica,
            wow_region: WowRegion::NorthAmerica,
            wow_realm: Realm {
                id: 3678,
                name: "Thrall".to_string(),
            },
            theme: ThemeMode::default(),
            discord: None,
            login_enabled: false,
        }
    }
}

/// `id---name`, looked up by id first and by name when the id is stale or missing
fn realm_from_cookie<'a>(catalog: &'a Catalog, region: WowRegion, value: &str) -> Option<&'a Realm> {
    let (id, name) = value.split_once(REALM_SEPARATOR).unwrap_or(("", value));
    id.trim()
        .parse()
        .ok()
        .and_then(|id| catalog.realm(region, id))
        .or_else(|| catalog.realm_by_name(region, name.trim()))
}

fn preference_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::days(365))
        .build()
}

impl Preferences {
    /// Never fails: anything unknown or malformed falls back to the defaults
    pub(crate) fn resolve(
        catalog: &Catalog,
        cookies: &CookieJar,
        private: &PrivateCookieJar,
        login_enabled: bool,
    ) -> Self {
        let mut preferences = Self {
            login_enabled,
            ..Self::default()
        };
        if let Some(location) = cookies
            .get(FFXIV_WORLD_COOKIE)
            .and_then(|cookie| catalog.find_world(cookie.value()))
        {
            preferences.ffxiv_world = location.world.to_string();
            preferences.ffxiv_datacenter = location.datacenter.name.clone();
            preferences.ffxiv_region = location.region;
        }
        if let Some(region) = cookies
            .get(WOW_REGION_COOKIE)
            .and_then(|cookie| cookie.value().parse::<WowRegion>().ok())
        {
            preferences.wow_region = region;
        }
        let realm = cookies
            .get(WOW_REALM_COOKIE)
            .and_then(|cookie| realm_from_cookie(catalog, preferences.wow_region, cookie.value()))
            .or_else(|| catalog.default_realm(preferences.wow_region));
        if let Some(realm) = realm {
            preferences.wow_realm = realm.clone();
        }
        if let Some(theme) = cookies.get(THEME_COOKIE) {
            preferences.theme = theme.value().parse().unwrap_or_default();
        }
        preferences.discord = match (
            private.get(DISCORD_ID_COOKIE),
            private.get(DISCORD_NAME_COOKIE),
        ) {
            (Some(id), Some(name)) => Some(DiscordIdentity {
                id: id.value().to_string(),
                name: name.value().to_string(),
                avatar_url: private
                    .get(DISCORD_AVATAR_COOKIE)
                    .map(|avatar| avatar.value().to_string()),
            }),
            _ => None,
        };
        preferences
    }

    pub(crate) fn home_defaults(&self) -> HomeDefaults {
        HomeDefaults {
            ffxiv_world: self.ffxiv_world.clone(),
            ffxiv_region: self.ffxiv_region,
            wow_region: self.wow_region,
            wow_realm_id: self.wow_realm.id,
            wow_realm_name: self.wow_realm.name.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for Preferences
where
    S: Send + Sync,
    Key: FromRef<S>,
    Arc<Catalog>: FromRef<S>,
    Option<DiscordAuthConfig>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = CookieJar::from_request_parts(parts, state).await?;
        let private = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;
        let catalog = Arc::<Catalog>::from_ref(state);
        let login_enabled = Option::<DiscordAuthConfig>::from_ref(state).is_some();
        Ok(Self::resolve(&catalog, &cookies, &private, login_enabled))
    }
}

/// Submitted from the options page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PreferencesForm {
    pub(crate) ffxiv_world: String,
    pub(crate) wow_region: String,
    pub(crate) wow_realm: Option<i32>,
    pub(crate) theme: String,
}

impl PreferencesForm {
    /// Stores the submitted preferences. The world has to exist, a realm outside the
    /// chosen region is swapped for that region's default realm.
    pub(crate) fn save(
        &self,
        catalog: &Catalog,
        cookies: CookieJar,
    ) -> Result<CookieJar, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let world = catalog.find_world(&self.ffxiv_world);
        errors.check(
            world.is_some(),
            "ffxiv_world",
            format!("Unknown world `{}`", self.ffxiv_world.trim()),
        );
        let region = self.wow_region.parse::<WowRegion>().ok();
        errors.check(region.is_some(), "wow_region", "Pick a WoW region");
        errors.into_result()?;
        let (Some(world), Some(region)) = (world, region) else {
            return Err(ValidationErrors::new());
        };
        let realm = self
            .wow_realm
            .and_then(|id| catalog.realm(region, id))
            .or_else(|| catalog.default_realm(region));
        let theme: ThemeMode = self.theme.parse().unwrap_or_default();

        let mut cookies = cookies
            .add(preference_cookie(FFXIV_WORLD_COOKIE, world.world.to_string()))
            .add(preference_cookie(WOW_REGION_COOKIE, region.value().to_string()))
            .add(preference_cookie(THEME_COOKIE, theme.as_str().to_string()));
        if let Some(realm) = realm {
            cookies = cookies.add(preference_cookie(
                WOW_REALM_COOKIE,
                format!("{}{REALM_SEPARATOR}{}", realm.id, realm.name),
            ));
        }
        Ok(cookies)
    }
}

#[cfg(test)]
mod test {
    use axum_extra::extract::cookie::{Cookie, Key};
    use axum_extra::extract::{CookieJar, PrivateCookieJar};
    use saddlebag_api_types::{FfxivRegion, WowRegion};

    use super::{Preferences, PreferencesForm, ThemeMode};
    use crate::catalog::Catalog;

    fn resolve(cookies: CookieJar) -> Preferences {
        let catalog = Catalog::embedded().unwrap();
        Preferences::resolve(&catalog, &cookies, &PrivateCookieJar::new(Key::generate()), false)
    }

    #[test]
    fn empty_jar_uses_defaults() {
        let preferences = resolve(CookieJar::new());
        assert_eq!(preferences, Preferences::default());
        let home = preferences.home_defaults();
        assert_eq!(home.ffxiv_world, "Balmung");
        assert_eq!(home.wow_realm_id, 3678);
    }

    #[test]
    fn cookies_are_resolved_against_the_catalog() {
        let preferences = resolve(
            CookieJar::new()
                .add(Cookie::new("ffxiv_world", "odin"))
                .add(Cookie::new("wow_region", "EU"))
                .add(Cookie::new("wow_realm", "1305---Kazzak"))
                .add(Cookie::new("theme", "light")),
        );
        assert_eq!(preferences.ffxiv_world, "Odin");
        assert_eq!(preferences.ffxiv_datacenter, "Light");
        assert_eq!(preferences.ffxiv_region, FfxivRegion::Europe);
        assert_eq!(preferences.wow_region, WowRegion::Europe);
        assert_eq!(preferences.wow_realm.name, "Kazzak");
        assert_eq!(preferences.theme, ThemeMode::Light);
    }

    #[test]
    fn unknown_values_fall_back() {
        let preferences = resolve(
            CookieJar::new()
                .add(Cookie::new("ffxiv_world", "Atlantis"))
                .add(Cookie::new("wow_region", "EU"))
                .add(Cookie::new("wow_realm", "3678---Thrall"))
                .add(Cookie::new("theme", "neon")),
        );
        assert_eq!(preferences.ffxiv_world, "Balmung");
        assert_eq!(preferences.wow_realm.id, 1403);
        assert_eq!(preferences.theme, ThemeMode::Dark);
    }

    #[test]
    fn stale_realm_ids_fall_back_to_the_name() {
        let preferences = resolve(
            CookieJar::new()
                .add(Cookie::new("wow_region", "EU"))
                .add(Cookie::new("wow_realm", "9999---hyjal")),
        );
        assert_eq!(preferences.wow_realm.id, 1121);
        assert_eq!(preferences.wow_realm.name, "Hyjal");
    }

    #[test]
    fn private_cookies_carry_the_discord_identity() {
        let catalog = Catalog::embedded().unwrap();
        let private = PrivateCookieJar::new(Key::generate())
            .add(Cookie::new("discord_id", "42"))
            .add(Cookie::new("discord_name", "moogle"));
        let preferences = Preferences::resolve(&catalog, &CookieJar::new(), &private, true);
        let discord = preferences.discord.unwrap();
        assert_eq!(discord.name, "moogle");
        assert_eq!(discord.avatar_url, None);
        assert!(preferences.login_enabled);
    }

    #[test]
    fn saving_swaps_foreign_realms_for_the_region_default() {
        let catalog = Catalog::embedded().unwrap();
        let form = PreferencesForm {
            ffxiv_world: "zalera".into(),
            wow_region: "EU".into(),
            wow_realm: Some(3678),
            theme: "system".into(),
        };
        let cookies = form.save(&catalog, CookieJar::new()).unwrap();
        assert_eq!(cookies.get("ffxiv_world").unwrap().value(), "Zalera");
        assert_eq!(cookies.get("wow_realm").unwrap().value(), "1403---Draenor");
        assert_eq!(cookies.get("theme").unwrap().value(), "system");
        assert_eq!(
            cookies.get("wow_region").unwrap().same_site(),
            Some(axum_extra::extract::cookie::SameSite::Lax)
        );
    }

    #[test]
    fn saving_rejects_unknown_worlds() {
        let catalog = Catalog::embedded().unwrap();
        let form = PreferencesForm {
            ffxiv_world: "Atlantis".into(),
            wow_region: "NA".into(),
            ..Default::default()
        };
        let errors = form.save(&catalog, CookieJar::new()).unwrap_err();
        assert_eq!(errors.for_field("ffxiv_world").count(), 1);
    }
}
