use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::PrivateCookieJar;
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::url::ParseError;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use tracing::info;

use super::error::WebError;
use super::preferences::{DISCORD_AVATAR_COOKIE, DISCORD_ID_COOKIE, DISCORD_NAME_COOKIE};
use crate::config::DiscordSettings;

const CSRF_COOKIE: &str = "discord_csrf";
const PKCE_COOKIE: &str = "discord_pkce";
const DISCORD_USER_URL: &str = "https://discord.com/api/users/@me";

#[derive(Clone, Debug)]
pub(crate) struct DiscordAuthConfig {
    inner: Arc<BasicClient>,
}

impl DiscordAuthConfig {
    pub(crate) fn new(settings: &DiscordSettings) -> Result<Self, ParseError> {
        let client = BasicClient::new(
            ClientId::new(settings.client_id.clone()),
            Some(ClientSecret::new(settings.client_secret.clone())),
            AuthUrl::new("https://discord.com/api/oauth2/authorize".to_string())?,
            Some(TokenUrl::new(
                "https://discord.com/api/oauth2/token".to_string(),
            )?),
        )
        .set_redirect_uri(RedirectUrl::new(settings.redirect_url.clone())?);
        Ok(Self {
            inner: Arc::new(client),
        })
    }
}

/// The `/users/@me` fields we keep
#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    global_name: Option<String>,
    avatar: Option<String>,
}

impl DiscordUser {
    fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|hash| format!("https://cdn.discordapp.com/avatars/{}/{hash}.png", self.id))
    }
}

fn login_cookie(name: &'static str, value: String, minutes: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(true)
        .max_age(cookie::time::Duration::minutes(minutes))
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

pub(crate) async fn begin_login(
    cookies: PrivateCookieJar,
    State(config): State<Option<DiscordAuthConfig>>,
) -> Result<(PrivateCookieJar, Redirect), WebError> {
    let config = config.ok_or(WebError::LoginDisabled)?;
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
    let (url, csrf_token) = config
        .inner
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("identify".to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();
    let cookies = cookies
        .add(login_cookie(CSRF_COOKIE, csrf_token.secret().clone(), 10))
        .add(login_cookie(PKCE_COOKIE, pkce_verifier.secret().clone(), 10));
    Ok((cookies, Redirect::to(url.as_str())))
}

#[derive(Deserialize)]
pub(crate) struct RedirectParameters {
    code: String,
    state: String,
}

pub(crate) async fn redirect(
    cookies: PrivateCookieJar,
    State(config): State<Option<DiscordAuthConfig>>,
    State(http): State<reqwest::Client>,
    Query(RedirectParameters { code, state }): Query<RedirectParameters>,
) -> Result<(PrivateCookieJar, Redirect), WebError> {
    let config = config.ok_or(WebError::LoginDisabled)?;
    let expected_state = cookies.get(CSRF_COOKIE);
    let pkce_verifier = cookies.get(PKCE_COOKIE);
    let pkce_verifier = match (expected_state, pkce_verifier) {
        (Some(expected), Some(verifier)) if expected.value() == state => {
            PkceCodeVerifier::new(verifier.value().to_string())
        }
        _ => return Err(WebError::LoginStateMismatch),
    };
    let token = config
        .inner
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(pkce_verifier)
        .request_async(async_http_client)
        .await?;
    let user: DiscordUser = http
        .get(DISCORD_USER_URL)
        .bearer_auth(token.access_token().secret())
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    info!(discord_id = %user.id, "discord login");

    let days = 30 * 24 * 60;
    let mut cookies = cookies
        .remove(removal(CSRF_COOKIE))
        .remove(removal(PKCE_COOKIE))
        .add(login_cookie(DISCORD_ID_COOKIE, user.id.clone(), days))
        .add(login_cookie(
            DISCORD_NAME_COOKIE,
            user.display_name().to_string(),
            days,
        ));
    cookies = match user.avatar_url() {
        Some(avatar) => cookies.add(login_cookie(DISCORD_AVATAR_COOKIE, avatar, days)),
        None => cookies.remove(removal(DISCORD_AVATAR_COOKIE)),
    };
    Ok((cookies, Redirect::to("/")))
}

pub(crate) async fn logout(cookies: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    let cookies = cookies
        .remove(removal(DISCORD_ID_COOKIE))
        .remove(removal(DISCORD_NAME_COOKIE))
        .remove(removal(DISCORD_AVATAR_COOKIE));
    (cookies, Redirect::to("/"))
}

#[cfg(test)]
mod test {
    use axum::extract::State;
    use axum::response::IntoResponse;
    use axum_extra::extract::cookie::Key;
    use axum_extra::extract::PrivateCookieJar;

    use super::{begin_login, DiscordAuthConfig, DiscordUser, CSRF_COOKIE, PKCE_COOKIE};
    use crate::config::DiscordSettings;
    use crate::web::error::WebError;

    fn config() -> DiscordAuthConfig {
        DiscordAuthConfig::new(&DiscordSettings {
            client_id: "1234".into(),
            client_secret: "secret".into(),
            redirect_url: "http://localhost:8080/discord/callback".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn login_redirects_to_discord_with_pkce() {
        let jar = PrivateCookieJar::new(Key::generate());
        let (jar, redirect) = begin_login(jar, State(Some(config()))).await.unwrap();
        assert!(jar.get(CSRF_COOKIE).is_some());
        assert!(jar.get(PKCE_COOKIE).is_some());
        let response = redirect.into_response();
        let location = response.headers()["location"].to_str().unwrap();
        assert!(location.starts_with("https://discord.com/api/oauth2/authorize"));
        assert!(location.contains("scope=identify"));
        assert!(location.contains("code_challenge_method=S256"));
    }

    #[tokio::test]
    async fn login_needs_configuration() {
        let jar = PrivateCookieJar::new(Key::generate());
        assert!(matches!(
            begin_login(jar, State(None)).await,
            Err(WebError::LoginDisabled)
        ));
    }

    #[test]
    fn discord_user_names_and_avatars() {
        let user: DiscordUser = serde_json::from_str(
            r#"{"id": "80351110224678912", "username": "nelly", "global_name": null, "avatar": "8342729096ea3675442027381ff50dfe"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "nelly");
        assert_eq!(
            user.avatar_url().unwrap(),
            "https://cdn.discordapp.com/avatars/80351110224678912/8342729096ea3675442027381ff50dfe.png"
        );
    }
}
