use std::borrow::Cow;
use std::path::Path as FsPath;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, Response, StatusCode};
use axum::response::IntoResponse;

use super::error::WebError;
use super::state::StaticDir;

/// In release mode, return the files from a statically included dir
#[cfg(not(debug_assertions))]
fn get_static_file(_root: &FsPath, path: &str) -> Option<Cow<'static, [u8]>> {
    use include_dir::include_dir;
    static STATIC_DIR: include_dir::Dir = include_dir!("$CARGO_MANIFEST_DIR/static");
    let file = STATIC_DIR.get_file(path)?;
    Some(Cow::Borrowed(file.contents()))
}

/// In debug mode, just load the files from disk
#[cfg(debug_assertions)]
fn get_static_file(root: &FsPath, path: &str) -> Option<Cow<'static, [u8]>> {
    std::fs::read(root.join(path)).ok().map(Cow::Owned)
}

fn is_safe_path(path: &str) -> bool {
    !path.is_empty()
        && FsPath::new(path)
            .components()
            .all(|component| matches!(component, std::path::Component::Normal(_)))
}

fn get_file(root: &FsPath, path: &str) -> Result<Response<Body>, WebError> {
    let file = is_safe_path(path)
        .then(|| get_static_file(root, path))
        .flatten();
    let Some(file) = file else {
        return Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::new(http_body_util::Empty::new()))?);
    };
    let mime_type = mime_guess::from_path(path).first_or_text_plain();
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type.as_ref())
        .header(
            header::CACHE_CONTROL,
            #[cfg(not(debug_assertions))]
            HeaderValue::from_static("public, max-age=86400"),
            #[cfg(debug_assertions)]
            HeaderValue::from_static("no-cache"),
        )
        .body(Body::new(http_body_util::Full::from(file)))?)
}

pub(crate) async fn favicon(State(StaticDir(root)): State<StaticDir>) -> impl IntoResponse {
    get_file(&root, "favicon.ico")
}

pub(crate) async fn robots(State(StaticDir(root)): State<StaticDir>) -> impl IntoResponse {
    get_file(&root, "robots.txt")
}

pub(crate) async fn static_path(
    State(StaticDir(root)): State<StaticDir>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    get_file(&root, path.trim_start_matches('/'))
}

#[cfg(test)]
mod test {
    use super::is_safe_path;

    #[test]
    fn paths_cannot_escape_the_static_dir() {
        assert!(is_safe_path("main.css"));
        assert!(is_safe_path("fonts/icons.woff2"));
        assert!(!is_safe_path("../Cargo.toml"));
        assert!(!is_safe_path("/etc/passwd"));
        assert!(!is_safe_path(""));
    }
}
