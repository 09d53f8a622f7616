//! Wiki HTTP server
//!
//! Every path outside `/images/` goes through [`Route::parse`] and is handed
//! to exactly one handler. Handler failures are answered with a 500 carrying
//! the error message.

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::WikiError;
use crate::helpers;
use crate::route::Route;
use crate::store::{Page, PageStore};
use crate::templates::{TemplateRenderer, View};
use crate::upload;
use crate::Wiki;

/// Table of contents page, up to the list of links
const TOC_HEAD: &str = r#"<head>
<script type="text/javascript">
    function startnew() {
        var newname = document.getElementById("newname").value;
        if (newname == "") {
            alert("Name must not be blank"); return;
        }
        var re = /^[a-zA-Z0-9]{1,200}$/;
        if (!re.test(newname)) {
            alert("You must have only letters and digits in the file name, and length must be less than 201"); return;
        }
        window.location.href = "/view/" + newname;
    }
</script>
</head>
<h1>{title}</h1>
<h3>Table of Contents</h3>
<br><br>
<button type="button" id="doit" onclick="startnew()">Create New Page</button>
<input type="text" id="newname" value=""
    onkeypress="javascript: if (event.keyCode == 13) document.getElementById('doit').click();">
<br><br>
"#;

/// Server state
pub struct ServerState {
    pub store: PageStore,
    pub renderer: TemplateRenderer,
    pub images_dir: PathBuf,
    /// Heading of the table of contents
    pub title: String,
}

impl ServerState {
    pub fn new(wiki: &Wiki) -> Result<Self> {
        let renderer = match &wiki.templates_dir {
            Some(dir) => TemplateRenderer::with_overrides(dir)?,
            None => TemplateRenderer::new()?,
        };

        Ok(Self {
            store: wiki.store(),
            renderer,
            images_dir: wiki.images_dir.clone(),
            title: wiki.config.title.clone(),
        })
    }
}

/// Form field holding the page body on save
const BODY_FIELD: &str = "body";

/// Build the wiki router
pub fn router(state: Arc<ServerState>, body_limit: usize) -> Router {
    Router::new()
        .nest_service("/images", ServeDir::new(&state.images_dir))
        .fallback(dispatch)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the wiki server
pub async fn start(wiki: &Wiki, ip: &str, port: u16) -> Result<()> {
    std::fs::create_dir_all(&wiki.images_dir)?;

    let state = Arc::new(ServerState::new(wiki)?);
    let app = router(state, wiki.config.upload_limit);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Wiki running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");
    tracing::info!("Serving pages from {:?}", wiki.pages_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Route a request and run its handler
async fn dispatch(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    let route = Route::parse(&helpers::decode_path(request.uri().path()));
    tracing::debug!("{} {} -> {:?}", request.method(), request.uri(), route);

    match route {
        Route::View { title } => view_page(&state, &title).into_response(),
        Route::Edit { title } => edit_page(&state, &title).into_response(),
        Route::Save { title } => save_page(&state, &title, request).await.into_response(),
        Route::Toc => toc(&state).into_response(),
        Route::Delete { title } => delete_page(&state, &title).into_response(),
        Route::Upload { title, index } => upload_image(&state, &title, index, request)
            .await
            .into_response(),
        Route::NotFound => not_found(),
    }
}

/// Show a page, or send the client off to create it
fn view_page(state: &ServerState, title: &str) -> Result<Response, WikiError> {
    match state.store.load(title) {
        Ok(page) => render(state, View::View, &page),
        Err(e) if e.is_not_found() => {
            tracing::debug!("{} not loaded ({}), redirecting to edit", title, e);
            Ok(found(&helpers::action_url("edit", title)))
        }
        Err(e) => Err(e),
    }
}

/// Edit a page; pages that cannot be loaded start out blank
fn edit_page(state: &ServerState, title: &str) -> Result<Response, WikiError> {
    let page = match state.store.load(title) {
        Ok(page) => page,
        Err(e) if e.is_not_found() => Page::blank(title)?,
        Err(e) => return Err(e),
    };
    render(state, View::Edit, &page)
}

async fn save_page(
    state: &ServerState,
    title: &str,
    request: Request,
) -> Result<Response, WikiError> {
    let body = form_body(request).await?;

    let page = Page::new(title, body)?;
    state.store.save(&page)?;
    tracing::info!("Saved {}", title);

    Ok(found(&helpers::action_url("view", title)))
}

/// Raw bytes of the `body` form field.
///
/// The request body is searched first, urlencoded or multipart, then the
/// query string. The first value wins; a missing field is an empty body.
async fn form_body(request: Request) -> Result<Vec<u8>, WikiError> {
    let query = request.uri().query().map(|q| q.as_bytes().to_vec());
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let from_body = if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| WikiError::Form(rejection.body_text()))?;

        let mut value = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| WikiError::Form(e.to_string()))?
        {
            if field.name() == Some(BODY_FIELD) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| WikiError::Form(e.to_string()))?;
                value = Some(bytes.to_vec());
                break;
            }
        }
        value
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let bytes = Bytes::from_request(request, &())
            .await
            .map_err(|rejection| WikiError::Form(rejection.body_text()))?;
        helpers::form_value(&bytes, BODY_FIELD)
    } else {
        None
    };

    Ok(from_body
        .or_else(|| query.and_then(|q| helpers::form_value(&q, BODY_FIELD)))
        .unwrap_or_default())
}

/// List every page. Written directly, without the page templates.
fn toc(state: &ServerState) -> Html<String> {
    let mut body = TOC_HEAD.replace("{title}", &helpers::html_escape(&state.title));
    for title in state.store.list() {
        body.push_str(&helpers::toc_entry(&title));
        body.push('\n');
    }
    Html(body)
}

fn delete_page(state: &ServerState, title: &str) -> Result<Response, WikiError> {
    let backup = state.store.delete(title)?;
    tracing::info!("Deleted {}, backup at {:?}", title, backup);
    Ok(found("/"))
}

async fn upload_image(
    state: &ServerState,
    title: &str,
    index: u8,
    request: Request,
) -> Result<Response, WikiError> {
    let multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| WikiError::multipart("ParseMultipartForm", rejection.body_text()))?;

    upload::receive(multipart, &state.images_dir, title, index).await?;

    Ok(found(&helpers::action_url("view", title)))
}

fn render(state: &ServerState, view: View, page: &Page) -> Result<Response, WikiError> {
    Ok(Html(state.renderer.render(view, page)?).into_response())
}

/// 302 redirect
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
}
