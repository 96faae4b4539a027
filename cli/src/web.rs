//! Browser form for interactive conversions.
//!
//! Every POST runs one request-scoped [`Session`] on a blocking worker and
//! renders the page again. The artifact is returned inline as a data URI, so
//! nothing is stored on the server.

use std::net::SocketAddr;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use pdf2office::session::Upload;
use pdf2office::{
    Archiver, ConvertOptions, DocumentBuilder, ExtractOptions, Extractor, OutputFormat, Pipeline,
    Session, StatusLevel,
};

/// Largest accepted upload.
pub const UPLOAD_LIMIT: usize = 50 * 1024 * 1024;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8501";

const TITLE: &str = "PDF to Excel/Word Converter";

/// Build the form router.
pub fn build_router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/convert", post(convert))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
}

/// Serve the form until the process is stopped.
pub async fn start_server(addr: SocketAddr) -> Result<(), std::io::Error> {
    log::info!("Serving form on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router()).await
}

async fn health_check() -> &'static str {
    "ok"
}

async fn index() -> Html<String> {
    let session: Session = Session::default();
    Html(render_page(&session))
}

async fn convert(mut multipart: Multipart) -> Result<impl IntoResponse, (StatusCode, String)> {
    let form = read_form(&mut multipart)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?;

    let page = tokio::task::spawn_blocking(move || run_form(form))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Html(page))
}

/// Fields posted by the form.
#[derive(Debug, Default)]
struct FormInput {
    file: Option<Upload>,
    format: OutputFormat,
    compress: bool,
}

async fn read_form(multipart: &mut Multipart) -> Result<FormInput, MultipartError> {
    let mut form = FormInput::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    form.file = Some(Upload {
                        name: file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "format" => form.format = field.text().await?.parse().unwrap_or_default(),
            "zip" => form.compress = true,
            other => log::debug!("ignoring form field '{}'", other),
        }
    }

    Ok(form)
}

fn run_form(form: FormInput) -> String {
    let options = ConvertOptions::new().with_extract_options(ExtractOptions::new().lenient());
    let mut session = Session::with_options(Pipeline::for_options(&options), options);
    session.set_format(form.format);
    session.set_compress(form.compress);

    if let Some(upload) = form.file {
        session.upload(upload.name, upload.bytes);
        session.trigger();
    }

    render_page(&session)
}

/// Render the form reflecting a session's options and outcome.
pub fn render_page<E, B, A>(session: &Session<E, B, A>) -> String
where
    E: Extractor,
    B: DocumentBuilder,
    A: Archiver,
{
    let options = session.options();
    let checked = |on: bool| if on { " checked" } else { "" };

    let status = session
        .status_message()
        .map(|message| {
            let class = match message.level {
                StatusLevel::Success => "success",
                StatusLevel::Warning => "warning",
                StatusLevel::Error => "error",
            };
            format!(
                "<p class=\"status {}\">{}</p>\n",
                class,
                escape_html(&message.text)
            )
        })
        .unwrap_or_default();

    let download = match (session.download(), session.download_label()) {
        (Some(download), Some(label)) => format!(
            "<a class=\"download\" href=\"data:{};base64,{}\" download=\"{}\">{}</a>\n",
            download.mime_type,
            STANDARD.encode(&download.bytes),
            escape_html(&download.filename),
            escape_html(&label)
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
fieldset, label {{ display: block; margin: 1rem 0; }}
.status {{ padding: .75rem; border-radius: .25rem; }}
.success {{ background: #e6f4ea; }}
.warning {{ background: #fef7e0; }}
.error {{ background: #fce8e6; }}
</style>
</head>
<body>
<h1>&#128196; {title}</h1>
<form method="post" action="/convert" enctype="multipart/form-data">
<label>Upload your PDF file <input type="file" name="file" accept=".pdf,application/pdf" required></label>
<fieldset>
<legend>Select output format:</legend>
<label><input type="radio" name="format" value="excel"{excel}> Excel</label>
<label><input type="radio" name="format" value="word"{word}> Word</label>
</fieldset>
<label><input type="checkbox" name="zip" value="on"{zip}> Compress output as .zip file</label>
<button type="submit">Convert</button>
</form>
{status}{download}</body>
</html>
"#,
        title = TITLE,
        excel = checked(options.format == OutputFormat::Excel),
        word = checked(options.format == OutputFormat::Word),
        zip = checked(options.compress),
        status = status,
        download = download,
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
