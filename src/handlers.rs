use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use futures_util::StreamExt;

use crate::error::{PredictError, PredictResult};
use crate::inference::parse_features;
use crate::models::PredictionText;
use crate::page::render_index;
use crate::state::AppState;

const MAX_FORM_BYTES: usize = 256 * 1024;

/// Routes shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/predict").route(web::post().to(predict)));
}

pub async fn home() -> HttpResponse {
    html(render_index(None))
}

/// Always answers 200 with the page; failures become prediction text.
pub async fn predict(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> HttpResponse {
    let text = match state.predictor() {
        Some(predictor) => read_form(&req, payload)
            .await
            .and_then(|pairs| parse_features(&pairs))
            .and_then(|features| predictor.predict(&features))
            .into(),
        None => PredictionText::ArtifactsUnavailable,
    };
    html(render_index(Some(&text.render())))
}

/// Submitted `(field, value)` pairs in body order. Bodies that are not a
/// form yield no fields.
async fn read_form(
    req: &HttpRequest,
    payload: web::Payload,
) -> PredictResult<Vec<(String, String)>> {
    let content_type = req.content_type();
    if content_type.eq_ignore_ascii_case("multipart/form-data") {
        read_multipart(Multipart::new(req.headers(), payload)).await
    } else if content_type.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        let body = read_body(payload).await?;
        serde_urlencoded::from_bytes(&body)
            .map_err(|e| PredictError::MalformedForm(e.to_string()))
    } else {
        Ok(Vec::new())
    }
}

async fn read_body(mut payload: web::Payload) -> PredictResult<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| PredictError::MalformedForm(e.to_string()))?;
        if body.len() + chunk.len() > MAX_FORM_BYTES {
            return Err(PredictError::MalformedForm(format!(
                "form body exceeds {} bytes",
                MAX_FORM_BYTES
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn read_multipart(mut payload: Multipart) -> PredictResult<Vec<(String, String)>> {
    let malformed =
        |e: actix_multipart::MultipartError| PredictError::MalformedForm(e.to_string());
    let mut pairs = Vec::new();
    let mut total = 0;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(malformed)?;
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        let mut value = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(malformed)?;
            total += chunk.len();
            if total > MAX_FORM_BYTES {
                return Err(PredictError::MalformedForm(format!(
                    "form body exceeds {} bytes",
                    MAX_FORM_BYTES
                )));
            }
            value.extend_from_slice(&chunk);
        }
        pairs.push((name, String::from_utf8_lossy(&value).into_owned()));
    }
    Ok(pairs)
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
