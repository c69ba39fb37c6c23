use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use paindraw_shared::ExportRequest;

use crate::error::SubmitError;
use crate::pdf::build_pdf;

pub async fn submit_handler(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SubmitError> {
    let Json(request) =
        payload.map_err(|rejection| SubmitError::BadRequest(rejection.body_text()))?;
    tracing::info!(
        image_bytes = request.image.len(),
        fields = request.text_fields().len(),
        "export requested"
    );
    let pdf = tokio::task::spawn_blocking(move || build_pdf(&request)).await??;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf))
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::Response;
    use paindraw_shared::raster::{Color, Pixmap, PixmapSurface};
    use paindraw_shared::{composite, Point, Stroke, StrokeKind};

    use super::*;
    use crate::pdf::tests::{page_operations, red_pixel_data_url, shown_text};

    async fn submit(request: ExportRequest) -> Response {
        submit_handler(Ok(Json(request))).await.into_response()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec()
    }

    #[tokio::test]
    async fn returns_pdf_for_a_valid_drawing() {
        let response = submit(ExportRequest {
            name: Some("Jane Doe".into()),
            ..ExportRequest::new(red_pixel_data_url())
        })
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let bytes = body_bytes(response).await;
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let (_, _, operations) = page_operations(&bytes);
        assert_eq!(shown_text(&operations), vec![b"Name: Jane Doe".to_vec()]);
    }

    #[tokio::test]
    async fn accepts_the_browser_wire_format() {
        let body = serde_json::json!({
            "image": red_pixel_data_url(),
            "name": "Jane Doe",
            "examiner": "Dr. Smith",
        });
        let payload = Json::<ExportRequest>::from_bytes(&serde_json::to_vec(&body).unwrap());
        let response = submit_handler(payload).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let (_, _, operations) = page_operations(&body_bytes(response).await);
        assert_eq!(
            shown_text(&operations),
            vec![b"Name: Jane Doe".to_vec(), b"Examiner: Dr. Smith".to_vec()]
        );
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let payload = Json::<ExportRequest>::from_bytes(b"{\"image\": 42");
        let response = submit_handler(payload).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_payload_without_image() {
        let payload = Json::<ExportRequest>::from_bytes(br#"{"name":"x"}"#);
        let response = submit_handler(payload).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(text.contains("image"), "{text}");
    }

    #[tokio::test]
    async fn rejects_empty_image() {
        let response = submit(ExportRequest::default()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_non_data_url() {
        let response = submit(ExportRequest::new("https://example.com/a.png".into())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reports_undecodable_image_as_server_error() {
        let response = submit(ExportRequest::new(
            "data:image/png;base64,AAAAAAAA".into(),
        ))
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(text.contains("could not be decoded"));
    }

    #[tokio::test]
    async fn composited_drawing_round_trips_through_submit() {
        let mut background = Pixmap::new(60, 80).unwrap();
        background.fill(Color::WHITE);
        let mut line = Stroke::new(StrokeKind::FreeLine);
        line.points = vec![Point::new(5.0, 5.0), Point::new(50.0, 70.0)];

        let mut surface = PixmapSurface::new(60, 80).unwrap();
        composite(&mut surface, &background, &[line]).unwrap();
        let image = surface.to_data_url().unwrap();

        let response = submit(ExportRequest::new(image)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body_bytes(response).await;
        let (doc, page_id, operations) = page_operations(&bytes);
        assert!(operations.iter().any(|op| op.operator == "Do"));
        let xobject = doc
            .get_dictionary(page_id)
            .and_then(|page| page.get(b"Resources"))
            .and_then(lopdf::Object::as_dict)
            .and_then(|resources| resources.get(b"XObject"))
            .and_then(lopdf::Object::as_dict)
            .and_then(|xobjects| xobjects.get(b"Im1"))
            .and_then(lopdf::Object::as_reference)
            .unwrap();
        let image = doc.get_object(xobject).and_then(lopdf::Object::as_stream).unwrap();
        assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 60);
        assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 80);
    }
}
