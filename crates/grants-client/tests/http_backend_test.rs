use grants_client::{BackendConfig, BackendError, GrantBackend, HttpBackend};
use mockito::Matcher;
use serde_json::json;

fn backend_for(server: &mockito::ServerGuard) -> HttpBackend {
    HttpBackend::new(BackendConfig::new(server.url())).unwrap()
}

#[tokio::test]
async fn test_search_posts_query_and_decodes_results() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/convocatorias")
        .match_body(Matcher::Json(json!({ "texto": "vivienda Madrid" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "resultados": [{
                    "numeroConvocatoria": "755001",
                    "descripcion": "Ayudas al alquiler",
                    "fechaRecepcion": "2024-02-10",
                    "nivel1": "ESTADO",
                    "nivel2": "MINISTERIO DE VIVIENDA",
                    "presupuesto_total": null,
                    "inicio": "no info",
                    "final": "no info",
                    "bases": "https://example.org/bases",
                    "estado": "abierta"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = backend_for(&server).search_grants("vivienda Madrid").await.unwrap();
    let results = response.into_results().unwrap();

    mock.assert_async().await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].convocation_number, "755001");
    assert!(results[0].total_budget.is_none());
}

#[tokio::test]
async fn test_document_question_uses_pregunta_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/preguntar_rag")
        .match_body(Matcher::Json(json!({ "pregunta": "¿Quién puede solicitarla?" })))
        .with_status(200)
        .with_body(json!({ "resultados": [{ "respuesta": "Personas físicas" }] }).to_string())
        .create_async()
        .await;

    let response = backend_for(&server)
        .ask_document("¿Quién puede solicitarla?")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.answer_text(), "Personas físicas");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/convocatorias")
        .with_status(503)
        .with_body("relay down")
        .create_async()
        .await;

    let err = backend_for(&server).search_grants("x").await.unwrap_err();

    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "relay down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/preguntar_rag")
        .with_status(200)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let err = backend_for(&server).ask_document("x").await.unwrap_err();
    assert!(matches!(err, BackendError::Malformed(_)));
}

#[tokio::test]
async fn test_grant_documents() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/grant/755001/documents")
        .with_status(200)
        .with_body(
            json!({
                "documents": [{ "id": "d1", "name": "Bases.pdf", "download": "/download/d1" }],
                "zip": "/download/755001.zip"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let docs = backend_for(&server).grant_documents("755001").await.unwrap();

    assert_eq!(docs.documents.len(), 1);
    assert_eq!(docs.documents[0].name, "Bases.pdf");
    assert_eq!(docs.zip.as_deref(), Some("/download/755001.zip"));
}
