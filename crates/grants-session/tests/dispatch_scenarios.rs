use grants_client::{DocumentQuestionResponse, MockBackend, MockCall, SearchResponse};
use grants_session::{ChatEngine, DispatchOutcome, EngineConfig, SessionError, Submission};
use grants_types::{FileHandle, MessageContent, Panel, Role, SearchResult, SessionRecord};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn setup() -> (ChatEngine, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let engine = ChatEngine::new(backend.clone(), EngineConfig::default());
    (engine, backend)
}

fn submit(text: &str) -> Submission {
    Submission::new(text).unwrap()
}

fn result(description: &str) -> SearchResult {
    serde_json::from_value(json!({
        "numeroConvocatoria": "1",
        "descripcion": description,
        "estado": "abierta"
    }))
    .unwrap()
}

#[tokio::test]
async fn test_first_message_sets_title_and_gets_reply() {
    let (engine, backend) = setup();
    let session = engine.create_session();
    backend.push_search(SearchResponse::with_results(vec![]), Duration::ZERO);

    let outcome = engine
        .dispatch(submit("Busca ayudas para vivienda en Madrid"), Panel::Search)
        .await;

    let session = engine.session(&session.id).unwrap();
    assert_eq!(session.title, "Busca ayudas para vivienda en ...");
    assert_eq!(session.search_messages.len(), 3);
    assert_eq!(session.document_messages.len(), 1);

    let reply = outcome.reply().unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.panel, Panel::Search);
    assert_eq!(reply.content, MessageContent::GrantResults(vec![]));
    assert_eq!(session.search_messages[1].role, Role::User);
    assert_eq!(session.search_messages[2], *reply);
}

#[tokio::test]
async fn test_title_is_only_derived_once() {
    let (engine, _backend) = setup();
    let session = engine.create_session();

    engine.dispatch(submit("primera pregunta"), Panel::Search).await;
    engine.dispatch(submit("segunda pregunta"), Panel::Document).await;

    assert_eq!(engine.session(&session.id).unwrap().title, "primera pregunta...");
}

#[tokio::test]
async fn test_document_reply_falls_back_to_error_text() {
    let (engine, backend) = setup();
    let session = engine.create_session();
    backend.push_document(DocumentQuestionResponse::failed("no context"), Duration::ZERO);

    engine.dispatch(submit("¿Cuál es el plazo?"), Panel::Document).await;

    let session = engine.session(&session.id).unwrap();
    let reply = session.document_messages.last().unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, MessageContent::text("no context"));
    assert_eq!(session.search_messages.len(), 1);
    assert_eq!(backend.calls(), vec![MockCall::Document("¿Cuál es el plazo?".to_string())]);
}

#[tokio::test]
async fn test_file_intake_switches_panel() {
    let (engine, _backend) = setup();
    let session = engine.create_session();
    assert_eq!(session.active_panel, Panel::Search);

    let records = engine
        .upload_files(vec![
            FileHandle::new("bases.pdf", "application/pdf", vec![1, 2, 3]),
            FileHandle::new("anexo.docx", "application/msword", vec![4]),
        ])
        .unwrap();

    let session = engine.session(&session.id).unwrap();
    assert_eq!(session.active_panel, Panel::Document);
    assert_eq!(session.uploaded_files.len(), 2);
    assert_ne!(session.uploaded_files[0].id, session.uploaded_files[1].id);

    let names: Vec<&str> = session.uploaded_files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["bases.pdf", "anexo.docx"]);
    assert_eq!(records, session.uploaded_files);

    let notice = session.document_messages.last().unwrap();
    assert_eq!(notice.role, Role::System);
    assert!(notice.content.as_text().contains("\"bases.pdf\", \"anexo.docx\""));
}

#[tokio::test]
async fn test_failed_dispatch_is_silent() {
    let (engine, backend) = setup();
    let session = engine.create_session();
    backend.fail_search("connection refused", Duration::from_millis(20));

    let outcome = engine.dispatch(submit("vivienda"), Panel::Search).await;

    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    let session = engine.session(&session.id).unwrap();
    assert_eq!(session.search_messages.len(), 2);
    assert_eq!(session.search_messages[1].role, Role::User);
    assert!(!engine.is_busy(&session.id));
}

#[tokio::test]
async fn test_search_error_only_response_is_committed_as_text() {
    let (engine, backend) = setup();
    let session = engine.create_session();
    backend.push_search(
        SearchResponse {
            results: None,
            error: Some("No se pudo procesar la búsqueda".to_string()),
        },
        Duration::ZERO,
    );

    let outcome = engine.dispatch(submit("vivienda"), Panel::Search).await;

    let reply = outcome.reply().unwrap();
    assert_eq!(reply.content, MessageContent::text("No se pudo procesar la búsqueda"));
    let session = engine.session(&session.id).unwrap();
    assert_eq!(session.search_messages.len(), 3);
    assert_eq!(session.search_messages[2], *reply);
}

#[tokio::test]
async fn test_busy_while_in_flight() {
    let (engine, backend) = setup();
    let session = engine.create_session();
    backend.push_search(SearchResponse::with_results(vec![]), Duration::from_millis(100));

    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.dispatch(submit("vivienda"), Panel::Search).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(engine.is_busy(&session.id));
    let pending = engine.session(&session.id).unwrap();
    assert_eq!(pending.search_messages.last().unwrap().role, Role::User);

    task.await.unwrap();
    assert!(!engine.is_busy(&session.id));
}

#[tokio::test]
async fn test_replies_commit_in_completion_order() {
    let (engine, backend) = setup();
    let session = engine.create_session();
    backend.push_search(SearchResponse::with_results(vec![result("A")]), Duration::from_millis(200));
    backend.push_search(SearchResponse::with_results(vec![result("B")]), Duration::from_millis(50));

    let (a, b) = tokio::join!(
        engine.dispatch(submit("consulta A"), Panel::Search),
        engine.dispatch(submit("consulta B"), Panel::Search)
    );

    let session = engine.session(&session.id).unwrap();
    let position = |outcome: &DispatchOutcome| {
        let id = &outcome.reply().unwrap().id;
        session.search_messages.iter().position(|m| &m.id == id).unwrap()
    };
    assert!(position(&b) < position(&a));

    let texts: Vec<String> = session.search_messages.iter().map(|m| m.content.as_text()).collect();
    assert_eq!(texts[1], "consulta A");
    assert_eq!(texts[2], "consulta B");
    let first_reply = session.search_messages[3].content.grant_results().unwrap();
    assert_eq!(first_reply[0].description, "B");
    assert!(!engine.is_busy(&session.id));
}

#[tokio::test]
async fn test_stale_reply_lands_in_original_session() {
    let (engine, backend) = setup();
    let original = engine.create_session();
    backend.push_search(SearchResponse::with_results(vec![]), Duration::from_millis(100));

    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.dispatch(submit("vivienda"), Panel::Search).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let other = engine.create_session();

    let outcome = task.await.unwrap();

    assert!(outcome.reply().is_some());
    assert_eq!(engine.active_id(), Some(other.id.clone()));
    assert_eq!(engine.session(&original.id).unwrap().search_messages.len(), 3);
    assert_eq!(engine.session(&other.id).unwrap().search_messages.len(), 1);
}

#[tokio::test]
async fn test_reply_for_deleted_session_is_dropped() {
    let (engine, backend) = setup();
    let session = engine.create_session();
    backend.push_search(SearchResponse::with_results(vec![]), Duration::from_millis(100));

    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.dispatch(submit("vivienda"), Panel::Search).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(engine.delete_session(&session.id));

    assert_eq!(task.await.unwrap(), DispatchOutcome::SessionGone);
    assert!(engine.session(&session.id).is_none());
    assert!(!engine.is_busy(&session.id));
}

#[tokio::test]
async fn test_dispatch_without_active_session_makes_no_call() {
    let (engine, backend) = setup();

    let outcome = engine.dispatch(submit("hola"), Panel::Search).await;

    assert_eq!(outcome, DispatchOutcome::NoActiveSession);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_remove_file_is_idempotent() {
    let (engine, _backend) = setup();
    engine.create_session();
    let records = engine
        .upload_files(vec![FileHandle::new("bases.pdf", "application/pdf", vec![1])])
        .unwrap();

    let once = engine.remove_file(&records[0].id).unwrap();
    let twice = engine.remove_file(&records[0].id).unwrap();

    assert!(once.uploaded_files.is_empty());
    assert_eq!(once, twice);
    assert!(matches!(
        engine.file(&once.id, &records[0].id),
        Err(SessionError::FileNotFound(_))
    ));
}

#[tokio::test]
async fn test_active_panel_stays_valid() {
    let (engine, _backend) = setup();
    let session = engine.create_session();

    engine.dispatch(submit("vivienda"), Panel::Document).await;
    let after_dispatch = engine.session(&session.id).unwrap();
    assert!(Panel::ALL.contains(&after_dispatch.active_panel));
    assert_eq!(after_dispatch.active_panel, Panel::Search);

    engine
        .upload_files(vec![FileHandle::new("a.txt", "text/plain", vec![1])])
        .unwrap();
    engine.set_active_panel(Panel::Search).unwrap();
    assert_eq!(engine.active_session().unwrap().active_panel, Panel::Search);
}

#[tokio::test]
async fn test_imported_legacy_session_is_migrated_on_select() {
    let (engine, _backend) = setup();
    let record: SessionRecord = serde_json::from_value(json!({
        "id": "1700000000000",
        "title": "Ayudas vivienda",
        "phase": "search",
        "messages": [
            { "id": "1", "type": "system", "content": "Bienvenido" },
            { "id": "2", "type": "user", "content": "vivienda", "phase": "search" },
            { "id": "3", "type": "user", "content": "¿plazo?", "phase": "document" }
        ]
    }))
    .unwrap();

    let id = engine.import_session(record);
    let session = engine.select_session(&id).unwrap();

    assert_eq!(session.title, "Ayudas vivienda");
    assert_eq!(session.search_messages.len(), 2);
    assert_eq!(session.document_messages.len(), 1);

    engine.dispatch(submit("otra"), Panel::Search).await;
    assert_eq!(engine.session(&id).unwrap().title, "Ayudas vivienda");
}

#[tokio::test]
async fn test_imported_blank_title_takes_configured_default() {
    let backend = Arc::new(MockBackend::new());
    let config = EngineConfig::default().with_default_title("Sin título");
    let engine = ChatEngine::new(backend.clone(), config);
    let record: SessionRecord = serde_json::from_value(json!({
        "id": "1700000000001",
        "title": "  ",
        "searchMessages": [],
        "documentMessages": []
    }))
    .unwrap();

    let id = engine.import_session(record);
    assert_eq!(engine.sessions()[0].title, "Sin título");

    let session = engine.select_session(&id).unwrap();
    assert_eq!(session.title, "Sin título");

    engine.dispatch(submit("ayudas a la contratación"), Panel::Search).await;
    assert_eq!(engine.session(&id).unwrap().title, "ayudas a la contratación...");
}

#[tokio::test]
async fn test_export_writes_payload() {
    let (engine, _backend) = setup();
    let session = engine.create_session();
    let records = engine
        .upload_files(vec![FileHandle::new("bases.pdf", "application/pdf", b"%PDF".to_vec())])
        .unwrap();
    let dir = std::env::temp_dir().join(format!("grants-engine-export-{}", std::process::id()));

    let path = engine.export_file(&session.id, &records[0].id, &dir).await.unwrap();

    assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF");
    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_overlapping_dispatches_keep_ids_unique() {
    let (engine, backend) = setup();
    let session = engine.create_session();
    for delay in [30, 10, 20, 0, 40] {
        backend.push_search(SearchResponse::with_results(vec![]), Duration::from_millis(delay));
    }

    let outcomes = futures::future::join_all(
        (0..5).map(|i| engine.dispatch(Submission::new(format!("consulta {}", i)).unwrap(), Panel::Search)),
    )
    .await;

    assert!(outcomes.iter().all(|outcome| outcome.reply().is_some()));
    let session = engine.session(&session.id).unwrap();
    let mut ids: Vec<&str> = session.search_messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 11);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 11);
    assert!(!engine.is_busy(&session.id));
}
