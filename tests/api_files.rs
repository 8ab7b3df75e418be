//! Integration tests per upload, approvazione e download dei file

mod common;

use axum::http::{StatusCode, header};
use axum_test::multipart::{MultipartForm, Part};
use common::*;
use dealer_portal::dtos::FileUploadDTO;
use dealer_portal::entities::FileStatus;
use dealer_portal::repositories::memory::DEMO_DEALER_ID;
use serde_json::json;

#[tokio::test]
async fn the_full_file_list_is_admin_only() {
    let server = create_test_server(create_test_state());

    let response = server
        .get("/files")
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server
        .get("/files")
        .add_header(header::AUTHORIZATION, bearer(&admin_token()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let files: Vec<FileUploadDTO> = response.json();
    assert_eq!(files.len(), 5);
}

#[tokio::test]
async fn the_download_view_lists_only_approved_files() {
    let server = create_test_server(create_test_state());

    let response = server
        .get("/files/approved")
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let files: Vec<FileUploadDTO> = response.json();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.status == FileStatus::Approved));
}

#[tokio::test]
async fn my_files_lists_only_the_callers_uploads() {
    let server = create_test_server(create_test_state());

    let response = server
        .get("/files/mine")
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let files: Vec<FileUploadDTO> = response.json();
    assert_eq!(files.len(), 3);
    assert!(files.iter().all(|f| f.dealer_id == DEMO_DEALER_ID));
}

#[tokio::test]
async fn uploading_creates_pending_rows_with_placeholder_urls() {
    let server = create_test_server(create_test_state());
    let jan = dealer_token();

    // lo stato di test usa il PlaceholderStorage: nessun byte viene salvato
    let form = MultipartForm::new()
        .add_text("folder", "Price Lists")
        .add_part(
            "files",
            Part::bytes("inhoud".as_bytes().to_vec())
                .file_name("prijslijst-2025.xlsx")
                .mime_type("application/vnd.ms-excel"),
        )
        .add_part(
            "files",
            Part::bytes("meer inhoud".as_bytes().to_vec())
                .file_name("catalogus.pdf")
                .mime_type("application/pdf"),
        );

    let response = server
        .post("/files")
        .add_header(header::AUTHORIZATION, bearer(&jan))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let uploaded: Vec<FileUploadDTO> = response.json();
    assert_eq!(uploaded.len(), 2);
    for file in &uploaded {
        assert_eq!(file.status, FileStatus::Pending);
        assert_eq!(file.folder, "Price Lists");
        assert!(file.url.starts_with("/placeholder.svg?text="));
    }

    let mine = server
        .get("/files/mine")
        .add_header(header::AUTHORIZATION, bearer(&jan))
        .await;
    let files: Vec<FileUploadDTO> = mine.json();
    assert_eq!(files.len(), 5);
}

#[tokio::test]
async fn uploads_without_a_folder_are_rejected() {
    let server = create_test_server(create_test_state());

    let form = MultipartForm::new().add_part(
        "files",
        Part::bytes(vec![1, 2, 3]).file_name("zwerfbestand.pdf"),
    );

    let response = server
        .post("/files")
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn a_pending_file_is_reviewed_exactly_once() {
    let server = create_test_server(create_test_state());
    let admin = admin_token();

    let listed = server
        .get("/files")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .await;
    let files: Vec<FileUploadDTO> = listed.json();
    let pending = files
        .iter()
        .find(|f| f.status == FileStatus::Pending)
        .expect("seed contains a pending file");

    let approved = server
        .patch(&format!("/files/{}/status", pending.id))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({ "status": "approved" }))
        .await;
    assert_eq!(approved.status_code(), StatusCode::OK);
    let file: FileUploadDTO = approved.json();
    assert_eq!(file.status, FileStatus::Approved);

    // la seconda review dello stesso file viene rifiutata
    let again = server
        .patch(&format!("/files/{}/status", pending.id))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({ "status": "rejected" }))
        .await;
    assert_eq!(again.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn a_file_cannot_be_moved_back_to_pending() {
    let server = create_test_server(create_test_state());
    let admin = admin_token();

    let listed = server
        .get("/files")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .await;
    let files: Vec<FileUploadDTO> = listed.json();
    let pending = files
        .iter()
        .find(|f| f.status == FileStatus::Pending)
        .unwrap();

    let response = server
        .patch(&format!("/files/{}/status", pending.id))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({ "status": "pending" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reviewing_files_is_admin_only() {
    let server = create_test_server(create_test_state());
    let admin = admin_token();

    let listed = server
        .get("/files")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .await;
    let files: Vec<FileUploadDTO> = listed.json();
    let pending = files
        .iter()
        .find(|f| f.status == FileStatus::Pending)
        .unwrap();

    let response = server
        .patch(&format!("/files/{}/status", pending.id))
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .json(&json!({ "status": "approved" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unapproved_files_are_visible_only_to_the_owner_and_admins() {
    let server = create_test_server(create_test_state());
    let admin = admin_token();

    let listed = server
        .get("/files")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .await;
    let files: Vec<FileUploadDTO> = listed.json();
    let pending = files
        .iter()
        .find(|f| f.status == FileStatus::Pending && f.dealer_id == DEMO_DEALER_ID)
        .expect("seed contains a pending file owned by Jan");

    // un altro dealer non lo può scaricare
    let forbidden = server
        .get(&format!("/files/{}/download", pending.id))
        .add_header(header::AUTHORIZATION, bearer(&manager_token()))
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

    // il proprietario e l'admin vengono rediretti all'URL salvato
    let owner = server
        .get(&format!("/files/{}/download", pending.id))
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .await;
    assert_eq!(owner.status_code(), StatusCode::TEMPORARY_REDIRECT);

    let as_admin = server
        .get(&format!("/files/{}/download", pending.id))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .await;
    assert_eq!(as_admin.status_code(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn approved_files_can_be_downloaded_by_anyone() {
    let server = create_test_server(create_test_state());

    let listed = server
        .get("/files/approved")
        .add_header(header::AUTHORIZATION, bearer(&manager_token()))
        .await;
    let files: Vec<FileUploadDTO> = listed.json();
    let approved = files.first().unwrap();

    let response = server
        .get(&format!("/files/{}/download", approved.id))
        .add_header(header::AUTHORIZATION, bearer(&manager_token()))
        .await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION), approved.url.as_str());
}

#[tokio::test]
async fn demo_mode_serves_listings_but_blocks_uploads() {
    let server = create_test_server(create_demo_state());
    let jan = dealer_token();

    let listed = server
        .get("/files/approved")
        .add_header(header::AUTHORIZATION, bearer(&jan))
        .await;
    let files: Vec<FileUploadDTO> = listed.json();
    assert_eq!(files.len(), 2);

    let form = MultipartForm::new()
        .add_text("folder", "Documentation")
        .add_part(
            "files",
            Part::bytes(vec![0u8; 16]).file_name("handleiding.pdf"),
        );

    let blocked = server
        .post("/files")
        .add_header(header::AUTHORIZATION, bearer(&jan))
        .multipart(form)
        .await;
    assert_eq!(blocked.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(blocked.text().contains("Database not configured"));
}
