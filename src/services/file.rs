//! File services - Upload, approvazione e download
//!
//! I byte vanno nel bucket "uploads" con un singolo PUT best-effort; nel
//! database resta una riga pending che solo un admin può promuovere ad
//! approved o rejected, una volta sola.

use crate::core::{AppError, AppState, require_role};
use crate::dtos::{CreateFileDTO, FileUploadDTO, UpdateFileStatusDTO};
use crate::entities::{Dealer, DealerRole, FileStatus};
use crate::storage::{object_key, placeholder_url};
use axum::{
    Extension,
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
    response::Redirect,
};
use axum_macros::debug_handler;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

struct UploadedPart {
    filename: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[debug_handler]
#[instrument(skip(state, current_dealer, multipart), fields(dealer_id = %current_dealer.id))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<FileUploadDTO>>), AppError> {
    debug!("Handling file upload");

    if state.demo {
        return Err(AppError::not_configured());
    }

    // Prima si raccoglie tutto il form: l'ordine dei campi non è garantito
    let mut folder: Option<String> = None;
    let mut parts: Vec<UploadedPart> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Invalid multipart data: {:?}", e);
        AppError::bad_request("Invalid multipart data")
    })? {
        match field.file_name().map(str::to_string) {
            Some(filename) if !filename.is_empty() => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        warn!("Failed to read file bytes: {:?}", e);
                        AppError::bad_request("Failed to read uploaded file")
                    })?
                    .to_vec();
                parts.push(UploadedPart {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {
                if field.name() == Some("folder") {
                    folder = field.text().await.ok().map(|t| t.trim().to_string());
                }
            }
        }
    }

    let folder = folder
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::bad_request("Folder is required"))?;

    if parts.is_empty() {
        return Err(AppError::bad_request("No files provided"));
    }

    let mut uploaded = Vec::new();
    for part in parts {
        // Un PUT, nessun retry: se lo storage non risponde la riga nasce
        // comunque, con l'URL placeholder
        let key = object_key(&folder, &part.filename, Utc::now().timestamp_millis());
        let url = match state
            .uploads
            .upload(&key, part.bytes, part.content_type)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                warn!("Storage upload failed, using placeholder: {:?}", e);
                placeholder_url(&part.filename)
            }
        };

        let new_file = CreateFileDTO {
            dealer_id: current_dealer.id,
            filename: part.filename.clone(),
            folder: folder.clone(),
            url,
        };
        match state.files.create(&new_file).await {
            Ok(file) => {
                if let Err(e) = state
                    .audit
                    .record(
                        &current_dealer.id,
                        "file_uploaded",
                        json!({ "filename": file.filename, "folder": file.folder }),
                    )
                    .await
                {
                    debug!("Failed to record upload: {:?}", e);
                }
                uploaded.push(FileUploadDTO::from(file));
            }
            // Il fallimento di un file non blocca gli altri
            Err(e) => warn!("Upload failed for file {}: {:?}", part.filename, e),
        }
    }

    info!("Uploaded {} files", uploaded.len());
    Ok((StatusCode::CREATED, Json(uploaded)))
}

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> Result<Json<Vec<FileUploadDTO>>, AppError> {
    require_role(&current_dealer, &[DealerRole::Admin])?;

    let files = match state.files.list_all().await {
        Ok(files) => files,
        Err(e) => {
            warn!("Failed to fetch files: {:?}", e);
            Vec::new()
        }
    };

    Ok(Json(files.into_iter().map(FileUploadDTO::from).collect()))
}

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id))]
pub async fn list_my_files(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> Json<Vec<FileUploadDTO>> {
    let files = match state.files.list_by_owner(&current_dealer.id).await {
        Ok(files) => files,
        Err(e) => {
            warn!("Failed to fetch own files: {:?}", e);
            Vec::new()
        }
    };

    Json(files.into_iter().map(FileUploadDTO::from).collect())
}

/// La vista pubblica dei download: solo file approvati.
#[instrument(skip(state))]
pub async fn list_approved_files(State(state): State<Arc<AppState>>) -> Json<Vec<FileUploadDTO>> {
    let files = match state.files.list_approved().await {
        Ok(files) => files,
        Err(e) => {
            warn!("Failed to fetch approved files: {:?}", e);
            Vec::new()
        }
    };

    Json(files.into_iter().map(FileUploadDTO::from).collect())
}

#[instrument(skip(state, current_dealer, body), fields(admin_id = %current_dealer.id, file_id = %file_id))]
pub async fn update_file_status(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Path(file_id): Path<Uuid>,
    Json(body): Json<UpdateFileStatusDTO>,
) -> Result<Json<FileUploadDTO>, AppError> {
    debug!("Reviewing file");
    require_role(&current_dealer, &[DealerRole::Admin])?;

    if state.demo {
        return Err(AppError::not_configured());
    }

    if body.status == FileStatus::Pending {
        return Err(AppError::bad_request(
            "A file can only be approved or rejected",
        ));
    }

    let file = state
        .files
        .read(&file_id)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    // La transizione parte solo da pending e avviene una volta sola
    if file.status != FileStatus::Pending {
        warn!("Attempt to re-review file in status {:?}", file.status);
        return Err(AppError::conflict("File has already been reviewed"));
    }

    let updated = state.files.update_status(&file_id, body.status).await?;
    info!("File {} moved to {:?}", updated.id, updated.status);
    Ok(Json(FileUploadDTO::from(updated)))
}

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id, file_id = %file_id))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Path(file_id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    let file = state
        .files
        .read(&file_id)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    // File non ancora approvati: visibili solo al proprietario e agli admin
    if file.status != FileStatus::Approved
        && file.dealer_id != current_dealer.id
        && current_dealer.role != DealerRole::Admin
    {
        return Err(AppError::forbidden("File is not available for download"));
    }

    if let Err(e) = state
        .audit
        .record(
            &current_dealer.id,
            "file_downloaded",
            json!({ "file_id": file.id, "filename": file.filename }),
        )
        .await
    {
        debug!("Failed to record download: {:?}", e);
    }

    info!("Redirecting to stored file URL");
    Ok(Redirect::temporary(&file.url))
}
