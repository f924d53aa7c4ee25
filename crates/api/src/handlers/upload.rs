//! Handlers for the `/upload` resource: multipart upload, delete, list.
//!
//! Files live under `ServerConfig::uploads_dir/<folder>/<stored name>` and
//! are served publicly at `/uploads/<folder>/<stored name>`.

use std::io::ErrorKind;
use std::path::PathBuf;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shopgate_core::types::Timestamp;
use shopgate_core::uploads::{
    is_allowed_mime, public_paths, sanitize_folder_name, unique_file_name, validate_stored_name,
    MAX_FILES_PER_REQUEST, MAX_FILE_SIZE,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

const FOLDER_FIELD: &str = "folderName";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One stored upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub mimetype: String,
    pub folder: String,
    pub full_path: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct StoredFiles {
    pub files: Vec<StoredFile>,
    pub count: usize,
}

/// One entry of a folder listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedFile {
    pub filename: String,
    pub size: u64,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
    pub full_path: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct FolderListing {
    pub folder: String,
    pub files: Vec<ListedFile>,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/upload/single -- one file in field `file`.
pub async fn upload_single(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<StoredFile>>> {
    let form = read_form(multipart, "file", 1).await?;
    let mut stored = store_files(&state.config.uploads_dir, form).await?;

    let file = stored
        .pop()
        .ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;

    tracing::info!(user_id = user.id, folder = %file.folder, filename = %file.filename, "File uploaded");
    Ok(Json(ApiResponse::success("1 file(s) uploaded successfully", file)))
}

/// POST /api/upload/multiple -- up to ten files in field `files`.
pub async fn upload_multiple(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<StoredFiles>>> {
    let form = read_form(multipart, "files", MAX_FILES_PER_REQUEST).await?;
    let files = store_files(&state.config.uploads_dir, form).await?;
    let count = files.len();

    tracing::info!(user_id = user.id, count, "Files uploaded");
    Ok(Json(ApiResponse::success(
        format!("{count} file(s) uploaded successfully"),
        StoredFiles { files, count },
    )))
}

/// DELETE /api/upload/{folderName}/{filename}
pub async fn delete_file(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((folder_name, filename)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let folder = sanitize_folder_name(Some(&folder_name));
    validate_stored_name(&filename)?;

    let path = state.config.uploads_dir.join(&folder).join(&filename);
    tokio::fs::remove_file(&path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound("File not found".into()),
        _ => AppError::InternalError(format!("Failed to delete {}: {e}", path.display())),
    })?;

    tracing::info!(user_id = user.id, folder = %folder, filename = %filename, "File deleted");
    Ok(Json(ApiResponse::message("File deleted")))
}

/// GET /api/upload/{folderName}
pub async fn list_files(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(folder_name): Path<String>,
) -> AppResult<Json<ApiResponse<FolderListing>>> {
    let folder = sanitize_folder_name(Some(&folder_name));
    let dir = state.config.uploads_dir.join(&folder);

    let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound("Folder not found".into()),
        _ => AppError::InternalError(format!("Failed to read {}: {e}", dir.display())),
    })?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
    {
        let meta = entry
            .metadata()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        if !meta.is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        let modified_at: DateTime<Utc> = meta
            .modified()
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .into();
        // Birth time is not available on every filesystem.
        let created_at = meta.created().map(DateTime::<Utc>::from).unwrap_or(modified_at);
        let (full_path, url) = public_paths(&folder, &filename);

        files.push(ListedFile {
            filename,
            size: meta.len(),
            created_at,
            modified_at,
            full_path,
            url,
        });
    }
    files.sort_by(|a, b| a.filename.cmp(&b.filename));

    let count = files.len();
    Ok(Json(ApiResponse::success(
        "Files fetched",
        FolderListing {
            folder,
            files,
            count,
        },
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct PendingFile {
    original_name: String,
    mimetype: String,
    data: Vec<u8>,
}

struct UploadForm {
    folder: String,
    files: Vec<PendingFile>,
}

/// Drain the multipart body, enforcing field name, count, type and size.
///
/// Files are buffered so `folderName` may appear before or after them.
async fn read_form(
    mut multipart: Multipart,
    file_field: &str,
    max_files: usize,
) -> AppResult<UploadForm> {
    let mut folder_name: Option<String> = None;
    let mut files = Vec::new();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == FOLDER_FIELD {
            folder_name = Some(field.text().await?);
            continue;
        }

        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue; // ignore unknown text fields
        };
        if name != file_field {
            return Err(AppError::BadRequest(format!("Unexpected field '{name}'")));
        }
        if files.len() == max_files {
            return Err(AppError::BadRequest(format!(
                "Too many files; at most {max_files} allowed"
            )));
        }

        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !is_allowed_mime(&mimetype) {
            return Err(AppError::BadRequest(format!(
                "File type {mimetype} not allowed"
            )));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if data.len() + chunk.len() > MAX_FILE_SIZE {
                return Err(AppError::BadRequest(format!(
                    "File too large; limit is {} MB",
                    MAX_FILE_SIZE / (1024 * 1024)
                )));
            }
            data.extend_from_slice(&chunk);
        }

        files.push(PendingFile {
            original_name,
            mimetype,
            data,
        });
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No file uploaded".into()));
    }

    Ok(UploadForm {
        folder: sanitize_folder_name(folder_name.as_deref()),
        files,
    })
}

async fn store_files(uploads_dir: &std::path::Path, form: UploadForm) -> AppResult<Vec<StoredFile>> {
    let dir: PathBuf = uploads_dir.join(&form.folder);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Dir creation failed: {e}")))?;

    let mut stored = Vec::with_capacity(form.files.len());
    for file in form.files {
        let filename = unique_file_name(
            &file.original_name,
            Utc::now().timestamp_millis(),
            &mut rand::rng(),
        );
        tokio::fs::write(dir.join(&filename), &file.data)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write {filename}: {e}")))?;

        let (full_path, url) = public_paths(&form.folder, &filename);
        stored.push(StoredFile {
            filename,
            original_name: file.original_name,
            size: file.data.len(),
            mimetype: file.mimetype,
            folder: form.folder.clone(),
            full_path,
            url,
        });
    }

    Ok(stored)
}
