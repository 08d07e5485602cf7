use chrono::{DateTime, Utc};
use grants_types::{FileHandle, Message, Panel, Session, UploadedFile};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Build one record per handle, ids counting up from `base` in list order
pub fn build_records(base: u64, handles: Vec<FileHandle>, uploaded_at: DateTime<Utc>) -> Vec<UploadedFile> {
    handles
        .into_iter()
        .enumerate()
        .map(|(offset, handle)| UploadedFile::from_handle((base + offset as u64).to_string(), handle, uploaded_at))
        .collect()
}

/// System text announcing an upload batch
pub fn upload_notice(files: &[UploadedFile]) -> Option<String> {
    match files {
        [] => None,
        [file] => Some(format!(
            "Archivo \"{}\" subido correctamente. Ahora puedes hacer preguntas sobre el contenido de este documento.",
            file.name
        )),
        files => {
            let names = files
                .iter()
                .map(|file| format!("\"{}\"", file.name))
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!(
                "{} archivos subidos correctamente: {}. Ahora puedes hacer preguntas sobre el contenido de estos documentos.",
                files.len(),
                names
            ))
        }
    }
}

/// Attach `records` to the session and switch it to the document panel
pub fn intake(session: Session, records: Vec<UploadedFile>, notice: Option<Message>) -> Session {
    let session = session.with_files(records).with_active_panel(Panel::Document);

    match notice {
        Some(message) => session.append_to(Panel::Document, message),
        None => session,
    }
}

/// Write the file payload to `dir`, keeping only the final component of its name
pub async fn export_file(file: &UploadedFile, dir: &Path) -> Result<PathBuf> {
    let file_name = Path::new(&file.name)
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| file.id.clone().into());

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, file.payload()).await?;

    tracing::debug!(file_id = %file.id, path = %path.display(), "File exported");
    Ok(path)
}
