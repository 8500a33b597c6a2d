use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

pub const MAX_FACE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const FACE_IMAGE_DIR: &str = "face-images";
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Picks the stored extension from the client file name, falling back to the
/// request content type. `None` when neither names an accepted image format.
pub fn image_extension(file_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let from_mime = content_type.and_then(|mime| {
        match mime.split(';').next().unwrap_or_default().trim() {
            "image/jpeg" | "image/jpg" => Some("jpg".to_string()),
            "image/png" => Some("png".to_string()),
            "image/webp" => Some("webp".to_string()),
            _ => None,
        }
    });

    from_name
        .or(from_mime)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// `<unix_ms>-<random>.<ext>`
pub fn unique_file_name(ext: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = uuid::Uuid::new_v4().as_u128() % 1_000_000_000;
    format!("{}-{}.{}", millis, suffix, ext)
}

#[derive(Debug)]
pub struct StoredImage {
    pub path: PathBuf,
    /// Public URL, `/uploads/face-images/<file>`.
    pub url: String,
}

/// Writes the image under `<upload_dir>/face-images/`, creating the directory
/// when missing. Blocking; call from `web::block`.
pub fn store_face_image(upload_dir: &str, ext: &str, bytes: &[u8]) -> std::io::Result<StoredImage> {
    let dir = Path::new(upload_dir).join(FACE_IMAGE_DIR);
    std::fs::create_dir_all(&dir)?;

    let file_name = unique_file_name(ext);
    let path = dir.join(&file_name);
    std::fs::write(&path, bytes)?;
    debug!(path = %path.display(), size = bytes.len(), "Stored face image");

    Ok(StoredImage {
        path,
        url: format!("/uploads/{}/{}", FACE_IMAGE_DIR, file_name),
    })
}

/// Reads a stored face image back. `Ok(None)` for unknown files and for
/// names that are not a single plain path segment. Blocking.
pub fn read_face_image(upload_dir: &str, file_name: &str) -> std::io::Result<Option<(Vec<u8>, &'static str)>> {
    let plain = Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name);
    if !plain {
        return Ok(None);
    }
    let content_type = match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => return Ok(None),
    };

    match std::fs::read(Path::new(upload_dir).join(FACE_IMAGE_DIR).join(file_name)) {
        Ok(bytes) => Ok(Some((bytes, content_type))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_from_name_or_mime() {
        assert_eq!(image_extension(Some("me.JPG"), None).as_deref(), Some("jpg"));
        assert_eq!(image_extension(None, Some("image/webp")).as_deref(), Some("webp"));
        assert_eq!(image_extension(Some("scan.pdf"), Some("image/png")), None);
        assert_eq!(image_extension(None, Some("application/octet-stream")), None);
        assert_eq!(image_extension(None, None), None);
    }

    #[test]
    fn file_names_are_unique() {
        let a = unique_file_name("png");
        let b = unique_file_name("png");
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn stored_images_read_back() {
        let dir = std::env::temp_dir().join(format!("face-read-{}", uuid::Uuid::new_v4()));
        let dir = dir.to_string_lossy().into_owned();

        let stored = store_face_image(&dir, "png", b"png-bytes").unwrap();
        let name = stored.path.file_name().unwrap().to_str().unwrap().to_string();
        assert_eq!(stored.url, format!("/uploads/face-images/{}", name));

        let (bytes, mime) = read_face_image(&dir, &name).unwrap().unwrap();
        assert_eq!(bytes, b"png-bytes");
        assert_eq!(mime, "image/png");

        assert!(read_face_image(&dir, "missing.png").unwrap().is_none());
        assert!(read_face_image(&dir, "../secret.png").unwrap().is_none());
        assert!(read_face_image(&dir, "notes.txt").unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
