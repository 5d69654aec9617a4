//! The "photo library": a pictures directory the final image is written
//! into, one PNG per save, behind a writability check that stands in for
//! the platform authorization prompt.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::AzulError;

pub struct PhotoLibrary {
    dir: PathBuf,
}

impl PhotoLibrary {
    /// Resolves the library directory: an explicit override, else the
    /// user's pictures directory, else `./azul`.
    pub fn resolve(override_dir: Option<&Path>) -> Self {
        let dir = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::picture_dir()
                .map(|d| d.join("Azul"))
                .unwrap_or_else(|| PathBuf::from("azul")),
        };
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes one encoded image into the library. Denied access is its own
    /// error so the UI can tell the user, rather than failing silently.
    pub fn save_png(&self, bytes: &[u8]) -> Result<PathBuf, AzulError> {
        fs::create_dir_all(&self.dir).map_err(|e| self.denied(e))?;
        let path = self.dir.join(format!("azul-{}.png", Uuid::new_v4()));
        fs::write(&path, bytes).map_err(|e| self.denied(e))?;
        log::info!("saved photo to {}", path.display());
        Ok(path)
    }

    fn denied(&self, err: std::io::Error) -> AzulError {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => AzulError::LibraryDenied {
                path: self.dir.clone(),
                reason: err.to_string(),
            },
            _ => AzulError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_into_the_resolved_directory() {
        let tmp = std::env::temp_dir().join(format!("azul-test-{}", Uuid::new_v4()));
        let library = PhotoLibrary::resolve(Some(&tmp));
        let path = library.save_png(b"not a real png").unwrap();
        assert!(path.starts_with(&tmp));
        assert_eq!(fs::read(&path).unwrap(), b"not a real png");
        fs::remove_dir_all(&tmp).unwrap();
    }

    #[test]
    fn override_wins_over_default() {
        let library = PhotoLibrary::resolve(Some(Path::new("/somewhere/else")));
        assert_eq!(library.dir(), Path::new("/somewhere/else"));
    }
}
