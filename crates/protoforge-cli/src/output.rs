use std::fs;
use std::io;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory '{path}' already exists.")]
    Exists { path: String },

    #[error("Permission denied: Unable to create '{path}'.")]
    PermissionDenied { path: String },

    #[error("An error occurred: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl DirectoryError {
    fn classify(path: &str, source: io::Error) -> Self {
        let path = path.to_string();
        match source.kind() {
            io::ErrorKind::AlreadyExists => DirectoryError::Exists { path },
            io::ErrorKind::PermissionDenied => DirectoryError::PermissionDenied { path },
            _ => DirectoryError::Io { path, source },
        }
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, DirectoryError::Exists { .. })
    }
}

/// Create one directory level. An existing directory is reported and
/// accepted; anything else is returned to the caller.
pub fn ensure_directory(path: &str) -> Result<(), DirectoryError> {
    match fs::create_dir(path) {
        Ok(()) => {
            println!("Directory '{}' created successfully.", path);
            Ok(())
        }
        Err(e) => {
            let err = DirectoryError::classify(path, e);
            if err.is_fatal() {
                return Err(err);
            }
            warn!("{}", err);
            println!("{}", err);
            Ok(())
        }
    }
}

/// `{root}/protos` and `{root}/generated` for an optional output root
pub fn output_paths(root: Option<&str>) -> (String, String) {
    let root = root.unwrap_or(".").trim_end_matches('/');
    (format!("{}/protos", root), format!("{}/generated", root))
}

pub fn compile_command(protos: &str, generated: &str, stem: &str) -> String {
    format!(
        "python -m grpc_tools.protoc --proto_path={} --python_out={} --grpc_python_out={} {}.proto",
        protos, generated, generated, stem
    )
}
