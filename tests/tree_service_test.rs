//! Tests for TreeService loading and validation

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rstest::rstest;
use tempfile::TempDir;

use treeflow::application::services::{TreeFormat, TreeService};
use treeflow::application::ApplicationError;
use treeflow::domain::DomainError;
use treeflow::infrastructure::traits::{FileSystem, RealFileSystem};

/// In-memory filesystem for service tests.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Every path exists as a file but reading it fails.
struct UnreadableFileSystem;

impl FileSystem for UnreadableFileSystem {
    fn read_to_string(&self, _path: &Path) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }

    fn write(&self, _path: &Path, _content: &str) -> io::Result<()> {
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        true
    }

    fn is_file(&self, _path: &Path) -> bool {
        true
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn real_service() -> TreeService {
    TreeService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_sample_json_when_loading_then_matches_builtin_sample() {
    let service = real_service();

    let loaded = service
        .load(Path::new("tests/resources/trees/sample.json"))
        .unwrap();
    let builtin = service.sample().unwrap();

    assert_eq!(loaded.to_spec(), builtin.to_spec());
    assert_eq!(loaded.len(), 11);
}

#[test]
fn given_nested_toml_when_loading_then_keeps_child_order() {
    let tree = real_service()
        .load(Path::new("tests/resources/trees/org.toml"))
        .unwrap();

    let ids: Vec<_> = tree.iter().map(|(_, n)| n.data.id.clone()).collect();
    assert_eq!(ids, vec!["ceo", "cto", "platform", "sre", "product-eng", "cfo"]);
    assert_eq!(tree.depth(), 4);
}

#[test]
fn given_duplicate_ids_when_loading_then_rejects_before_layout() {
    let err = real_service()
        .load(Path::new("tests/resources/trees/duplicate.json"))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DuplicateId(ref id)) if id == "x"
    ));
}

#[rstest]
#[case("tree.yaml")]
#[case("tree")]
fn given_unknown_extension_when_loading_then_unsupported_format(#[case] name: &str) {
    let err = real_service().load(Path::new(name)).unwrap_err();

    assert!(matches!(err, ApplicationError::UnsupportedFormat(_)));
}

#[test]
fn given_missing_file_when_loading_then_no_input() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.json");

    let err = real_service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::NoInput { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn given_directory_path_when_loading_then_no_input() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trees.json");
    std::fs::create_dir(&path).unwrap();

    let err = real_service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::NoInput { reason: "not a file", .. }));
}

#[test]
fn given_unreadable_file_when_loading_then_io_error_keeps_kind() {
    let service = TreeService::new(Arc::new(UnreadableFileSystem));

    let err = service.load(Path::new("/trees/locked.json")).unwrap_err();

    match err {
        ApplicationError::Io { context, source } => {
            assert!(context.contains("locked.json"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn given_malformed_json_when_loading_then_parse_error_names_file() {
    let fs = MemoryFileSystem::with_file("/trees/broken.json", r#"{"id": "root", "label": }"#);
    let service = TreeService::new(Arc::new(fs));

    let err = service.load(Path::new("/trees/broken.json")).unwrap_err();

    match err {
        ApplicationError::Parse { path, .. } => assert_eq!(path, PathBuf::from("/trees/broken.json")),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn given_missing_label_when_loading_then_parse_error() {
    let fs = MemoryFileSystem::with_file("/t.json", r#"{"id": "root"}"#);
    let service = TreeService::new(Arc::new(fs));

    assert!(matches!(
        service.load(Path::new("/t.json")),
        Err(ApplicationError::Parse { .. })
    ));
}

#[test]
fn given_no_path_when_resolving_then_uses_sample() {
    let service = TreeService::new(Arc::new(MemoryFileSystem::default()));

    let tree = service.resolve(None).unwrap();

    assert!(tree.contains("c3"));
}

#[rstest]
#[case("a.json", Some(TreeFormat::Json))]
#[case("A.JSON", Some(TreeFormat::Json))]
#[case("dir/tree.toml", Some(TreeFormat::Toml))]
#[case("tree.yml", None)]
fn given_path_when_detecting_format_then_uses_extension(
    #[case] path: &str,
    #[case] expected: Option<TreeFormat>,
) {
    assert_eq!(TreeFormat::from_path(Path::new(path)), expected);
}
