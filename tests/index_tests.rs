//! Repository index tests.
//!
//! Builds small on-disk repositories and checks discovery, fail-fast
//! building, and the ordering of aggregated searches.

use refscan::index::RepositoryIndex;
use refscan::ingest::detect::ScanConfig;
use refscan::ingest::syntax::NodeKind;
use refscan::resolve::{ReferenceKind, ReferenceRecord};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, source: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dirs");
        }
        fs::write(path, source).expect("Failed to write module");
    }

    #[test]
    fn test_instantiation_scenario() {
        let repo = TempDir::new().expect("Failed to create temp repo");
        write(repo.path(), "app.py", "class A:\n    pass\n\ndef f():\n    return A()\n");

        let index = RepositoryIndex::open(ScanConfig::new(repo.path())).expect("Failed to index");
        assert_eq!(index.len(), 1);

        let classes = index.get_all_class_definitions();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name(), Some("A"));

        let refs = index.search_class_references_everywhere("A");
        assert_eq!(refs.len(), 1);
        let record = ReferenceRecord::for_class(refs[0]);
        assert_eq!(record.kind, ReferenceKind::Instantiation);
        assert_eq!(record.kind.label(), "Instantiation");
        assert_eq!(record.enclosing_function, Some("f"));
        assert_eq!(record.enclosing_class, None);
        assert_eq!(
            record.module.and_then(|p| p.file_name()),
            Some(std::ffi::OsStr::new("app.py"))
        );
    }

    #[test]
    fn test_aggregation_follows_path_order() {
        let repo = TempDir::new().expect("Failed to create temp repo");
        write(repo.path(), "b_second.py", "from models import Item\nx = Item()\n");
        write(repo.path(), "a_first.py", "class Item:\n    pass\n\ny: Item = Item()\n");
        write(repo.path(), "pkg/c_third.py", "def load() -> Item:\n    return Item()\n");

        let index = RepositoryIndex::open(ScanConfig::new(repo.path())).expect("Failed to index");
        assert_eq!(index.len(), 3);

        let module_order: Vec<&Path> = index.modules().map(|(p, _)| p).collect();
        let mut sorted = module_order.clone();
        sorted.sort();
        assert_eq!(module_order, sorted);

        let refs = index.search_class_references_everywhere("Item");
        let files: Vec<String> = refs
            .iter()
            .filter_map(|r| r.enclosing_module())
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            files,
            vec!["a_first.py", "a_first.py", "b_second.py", "c_third.py", "c_third.py"]
        );

        let kinds: Vec<ReferenceKind> = refs
            .iter()
            .map(|r| ReferenceRecord::for_class(*r).kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ReferenceKind::VariableTypeHint,
                ReferenceKind::Instantiation,
                ReferenceKind::Instantiation,
                ReferenceKind::ReturnTypeHint,
                ReferenceKind::Instantiation,
            ]
        );
    }

    #[test]
    fn test_function_references_everywhere() {
        let repo = TempDir::new().expect("Failed to create temp repo");
        write(repo.path(), "a.py", "def save(obj):\n    pass\n");
        write(
            repo.path(),
            "b.py",
            "class Repo:\n    def flush(self):\n        save(self)\n        self.store.save(1)\n",
        );

        let index = RepositoryIndex::open(ScanConfig::new(repo.path())).expect("Failed to index");
        let defs = index.get_all_function_definitions();
        let names: Vec<&str> = defs.iter().filter_map(|d| d.name()).collect();
        assert_eq!(names, vec!["save", "flush"]);

        let calls = index.search_function_references_everywhere("save");
        assert_eq!(calls.len(), 2);
        for call in &calls {
            assert_eq!(call.kind(), NodeKind::Call);
            let record = ReferenceRecord::for_function(*call);
            assert_eq!(record.kind, ReferenceKind::FunctionCall);
            assert_eq!(record.location(), "Repo.flush");
        }
    }

    #[test]
    fn test_parse_error_aborts_build() {
        let repo = TempDir::new().expect("Failed to create temp repo");
        write(repo.path(), "good.py", "class Fine:\n    pass\n");
        write(repo.path(), "broken.py", "def broken(:\n    pass\n");

        let mut index = RepositoryIndex::new(ScanConfig::new(repo.path()));
        let err = index.build_all().expect_err("build should fail");

        assert!(err.is_parse_error());
        let file = err.file().expect("error names the file");
        assert_eq!(file.file_name(), Some(std::ffi::OsStr::new("broken.py")));
        assert!(index.is_empty(), "no partial module set is installed");
        assert!(index.get_all_class_definitions().is_empty());
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_modules() {
        let repo = TempDir::new().expect("Failed to create temp repo");
        write(repo.path(), "good.py", "class Fine:\n    pass\n");

        let mut index = RepositoryIndex::new(ScanConfig::new(repo.path()));
        assert_eq!(index.build_all().expect("first build"), 1);

        write(repo.path(), "late.py", "class Broken(:\n");
        assert!(index.build_all().is_err());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_custom_extension() {
        let repo = TempDir::new().expect("Failed to create temp repo");
        write(repo.path(), "stubs.pyi", "class Stub:\n    pass\n");
        write(repo.path(), "impl.py", "class Impl:\n    pass\n");

        let config = ScanConfig::new(repo.path()).with_extension("pyi");
        let index = RepositoryIndex::open(config).expect("Failed to index");
        assert_eq!(index.len(), 1);
        let names: Vec<&str> = index
            .get_all_class_definitions()
            .iter()
            .filter_map(|d| d.name())
            .collect();
        assert_eq!(names, vec!["Stub"]);
    }

    #[test]
    fn test_empty_repository() {
        let repo = TempDir::new().expect("Failed to create temp repo");
        let index = RepositoryIndex::open(ScanConfig::new(repo.path())).expect("Failed to index");
        assert!(index.is_empty());
        assert!(index.search_class_references_everywhere("Anything").is_empty());
        assert!(index.get_all_function_definitions().is_empty());
    }
}
