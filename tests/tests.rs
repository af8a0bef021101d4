use std::path::Path;
use tempfile::TempDir;
use eigen_fetch::*;

const SHA: &str = "61d8b6fc4279dd1dda986fb1677d15e3d641c07a3ea5abe255790b1f0c0c14e9";

fn setup_source_tree(manifest: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let manifest_path = temp_dir.path().join(DEFAULT_MANIFEST_PATH);
    std::fs::create_dir_all(manifest_path.parent().unwrap()).unwrap();
    std::fs::write(manifest_path, manifest).unwrap();
    temp_dir
}

fn direct_manifest() -> String {
    format!(
        r#"
def tf_workspace(path_prefix = "", tf_repo_name = ""):
    tf_http_archive(
        name = "eigen_archive",
        urls = [
            "https://mirror.bazel.build/bitbucket.org/eigen/eigen/get/429aa5254200.tar.gz",
            "https://bitbucket.org/eigen/eigen/get/429aa5254200.tar.gz",
        ],
        sha256 = "{SHA}",
        strip_prefix = "eigen-eigen-429aa5254200",
        build_file = clean_dep("//third_party:eigen.BUILD"),
    )
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_from_source_tree() {
        let dir = setup_source_tree(&direct_manifest());
        let manifest = Manifest::load(dir.path(), DEFAULT_MANIFEST_PATH).unwrap();
        let coords = locate(&manifest).unwrap();
        assert_eq!(coords.archive_hash, "429aa5254200");
        assert!(coords.url.ends_with("/429aa5254200.tar.gz"));
        assert_eq!(coords.content_hash, SHA);
    }

    #[test]
    fn test_unrecognised_manifest_produces_no_coordinates() {
        let dir = setup_source_tree("workspace(name = \"org_tensorflow\")\n");
        let manifest = Manifest::load(dir.path(), DEFAULT_MANIFEST_PATH).unwrap();
        assert!(matches!(locate(&manifest), Err(LocateError::NotFound { .. })));
    }

    #[test]
    fn test_generate_after_install_layout() {
        let dir = setup_source_tree(&direct_manifest());
        let manifest = Manifest::load(dir.path(), DEFAULT_MANIFEST_PATH).unwrap();
        let coords = locate(&manifest).unwrap();

        let prefix = dir.path().join("prefix");
        std::fs::create_dir_all(installed_include_dir(&prefix, &coords.directory_name())).unwrap();
        let out = dir.path().join("cmake");

        generate(&coords, IntegrationMode::Installed, &out, &prefix).unwrap();
        let descriptor = std::fs::read_to_string(out.join(DESCRIPTOR_FILE_NAME)).unwrap();
        assert_eq!(descriptor.lines().count(), 5);
        assert!(descriptor.contains(&format!("set(eigen_HASH \"SHA256={SHA}\")")));
        assert!(descriptor.contains(&format!("set(eigen_INSTALL_DIR \"{}\")", prefix.display())));
        assert!(out.join("Eigen_installed.cmake").exists());
    }

    #[test]
    fn test_generate_refuses_missing_installation() {
        let dir = setup_source_tree(&direct_manifest());
        let manifest = Manifest::load(dir.path(), DEFAULT_MANIFEST_PATH).unwrap();
        let coords = locate(&manifest).unwrap();
        let out = dir.path().join("cmake");

        assert!(generate(&coords, IntegrationMode::Installed, &out, Path::new("/nonexistent")).is_err());
        assert!(!out.join(DESCRIPTOR_FILE_NAME).exists());
    }
}
