//! Library-level pipeline tests over on-disk projects.

use confmerge::assembly::Assembler;
use confmerge::config::AssemblyConfig;
use confmerge::core::ConfmergeError;
use confmerge::manifest::Manifest;
use confmerge::output::{JsonArtifactWriter, write_assembly};
use confmerge::package::{CategoryFiles, ConfigFile, PackageNode};
use confmerge::provider::{FilesystemProvider, PackageProvider, StaticProvider};
use confmerge::test_utils::{ManifestFixture, ProjectFixture, init_test_logging};

fn assemble(project: &ProjectFixture) -> Result<confmerge::assembly::Assembly, ConfmergeError> {
    init_test_logging(None);
    let manifest = Manifest::load(&project.manifest_path()).unwrap();
    let config = AssemblyConfig::from_manifest_with_env(project.path(), &manifest.config, |_| None);
    let packages = FilesystemProvider::new(manifest, &config.vendor_dir).packages().unwrap();
    Assembler::new(config).assemble(&packages)
}

#[test]
fn test_end_to_end_scenario() {
    let project = ProjectFixture::basic().unwrap();
    let assembly = assemble(&project).unwrap();

    assert_eq!(assembly.build_order.names(), vec!["acme/lib-a", "acme/app"]);
    assert_eq!(
        assembly.files["params"],
        vec![
            ConfigFile::required(project.package_dir("acme/lib-a").join("config/params.php")),
            ConfigFile::required(project.path().join("config/params.php")),
        ]
    );
    assert_eq!(
        assembly.files["defines"],
        vec![ConfigFile::required(project.path().join("config/defines.php"))]
    );
}

#[test]
fn test_reference_expansion_across_packages() {
    let project = ProjectFixture::new()
        .unwrap()
        .with_root(&ManifestFixture::custom(
            "root",
            r#"
[package]
name = "acme/app"
require = ["acme/lib"]

[files]
common = "common.php"
web = ["$common", "web.php"]
console = ["$common", "console.php"]
"#,
        ))
        .unwrap()
        .with_package(
            "acme/lib",
            &ManifestFixture::custom(
                "lib",
                r#"
[package]
name = "acme/lib"

[files]
common = "common.php"
web = "web.php"
"#,
            ),
        )
        .unwrap();

    let assembly = assemble(&project).unwrap();
    let lib = project.package_dir("acme/lib");
    let root = project.path();

    assert_eq!(
        assembly.files["web"],
        vec![
            ConfigFile::required(lib.join("common.php")),
            ConfigFile::required(lib.join("web.php")),
            ConfigFile::required(root.join("common.php")),
            ConfigFile::required(root.join("web.php")),
        ]
    );
    assert_eq!(
        assembly.files["console"],
        vec![
            ConfigFile::required(lib.join("common.php")),
            ConfigFile::required(root.join("common.php")),
            ConfigFile::required(root.join("console.php")),
        ]
    );
}

#[test]
fn test_reference_cycle_names_categories() {
    let project = ProjectFixture::new()
        .unwrap()
        .with_root(&ManifestFixture::custom(
            "root",
            r#"
[package]
name = "acme/app"

[files]
common = "$web"
web = ["$common", "web.php"]
"#,
        ))
        .unwrap();

    let err = assemble(&project).unwrap_err();
    let ConfmergeError::CyclicReference { chain, .. } = err else {
        panic!("expected a cyclic reference");
    };
    assert_eq!(chain, "common → web → common");
}

#[test]
fn test_priority_reversed_categories_from_config() {
    let project = ProjectFixture::new()
        .unwrap()
        .with_root(&ManifestFixture::custom(
            "root",
            r#"
[package]
name = "acme/app"
require = ["acme/lib-a"]

[files]
params = "config/params.php"

[config]
priority-reversed = ["params"]
"#,
        ))
        .unwrap()
        .with_package("acme/lib-a", &ManifestFixture::basic_lib())
        .unwrap();

    let assembly = assemble(&project).unwrap();
    assert_eq!(assembly.files["params"][0].path, project.path().join("config/params.php"));
}

#[test]
fn test_invalid_root_manifest_syntax() {
    let project = ProjectFixture::new().unwrap().with_root(&ManifestFixture::invalid_syntax()).unwrap();
    let err = Manifest::load(&project.manifest_path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfmergeError>(),
        Some(ConfmergeError::ManifestParseError { .. })
    ));
}

#[test]
fn test_prepared_graph_from_static_provider() {
    init_test_logging(None);
    let temp = tempfile::TempDir::new().unwrap();
    let app = temp.path().join("app");
    let lib = temp.path().join("lib");
    for file in [app.join("params.php"), lib.join("params.php"), lib.join("defines.php")] {
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "<?php return [];").unwrap();
    }

    let provider = StaticProvider::new(vec![
        PackageNode::new("acme/app", &app)
            .root()
            .with_requires(["acme/lib"])
            .with_files(CategoryFiles::new().with("params", ["params.php"])),
        PackageNode::new("acme/lib", &lib).with_files(
            CategoryFiles::new().with("params", ["params.php"]).with("defines", ["defines.php"]),
        ),
    ]);

    let config = AssemblyConfig::defaults(&app);
    let assembly = Assembler::new(config.clone()).assemble(&provider.packages().unwrap()).unwrap();
    assert_eq!(assembly.build_order.names(), vec!["acme/lib", "acme/app"]);

    write_assembly(&JsonArtifactWriter, &config, &assembly).unwrap();
    let files: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(config.output_dir.join("files.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(files["params"][0], lib.join("params.php").display().to_string());
    assert_eq!(files["params"][1], app.join("params.php").display().to_string());
}

#[test]
fn test_missing_file_in_prepared_graph_names_package() {
    let temp = tempfile::TempDir::new().unwrap();
    let app = temp.path().join("app");

    let provider = StaticProvider::new(vec![
        PackageNode::new("acme/app", &app).root().with_requires(["acme/lib"]),
        PackageNode::new("acme/lib", temp.path().join("lib"))
            .with_files(CategoryFiles::new().with("params", ["params.php"])),
    ]);

    let config = AssemblyConfig::defaults(&app);
    let assembly = Assembler::new(config.clone()).assemble(&provider.packages().unwrap()).unwrap();

    let err = write_assembly(&JsonArtifactWriter, &config, &assembly).unwrap_err();
    match err.downcast_ref::<ConfmergeError>() {
        Some(ConfmergeError::ConfigFileNotFound { package, path }) => {
            assert_eq!(package, "acme/lib");
            assert!(path.ends_with("params.php"));
        }
        _ => panic!("expected a missing configuration file"),
    }
    assert!(!config.output_dir.exists());
}
