use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SCHEMA: &str = r#"{
    "module": "blog",
    "records": [
        {
            "name": "User",
            "primary_key": { "name": "id", "kind": "auto" },
            "fields": [{ "name": "username", "kind": "char" }]
        },
        {
            "name": "Post",
            "primary_key": { "name": "id", "kind": "auto" },
            "fields": [
                { "name": "title", "kind": "char" },
                { "name": "published", "kind": "boolean" }
            ],
            "relations": [{ "name": "author", "related": "User" }]
        }
    ]
}"#;

const VARIANTS: [&str; 6] = [
    "post",
    "list_post",
    "create_post",
    "retrieve_post",
    "update_post",
    "delete_post",
];

fn write_schema(dir: &Path) -> PathBuf {
    let path = dir.join("blog.json");
    fs::write(&path, SCHEMA).unwrap();
    path
}

fn protoforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_protoforge"))
        .args(args)
        .args(["--log-level", "warn"])
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_generate_writes_every_variant() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let root = dir.path().join("out");
    fs::create_dir(&root).unwrap();
    let root_arg = format!("{}/", root.display());

    let output = protoforge(&[
        "generate",
        &root_arg,
        "--schema",
        schema.to_str().unwrap(),
        "--model",
        "blog.Post",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    let protos = format!("{}/protos", root.display());
    let generated = format!("{}/generated", root.display());
    assert!(text.contains(&format!("Directory '{}' created successfully.", protos)));
    assert!(text.contains(&format!("Directory '{}' created successfully.", generated)));

    for stem in VARIANTS {
        let path = root.join("protos").join(format!("{}.proto", stem));
        assert!(path.is_file(), "missing {}", path.display());
        assert!(text.contains(&format!(
            "python -m grpc_tools.protoc --proto_path={} --python_out={} --grpc_python_out={} {}.proto",
            protos, generated, generated, stem
        )));
    }

    let full = fs::read_to_string(root.join("protos/post.proto")).unwrap();
    assert!(full.contains("package posts;"));
    assert!(full.contains("    bool published = 3;\n"));

    let update = fs::read_to_string(root.join("protos/update_post.proto")).unwrap();
    assert!(update.contains("package update_posts;"));
    assert!(update.contains("rpc Update(UpdatePostRequest) returns (Post) {"));
    assert!(!update.contains("rpc List("));
}

#[test]
fn test_rerun_reports_existing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let root = dir.path().to_str().unwrap();
    let args = [
        "generate",
        root,
        "--schema",
        schema.to_str().unwrap(),
        "--model",
        "blog.Post",
        "--filename",
        "article",
    ];

    assert!(protoforge(&args).status.success());
    let output = protoforge(&args);
    assert!(output.status.success());
    assert!(stdout(&output).contains(&format!("Directory '{}/protos' already exists.", root)));

    let list = fs::read_to_string(dir.path().join("protos/list_article.proto")).unwrap();
    assert!(list.contains("package list_articles;"));
}

#[test]
fn test_invalid_field_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = protoforge(&[
        "generate",
        dir.path().to_str().unwrap(),
        "--schema",
        schema.to_str().unwrap(),
        "--model",
        "blog.Post",
        "--fields",
        "id,subtitle",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Field name `subtitle` is not valid for schema `Post`"));
    assert!(!dir.path().join("protos").exists());
}

#[test]
fn test_fields_json() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = protoforge(&[
        "fields",
        "--schema",
        schema.to_str().unwrap(),
        "--model",
        "blog.Post",
        "--fields",
        "author,title",
        "--json",
    ]);
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        entries,
        serde_json::json!([
            { "name": "author", "type": "int32" },
            { "name": "title", "type": "string" }
        ])
    );
}

#[test]
fn test_fields_applies_config_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"scalar_overrides": {"char": "bytes"}}"#).unwrap();

    let output = protoforge(&[
        "fields",
        "--schema",
        schema.to_str().unwrap(),
        "--model",
        "blog.Post",
        "--fields",
        "id,title",
        "--config",
        config.to_str().unwrap(),
        "--json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        entries,
        serde_json::json!([
            { "name": "id", "type": "int32" },
            { "name": "title", "type": "bytes" }
        ])
    );
}

#[test]
fn test_filename_outside_package_charset() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = protoforge(&[
        "generate",
        dir.path().to_str().unwrap(),
        "--schema",
        schema.to_str().unwrap(),
        "--model",
        "blog.Post",
        "--filename",
        "blog-post",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let full = fs::read_to_string(dir.path().join("protos/blog-post.proto")).unwrap();
    assert!(full.contains("package posts;"));
    let delete = fs::read_to_string(dir.path().join("protos/delete_blog-post.proto")).unwrap();
    assert!(delete.contains("package delete_posts;"));
}
