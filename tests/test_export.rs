use homedesign::export::{ExportFormat, export, export_json, export_pdf, export_txt};

#[tokio::test]
async fn json_export_wraps_text() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = export_json(dir.path(), "Hello").await.unwrap();
    assert_eq!(artifact.path, dir.path().join("design_plan.json"));
    assert_eq!(artifact.format, ExportFormat::Json);

    let contents = std::fs::read(&artifact.path).unwrap();
    assert_eq!(contents, artifact.bytes);
    let parsed: serde_json::Value = serde_json::from_slice(&contents).unwrap();
    assert_eq!(parsed, serde_json::json!({"design_plan": "Hello"}));
}

#[tokio::test]
async fn txt_export_is_byte_exact() {
    let dir = tempfile::tempdir().unwrap();
    let text = "Ground floor:\n  - Kitchen \u{2013} open plan\r\n  - Caf\u{e9} nook \u{1f3e1}\n";
    let artifact = export_txt(dir.path(), text).await.unwrap();
    assert_eq!(artifact.path, dir.path().join("design_plan.txt"));
    assert_eq!(artifact.bytes, text.as_bytes());
    assert_eq!(std::fs::read(&artifact.path).unwrap(), text.as_bytes());
}

#[tokio::test]
async fn repeated_exports_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    for format in ExportFormat::ALL {
        export(dir.path(), "first, and rather longer, version", format)
            .await
            .unwrap();
        export(dir.path(), "second", format).await.unwrap();
    }

    assert_eq!(
        std::fs::read_to_string(dir.path().join("design_plan.txt")).unwrap(),
        "second"
    );
    let parsed: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("design_plan.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(parsed["design_plan"], "second");

    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 3);
}

#[tokio::test]
async fn returned_bytes_survive_a_later_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let first = export(dir.path(), "first visitor", ExportFormat::Txt)
        .await
        .unwrap();
    export(dir.path(), "second visitor", ExportFormat::Txt)
        .await
        .unwrap();
    assert_eq!(first.bytes, b"first visitor");
    assert_eq!(
        std::fs::read_to_string(&first.path).unwrap(),
        "second visitor"
    );
}

#[tokio::test]
async fn pdf_export_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let text = "Design overview\n".repeat(100);
    let artifact = export_pdf(dir.path(), &text).await.unwrap();
    assert_eq!(artifact.path, dir.path().join("design_plan.pdf"));
    assert!(artifact.bytes.starts_with(b"%PDF"));
    assert_eq!(std::fs::read(&artifact.path).unwrap(), artifact.bytes);
}

#[tokio::test]
async fn pdf_export_accepts_empty_text() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = export_pdf(dir.path(), "").await.unwrap();
    assert!(artifact.path.exists());
    assert!(!artifact.bytes.is_empty());
}

#[tokio::test]
async fn export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let result = export(&missing, "text", ExportFormat::Txt).await;
    assert!(result.is_err());
}
