use research_core::{InsightRecord, RecordSource};
use research_service::{export_csv, save_csv, to_csv_bytes};

fn records() -> Vec<InsightRecord> {
    vec![
        InsightRecord {
            source: RecordSource::Post,
            community: "startups".to_string(),
            text: "I hate invoicing, \"seriously\"".to_string(),
            score: 42,
            url: "https://www.reddit.com/r/startups/comments/a/".to_string(),
            sentiment: Some(-0.8),
        },
        InsightRecord {
            source: RecordSource::Comment,
            community: "startups".to_string(),
            text: "Same problem\non two lines".to_string(),
            score: -3,
            url: "https://www.reddit.com/r/startups/comments/a/".to_string(),
            sentiment: None,
        },
    ]
}

fn read_back(bytes: &[u8]) -> Vec<InsightRecord> {
    csv::Reader::from_reader(bytes)
        .deserialize()
        .collect::<Result<Vec<InsightRecord>, _>>()
        .unwrap()
}

#[test]
fn test_csv_round_trip() {
    let bytes = to_csv_bytes(&records()).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.starts_with("source,community,text,score,url,sentiment\n"));
    assert!(text.contains("post,startups,"));
    assert_eq!(read_back(&bytes), records());
}

#[test]
fn test_empty_export_has_header() {
    let bytes = to_csv_bytes(&[]).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "source,community,text,score,url,sentiment\n"
    );
}

#[test]
fn test_save_csv_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reddit_insights.csv");

    let written = save_csv(&records(), &path).unwrap();
    assert_eq!(written, path);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(read_back(&bytes), records());
}

#[test]
fn test_save_csv_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    assert!(matches!(
        save_csv(&records(), &path),
        Err(research_core::CoreError::Io(_))
    ));
}

#[tokio::test]
async fn test_async_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");

    let written = export_csv(records(), path.clone()).await.unwrap();
    assert_eq!(written, path);
    assert_eq!(read_back(&std::fs::read(&path).unwrap()), records());
}
