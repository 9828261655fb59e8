//! Extraction tests

mod common;

use common::{form_file, Date, BLACK_PIXEL, VALID_UUID};
use ouroboros_params::{
    extract, extract_with_config, BindConfig, Binder, ErrorKind, FieldError, FormFile, Params,
    SourceMap, Values,
};

// ============================================================================
// Records
// ============================================================================

#[derive(Params, Default)]
struct Paging {
    #[param(from = "query", name = "page")]
    page: Option<u32>,
    #[param(from = "query", name = "per_page", omitempty)]
    per_page: u32,
}

#[derive(Params, Default)]
struct Everything {
    #[param(from = "url", name = "id", rules = "uuid,required")]
    id: String,
    #[param(from = "query", name = "number")]
    number: i64,
    #[param(from = "query", ignore)]
    ignored: i32,
    #[param(from = "form", name = "flag")]
    flag: bool,
    #[param(from = "form", name = "nickname")]
    nickname: Option<String>,
    #[param(from = "form", name = "tags")]
    tags: Vec<String>,
    #[param(from = "form", name = "scores")]
    scores: Option<Vec<u8>>,
    #[param(from = "query", name = "since")]
    since: Option<Date>,
    #[param(from = "form", name = "note", omitempty)]
    note: String,
    #[param(embed)]
    paging: Paging,
    #[param(from = "file", name = "avatar")]
    avatar: Option<FormFile>,
}

fn sample() -> Everything {
    Everything {
        id: VALID_UUID.to_string(),
        number: -24,
        ignored: 42,
        flag: true,
        nickname: Some("ada".to_string()),
        tags: vec!["a b".to_string(), "c&d".to_string()],
        scores: Some(Vec::new()),
        since: Some(Date {
            year: 2017,
            month: 9,
            day: 10,
        }),
        note: String::new(),
        paging: Paging {
            page: Some(3),
            per_page: 0,
        },
        avatar: None,
    }
}

// ============================================================================
// Extraction
// ============================================================================

#[test]
fn test_extraction() {
    let record = sample();
    let (sources, files) = extract(Some(&record));

    let url = &sources["url"];
    assert_eq!(url.get("id"), VALID_UUID);

    let query = &sources["query"];
    assert_eq!(query.get("number"), "-24");
    assert_eq!(query.get("since"), "2017-09-10");
    assert_eq!(query.get("page"), "3");
    assert!(!query.contains("ignored"));
    assert!(!query.contains("per_page"));

    let form = &sources["form"];
    assert_eq!(form.get("flag"), "true");
    assert_eq!(form.get("nickname"), "ada");
    assert_eq!(form.get_all("tags").unwrap(), ["a b", "c&d"]);
    assert!(form.contains("scores"));
    assert!(form.get_all("scores").unwrap().is_empty());
    assert!(!form.contains("note"));

    assert!(!sources.contains_key("file"));
    assert!(files.is_empty());
}

#[test]
fn test_extraction_encodes() {
    let record = sample();
    let (sources, _) = extract(Some(&record));
    assert_eq!(
        sources["form"].encode(),
        "flag=true&nickname=ada&tags=a%20b&tags=c%26d"
    );
}

#[test]
fn test_extract_nothing() {
    let (sources, files) = extract::<Everything>(None);
    assert!(sources.is_empty());
    assert!(files.is_empty());
}

#[test]
fn test_absent_values_are_omitted() {
    let mut record = sample();
    record.nickname = None;
    record.scores = None;
    record.since = None;
    record.paging.page = None;

    let (sources, _) = extract(Some(&record));
    assert!(!sources["form"].contains("nickname"));
    assert!(!sources["form"].contains("scores"));
    assert!(!sources["query"].contains("since"));
    assert!(!sources["query"].contains("page"));
}

#[test]
fn test_omitempty_keeps_non_zero_values() {
    let mut record = sample();
    record.note = "hello".to_string();
    record.paging.per_page = 50;

    let (sources, _) = extract(Some(&record));
    assert_eq!(sources["form"].get("note"), "hello");
    assert_eq!(sources["query"].get("per_page"), "50");
}

#[test]
fn test_files_are_collected() {
    let mut record = sample();
    record.avatar = Some(form_file("avatar.png", BLACK_PIXEL));

    let (sources, files) = extract(Some(&record));
    assert!(!sources.contains_key("file"));
    assert_eq!(files.len(), 1);
    assert_eq!(files["avatar"].header.filename, "avatar.png");
    assert_eq!(files["avatar"].mime, "image/png");
}

#[test]
fn test_omitempty_float() {
    #[derive(Params, Default)]
    struct Price {
        #[param(from = "query", name = "amount", omitempty)]
        amount: f64,
        #[param(from = "query", name = "ratio", omitempty)]
        ratio: f32,
    }

    let record = Price::default();
    let (sources, _) = extract(Some(&record));
    assert!(!sources["query"].contains("amount"));
    assert!(!sources["query"].contains("ratio"));

    let record = Price {
        amount: 2.5,
        ratio: 0.0,
    };
    let (sources, _) = extract(Some(&record));
    assert_eq!(sources["query"].get("amount"), "2.5");
    assert!(!sources["query"].contains("ratio"));
}

#[test]
fn test_custom_file_source() {
    #[derive(Params)]
    struct Upload {
        #[param(from = "upload", name = "doc")]
        doc: String,
    }

    let record = Upload {
        doc: "text".to_string(),
    };

    let (sources, _) = extract(Some(&record));
    assert_eq!(sources["upload"].get("doc"), "text");

    // A value field under the file source has nothing to extract
    let config = BindConfig::new().file_source("upload");
    let (sources, files) = extract_with_config(Some(&record), &config);
    assert!(sources.is_empty());
    assert!(files.is_empty());
}

#[test]
fn test_field_without_source() {
    #[derive(Params)]
    struct Loose {
        #[param(name = "loose")]
        loose: u8,
    }

    let record = Loose { loose: 7 };
    let (sources, _) = extract(Some(&record));
    assert_eq!(sources["loose"].get("loose"), "7");
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_extract_then_parse() {
    let original = sample();
    let (sources, _) = extract(Some(&original));

    let mut copy = Everything::default();
    Binder::new(&mut copy).parse(&sources, None).unwrap();

    assert_eq!(copy.id, original.id);
    assert_eq!(copy.number, original.number);
    assert_eq!(copy.ignored, 0);
    assert_eq!(copy.flag, original.flag);
    assert_eq!(copy.nickname, original.nickname);
    assert_eq!(copy.tags, original.tags);
    assert_eq!(copy.scores, original.scores);
    assert_eq!(copy.since, original.since);
    assert_eq!(copy.note, original.note);
    assert_eq!(copy.paging.page, original.paging.page);
    assert_eq!(copy.paging.per_page, original.paging.per_page);
}

#[test]
fn test_extract_then_parse_through_urlencoding() {
    let original = sample();
    let (sources, _) = extract(Some(&original));

    let encoded: SourceMap = sources
        .iter()
        .map(|(name, values)| (name.clone(), Values::parse_urlencoded(&values.encode())))
        .collect();

    let mut copy = Everything::default();
    Binder::new(&mut copy).parse(&encoded, None).unwrap();
    assert_eq!(copy.tags, original.tags);
    // An empty sequence has no urlencoded form
    assert_eq!(copy.scores, None);
    assert_eq!(copy.since, original.since);
}

#[test]
fn test_sequence_of_optional_round_trip() {
    #[derive(Params, Default)]
    struct Readings {
        #[param(from = "query", name = "values")]
        values: Vec<Option<i32>>,
        #[param(from = "query", name = "labels")]
        labels: Vec<Option<String>>,
    }

    let original = Readings {
        values: vec![Some(1), None, Some(2)],
        labels: vec![Some("a".to_string()), None],
    };
    let (sources, _) = extract(Some(&original));
    assert_eq!(sources["query"].get_all("values").unwrap(), ["1", "", "2"]);
    assert_eq!(sources["query"].get_all("labels").unwrap(), ["a"]);

    let encoded: SourceMap = sources
        .iter()
        .map(|(name, values)| (name.clone(), Values::parse_urlencoded(&values.encode())))
        .collect();

    let mut copy = Readings::default();
    Binder::new(&mut copy).parse(&encoded, None).unwrap();
    assert_eq!(copy.values, original.values);
    assert_eq!(copy.labels, vec![Some("a".to_string())]);
}

// ============================================================================
// Error payloads
// ============================================================================

#[test]
fn test_field_error_serializes() {
    let err = FieldError::new("id", ErrorKind::InvalidUuid);
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "field": "id",
            "error_type": "invalid_uuid",
            "message": "not a valid uuid",
        })
    );
}
