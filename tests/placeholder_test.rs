mod common;

use common::{assets, no_assets, question};
use exam_quiz_export::error::EncodeError;
use exam_quiz_export::services::placeholder::{insert_gap_indices, resolve_tables};
use exam_quiz_export::PlaceholderResolver;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use serde_json::json;

fn gaps(entries: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn table_token_becomes_bordered_table() {
    let q = question(
        "ABCD0001",
        "essay",
        json!({ "tables": { "tbl1": [["x", "y"], [1, 2.5]] } }),
    );

    let text = resolve_tables("Siehe [[tbl1]]:", &q).unwrap();

    let style = "border-width: 1px; border-style: solid;";
    let expected = format!(
        concat!(
            "Siehe <table><thead><tr>",
            "<th scope=\"col\" style=\"{s}\">x</th><th scope=\"col\" style=\"{s}\">y</th>",
            "</tr></thead><tbody><tr>",
            "<td style=\"{s}\">1</td><td style=\"{s}\">2.5</td>",
            "</tr></tbody></table>:"
        ),
        s = style
    );
    assert_eq!(text, expected);
}

#[test]
fn distinct_table_tokens_resolve_independently() {
    let q = question(
        "ABCD0001",
        "essay",
        json!({ "tables": { "tbl1": [["a"]], "tbl2": [["b"]] } }),
    );

    let text = resolve_tables("[[tbl2]] [[tbl1]]", &q).unwrap();

    assert!(text.find(">b</th>").unwrap() < text.find(">a</th>").unwrap());
}

#[test]
fn missing_table_is_an_error() {
    let q = question("ABCD0001", "essay", json!({}));

    let err = resolve_tables("[[tbl3]]", &q).unwrap_err();

    assert!(matches!(err, EncodeError::UnresolvedTable { token } if token == "tbl3"));
}

#[test]
fn image_token_becomes_data_uri() {
    let store = assets(&[("pic.PNG", b"abc"), ("photo.jpg", b"xyz")]);
    let resolver = PlaceholderResolver::new(&store);
    let q = question(
        "ABCD0001",
        "essay",
        json!({ "img_files": ["pic.PNG", "photo.jpg"] }),
    );

    let text = resolver.resolve_images("[[file1]] und [[file2]]", &q).unwrap();

    assert_eq!(
        text,
        r#"<img src="data:image/png;base64,YWJj" alt="" /> und <img src="data:image/jpeg;base64,eHl6" alt="" />"#
    );
}

#[test]
fn image_index_out_of_range_is_an_error() {
    let store = assets(&[("pic.png", b"abc")]);
    let resolver = PlaceholderResolver::new(&store);
    let q = question("ABCD0001", "essay", json!({ "img_files": ["pic.png"] }));

    let err = resolver.resolve_images("[[file2]]", &q).unwrap_err();

    assert!(matches!(
        err,
        EncodeError::UnresolvedImage {
            index: 2,
            available: 1
        }
    ));
}

#[test]
fn image_without_extension_is_an_error() {
    let store = assets(&[("pic", b"abc")]);
    let resolver = PlaceholderResolver::new(&store);
    let q = question("ABCD0001", "essay", json!({ "img_files": ["pic"] }));

    let err = resolver.resolve_images("[[file1]]", &q).unwrap_err();

    assert!(matches!(err, EncodeError::UnknownMediaType { .. }));
}

#[test]
fn missing_asset_is_an_error() {
    let store = no_assets();
    let resolver = PlaceholderResolver::new(&store);
    let q = question("ABCD0001", "essay", json!({ "img_files": ["pic.png"] }));

    let err = resolver.resolve_images("[[file1]]", &q).unwrap_err();

    assert!(matches!(err, EncodeError::Asset(_)));
}

#[test]
fn text_without_tokens_is_unchanged() {
    let store = no_assets();
    let resolver = PlaceholderResolver::new(&store);
    let q = question("ABCD0001", "essay", json!({}));

    let text = resolver.resolve("Keine Platzhalter [hier]", &q).unwrap();

    assert_eq!(text, "Keine Platzhalter [hier]");
}

#[test]
fn gap_literals_become_gap_keys() {
    let correct = gaps(&[("1", &["rot"]), ("2", &["blau"])]);

    let text = insert_gap_indices("Himmel [[blau]], Blut [[rot]], Sonne [[gelb]]", &correct).unwrap();

    assert_eq!(text, "Himmel [[2]], Blut [[1]], Sonne [[gelb]]");
}

#[test]
fn gap_substitution_is_single_pass() {
    // "2" 替换为 [[1]] 后，新出现的 [[2]] 不会再被替换
    let correct = gaps(&[("1", &["2"]), ("2", &["x"])]);

    let text = insert_gap_indices("[[2]] [[x]]", &correct).unwrap();

    assert_eq!(text, "[[1]] [[2]]");
}

#[test]
fn duplicate_gap_literal_uses_first_entry() {
    let correct = gaps(&[("1", &["a"]), ("2", &["a"])]);

    let text = insert_gap_indices("[[a]] [[a]]", &correct).unwrap();

    assert_eq!(text, "[[1]] [[1]]");
}

#[test]
fn resolving_twice_changes_nothing() {
    let store = assets(&[("pic.png", b"abc")]);
    let resolver = PlaceholderResolver::new(&store);
    let q = question(
        "ABCD0001",
        "essay",
        json!({ "img_files": ["pic.png"], "tables": { "tbl1": [["a"], ["b"]] } }),
    );

    let once = resolver.resolve("[[tbl1]] [[file1]]", &q).unwrap();
    let twice = resolver.resolve(&once, &q).unwrap();

    assert_eq!(once, twice);
}
