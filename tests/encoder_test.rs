mod common;

use common::{assets, multichoice, no_assets, no_variables, question, variables};
use exam_quiz_export::error::EncodeError;
use exam_quiz_export::xml::Element;
use exam_quiz_export::{EncoderOptions, Question, QuestionEncoder};
use pretty_assertions::assert_eq;
use serde_json::json;

fn encode(q: &Question) -> Result<Element, EncodeError> {
    let store = no_assets();
    let vars = no_variables();
    QuestionEncoder::new(&store, &vars, EncoderOptions::default()).encode(q)
}

fn text_of(element: &Element, tag: &str) -> String {
    element
        .find(tag)
        .unwrap_or_else(|| panic!("缺少 <{}>", tag))
        .text_content()
}

fn nested_text(element: &Element, tag: &str) -> String {
    text_of(element.find(tag).unwrap(), "text")
}

fn fractions(element: &Element) -> Vec<&str> {
    element
        .find_all("answer")
        .map(|a| a.attribute("fraction").unwrap())
        .collect()
}

#[test]
fn base_block_comes_first_in_fixed_order() {
    let element = encode(&multichoice("ABCD0001", &["a"], &["b"])).unwrap();

    assert_eq!(element.tag, "question");
    assert_eq!(element.attribute("type"), Some("multichoice"));
    assert_eq!(
        element.child_tags()[..7].to_vec(),
        vec![
            "name",
            "questiontext",
            "generalfeedback",
            "defaultgrade",
            "penalty",
            "hidden",
            "idnumber"
        ]
    );
    assert_eq!(nested_text(&element, "name"), "ABCD0001");
    assert_eq!(nested_text(&element, "questiontext"), "Frage ABCD0001");
    assert_eq!(element.find("questiontext").unwrap().attribute("format"), Some("html"));
    assert_eq!(text_of(&element, "defaultgrade"), "2");
    assert_eq!(text_of(&element, "penalty"), "0.3333333");
    assert_eq!(text_of(&element, "hidden"), "0");
}

#[test]
fn multichoice_with_two_correct_answers_splits_weight() {
    let element = encode(&multichoice("ABCD0001", &["a", "b"], &["c"])).unwrap();

    assert_eq!(text_of(&element, "single"), "false");
    assert_eq!(fractions(&element), ["50.000000", "50.000000", "-50.000000"]);
}

#[test]
fn multichoice_with_one_correct_answer_is_single() {
    let element = encode(&multichoice("ABCD0001", &["a"], &["b", "c"])).unwrap();

    assert_eq!(text_of(&element, "single"), "true");
    assert_eq!(fractions(&element), ["100.000000", "0", "0"]);
    assert_eq!(text_of(&element, "answernumbering"), "abc");
}

#[test]
fn multichoice_feedback_block() {
    let element = encode(&multichoice("ABCD0001", &["a"], &[])).unwrap();

    assert_eq!(nested_text(&element, "correctfeedback"), "Die Antwort ist richtig.");
    assert_eq!(
        nested_text(&element, "partiallycorrectfeedback"),
        "Die Antwort ist teilweise richtig."
    );
    assert_eq!(nested_text(&element, "incorrectfeedback"), "Die Antwort ist falsch.");
}

#[test]
fn multichoice_without_correct_answer_is_malformed() {
    let err = encode(&multichoice("ABCD0001", &[], &["b"])).unwrap_err();

    assert!(matches!(err, EncodeError::InvalidValue { field: "correct_answers", .. }));
}

#[test]
fn shuffle_option_is_threaded_through() {
    let store = no_assets();
    let vars = no_variables();
    let options = EncoderOptions {
        shuffle_answers: false,
    };
    let encoder = QuestionEncoder::new(&store, &vars, options);

    let element = encoder.encode(&multichoice("ABCD0001", &["a"], &[])).unwrap();

    assert_eq!(text_of(&element, "shuffleanswers"), "false");
}

#[test]
fn numerical_answers_carry_tolerance() {
    let q = question(
        "ABCD0002",
        "numerical",
        json!({ "correct_answers": [42, "41.5"], "tolerance": 0.5 }),
    );

    let element = encode(&q).unwrap();

    let answers: Vec<&Element> = element.find_all("answer").collect();
    assert_eq!(answers.len(), 2);
    assert_eq!(text_of(answers[0], "text"), "42");
    assert_eq!(text_of(answers[1], "text"), "41.5");
    assert_eq!(text_of(answers[0], "tolerance"), "0.5");
    assert_eq!(answers[0].attribute("format"), Some("moodle_auto_format"));
    assert_eq!(text_of(&element, "unitpenalty"), "0.1000000");
    assert_eq!(text_of(&element, "showunits"), "3");
}

#[test]
fn numerical_tolerance_defaults_to_zero() {
    let q = question("ABCD0002", "numerical", json!({ "correct_answers": [1] }));

    let element = encode(&q).unwrap();

    assert_eq!(text_of(element.find("answer").unwrap(), "tolerance"), "0");
}

#[test]
fn shortanswer_usecase_flag() {
    let q = question(
        "ABCD0003",
        "shortanswer",
        json!({ "correct_answers": ["Bern"], "usecase": 1 }),
    );

    let element = encode(&q).unwrap();

    assert_eq!(text_of(&element, "usecase"), "1");
    assert_eq!(text_of(element.find("answer").unwrap(), "text"), "Bern");
}

#[test]
fn essay_attachment_settings() {
    let q = question("ABCD0004", "essay", json!({ "answer_files": [2, 1] }));

    let element = encode(&q).unwrap();

    assert_eq!(
        element.child_tags()[7..].to_vec(),
        vec![
            "responseformat",
            "responserequired",
            "responsefieldlines",
            "attachments",
            "attachmentsrequired",
            "filetypeslist",
            "graderinfo",
            "responsetemplate"
        ]
    );
    assert_eq!(text_of(&element, "responseformat"), "noinline");
    assert_eq!(text_of(&element, "attachments"), "2");
    assert_eq!(text_of(&element, "attachmentsrequired"), "1");
}

#[test]
fn matching_distractors_have_empty_prompt() {
    let q = question(
        "ABCD0005",
        "matching",
        json!({
            "correct_answers": { "Hund": "bellt", "Katze": "miaut" },
            "false_answers": ["quakt"]
        }),
    );

    let element = encode(&q).unwrap();

    let subquestions: Vec<&Element> = element.find_all("subquestion").collect();
    assert_eq!(subquestions.len(), 3);
    assert_eq!(text_of(subquestions[0], "text"), "Hund");
    assert_eq!(nested_text(subquestions[0], "answer"), "bellt");
    assert_eq!(text_of(subquestions[2], "text"), "");
    assert_eq!(nested_text(subquestions[2], "answer"), "quakt");
}

#[test]
fn gapselect_inserts_gap_keys_and_groups_options() {
    let q = question(
        "ABCD0006",
        "gapselect",
        json!({
            "question": "Der Himmel ist [[blau]] und Gras ist [[grün]].",
            "correct_answers": { "1": ["blau"], "2": ["grün"] },
            "false_answers": { "1": ["rot"], "2": ["lila", "grau"] }
        }),
    );

    let element = encode(&q).unwrap();

    assert_eq!(
        nested_text(&element, "questiontext"),
        "Der Himmel ist [[1]] und Gras ist [[2]]."
    );
    let options: Vec<(String, String)> = element
        .find_all("selectoption")
        .map(|o| (text_of(o, "text"), text_of(o, "group")))
        .collect();
    let expected: Vec<(String, String)> = [
        ("blau", "1"),
        ("grün", "2"),
        ("rot", "1"),
        ("lila", "2"),
        ("grau", "2"),
    ]
    .iter()
    .map(|(t, g)| (t.to_string(), g.to_string()))
    .collect();
    assert_eq!(options, expected);
}

#[test]
fn ddimageortext_embeds_background_and_drops() {
    let store = assets(&[("karte.png", b"abc")]);
    let vars = no_variables();
    let encoder = QuestionEncoder::new(&store, &vars, EncoderOptions::default());
    let q = question(
        "ABCD0007",
        "ddimageortext",
        json!({
            "img_files": ["karte.png"],
            "correct_answers": ["Berlin", "Paris"],
            "drops": { "1": [10, 20], "2": [30.5, 40] }
        }),
    );

    let element = encoder.encode(&q).unwrap();

    let file = element.find("file").unwrap();
    assert_eq!(file.attribute("name"), Some("karte.png"));
    assert_eq!(file.attribute("encoding"), Some("base64"));
    assert_eq!(file.text_content(), "YWJj");

    let drags: Vec<(String, String)> = element
        .find_all("drag")
        .map(|d| (text_of(d, "no"), text_of(d, "text")))
        .collect();
    assert_eq!(
        drags,
        [
            ("1".to_string(), "Berlin".to_string()),
            ("2".to_string(), "Paris".to_string())
        ]
    );

    let drops: Vec<&Element> = element.find_all("drop").collect();
    assert_eq!(drops.len(), 2);
    assert_eq!(text_of(drops[1], "choice"), "2");
    assert_eq!(text_of(drops[1], "xleft"), "30.5");
    assert_eq!(text_of(drops[1], "ytop"), "40");
}

#[test]
fn calculated_answer_and_datasets() {
    let store = no_assets();
    let vars = variables("ABCD0008", &[("a", &[1.5, 2.25]), ("b", &[3.0, 4.0])]);
    let encoder = QuestionEncoder::new(&store, &vars, EncoderOptions::default());
    let q = question(
        "ABCD0008",
        "calculated",
        json!({
            "correct_answers": ["{a} * {b}"],
            "tolerance": [0.01, "nominal", 2],
            "vars": ["a", "b"]
        }),
    );

    let element = encoder.encode(&q).unwrap();

    let answer = element.find("answer").unwrap();
    assert_eq!(answer.attribute("fraction"), Some("100"));
    assert_eq!(text_of(answer, "text"), "{a} * {b}");
    assert_eq!(text_of(answer, "tolerance"), "0.01");
    assert_eq!(text_of(answer, "tolerancetype"), "2");
    assert_eq!(text_of(answer, "correctanswerlength"), "2");

    let definitions: Vec<&Element> = element
        .find("dataset_definitions")
        .unwrap()
        .find_all("dataset_definition")
        .collect();
    assert_eq!(definitions.len(), 2);
    assert_eq!(nested_text(definitions[0], "name"), "a");
    assert_eq!(nested_text(definitions[0], "decimals"), "2");
    assert_eq!(nested_text(definitions[0], "minimum"), "1");
    assert_eq!(nested_text(definitions[0], "maximum"), "3");
    assert_eq!(nested_text(definitions[1], "decimals"), "0");
}

#[test]
fn calculated_without_variables_is_malformed() {
    let q = question(
        "ABCD0008",
        "calculated",
        json!({
            "correct_answers": ["{a}"],
            "tolerance": [0.01, "relative", 2],
            "vars": ["a"]
        }),
    );

    let err = encode(&q).unwrap_err();

    assert!(matches!(err, EncodeError::Provider(_)));
}

#[test]
fn unsupported_type_is_malformed() {
    let q = question("ABCD0009", "truefalse", json!({}));

    let err = encode(&q).unwrap_err();

    assert!(matches!(err, EncodeError::UnsupportedType { moodle_type } if moodle_type == "truefalse"));
}

#[test]
fn missing_variant_field_is_malformed() {
    let q = question("ABCD0010", "shortanswer", json!({}));

    let err = encode(&q).unwrap_err();

    assert!(matches!(err, EncodeError::InvalidFields { .. }));
}

#[test]
fn multichoice_correct_fractions_sum_to_hundred() {
    for n in 1..=7usize {
        let correct: Vec<String> = (0..n).map(|i| format!("r{}", i)).collect();
        let correct: Vec<&str> = correct.iter().map(String::as_str).collect();
        let element = encode(&multichoice("ABCD0001", &correct, &["f"])).unwrap();

        let values: Vec<f64> = fractions(&element)
            .iter()
            .map(|f| f.parse().unwrap())
            .collect();
        let sum: f64 = values[..n].iter().sum();
        assert!((sum - 100.0).abs() < 1e-4, "n = {}: {}", n, sum);

        let expected_false = if n == 1 { 0.0 } else { -100.0 / n as f64 };
        assert!((values[n] - expected_false).abs() < 1e-4);
    }
}

const BILD_URI: &str = "data:image/png;base64,YWJj";

fn encode_with_bild(q: &Question) -> Element {
    let store = assets(&[("bild.png", b"abc")]);
    let vars = no_variables();
    QuestionEncoder::new(&store, &vars, EncoderOptions::default())
        .encode(q)
        .unwrap()
}

#[test]
fn multichoice_answer_image_is_embedded() {
    let q = question(
        "IMGA0001",
        "multichoice",
        json!({
            "img_files": ["bild.png"],
            "correct_answers": ["[[file1]]"],
            "false_answers": ["kein Bild"]
        }),
    );

    let element = encode_with_bild(&q);

    let answers: Vec<String> = element
        .find_all("answer")
        .map(|a| text_of(a, "text"))
        .collect();
    assert!(answers[0].contains(BILD_URI), "{}", answers[0]);
    assert!(!answers[0].contains("[[file1]]"));
    assert_eq!(answers[1], "kein Bild");
}

#[test]
fn matching_prompt_and_answer_images_are_embedded() {
    let q = question(
        "IMGA0002",
        "matching",
        json!({
            "img_files": ["bild.png"],
            "correct_answers": { "[[file1]] Tier": "Hund [[file1]]" },
            "false_answers": ["[[file1]]"]
        }),
    );

    let element = encode_with_bild(&q);

    let subquestions: Vec<&Element> = element.find_all("subquestion").collect();
    assert_eq!(subquestions.len(), 2);
    assert!(text_of(subquestions[0], "text").contains(BILD_URI));
    assert!(nested_text(subquestions[0], "answer").contains(BILD_URI));
    assert!(nested_text(subquestions[1], "answer").contains(BILD_URI));
}

#[test]
fn gapselect_option_image_is_embedded() {
    let q = question(
        "IMGA0003",
        "gapselect",
        json!({
            "img_files": ["bild.png"],
            "question": "Tier: [[Hund]]",
            "correct_answers": { "1": ["Hund"] },
            "false_answers": { "1": ["[[file1]]"] }
        }),
    );

    let element = encode_with_bild(&q);

    let options: Vec<String> = element
        .find_all("selectoption")
        .map(|o| text_of(o, "text"))
        .collect();
    assert_eq!(options[0], "Hund");
    assert!(options[1].contains(BILD_URI), "{}", options[1]);
}

#[test]
fn ddimageortext_drag_image_is_embedded() {
    let q = question(
        "IMGA0004",
        "ddimageortext",
        json!({
            "img_files": ["bild.png"],
            "correct_answers": ["[[file1]]", "Paris"],
            "drops": { "1": [10, 20], "2": [30, 40] }
        }),
    );

    let element = encode_with_bild(&q);

    let drags: Vec<String> = element
        .find_all("drag")
        .map(|d| text_of(d, "text"))
        .collect();
    assert!(drags[0].contains(BILD_URI), "{}", drags[0]);
    assert_eq!(drags[1], "Paris");
}
