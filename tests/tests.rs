//! Integration tests for `ner_semantics`.
//
// This suite verifies:
// - Library pipeline (cleaning stats, cleaned table, relationship table, error paths)
// - CLI behavior including export formats, option validation and lookup mode
//
// Notes:
// - CLI tests run the binary with a per-process working directory (no global CWD change).
// - Library tests pass absolute paths inside a temp dir.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value as Json;
use tempfile::tempdir;

use ner_semantics::{AnalysisOptions, Error, ExportFormat, PipelineConfig, run_pipeline};

// --------------------- helpers ---------------------

/// Three sentences in the shape of the public NER corpus: the id only on the first
/// row, `%` is removed by cleaning, sentence 3 is too short to count.
const CORPUS: &str = "Sentence #,Word,POS,Tag
Sentence: 1,Thousands,NNS,O
,of,IN,O
,demonstrators,NNS,O
,have,VBP,O
,%,NN,O
,marched,VBN,O
,through,IN,O
,London,NNP,B-geo
,.,.,O
Sentence: 2,Families,NNS,O
,of,IN,O
,soldiers,NNS,O
,killed,VBN,O
,in,IN,O
,the,DT,O
,conflict,NN,O
,joined,VBD,O
,the,DT,O
,protesters,NNS,O
,.,.,O
Sentence: 3,Go,VB,O
,!,.,O
";

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

/// Read file to string.
fn read_to_string<P: AsRef<Path>>(p: P) -> String {
    fs::read_to_string(p).unwrap()
}

/// Pipeline config with every path inside `dir`.
fn config(dir: &Path, input: &Path, fmt: ExportFormat) -> PipelineConfig {
    PipelineConfig {
        input_path: input.to_path_buf(),
        cleaned_output_path: dir.join("out").join("cleaned.csv"),
        semantic_output_path: dir.join("out").join("semantic.csv"),
        export_format: fmt,
        options: AnalysisOptions::default(),
        samples: 10,
    }
}

/// Run CLI successfully with a specific working directory.
fn run_cli_ok_in(dir: &std::path::Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("ner_semantics").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().success()
}

/// Run CLI expecting failure with a specific working directory.
fn run_cli_fail_in(dir: &std::path::Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("ner_semantics").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().failure()
}

/// Data lines (header skipped) of a relationship CSV, keyed by word.
fn semantic_line<'a>(content: &'a str, word: &str) -> Option<&'a str> {
    content
        .lines()
        .skip(1)
        .find(|l| l.starts_with(&format!("{word},")))
}

// --------------------- library tests ---------------------

#[test]
fn lib_pipeline_reports_cleaning_statistics() {
    let td = assert_fs::TempDir::new().unwrap();
    let input = write_file(&td, "ner.csv", CORPUS);

    let report = run_pipeline(&config(td.path(), &input, ExportFormat::Csv)).expect("pipeline");

    assert_eq!(report.cleaning.original_rows, 22);
    assert_eq!(report.cleaning.cleaned_rows, 21);
    assert_eq!(report.cleaning.removed_rows, 1);
    assert_eq!(report.cleaning.unique_words, 18);
    assert_eq!(report.cleaning.unique_pos_tags, 10);
    assert_eq!(report.aggregate.sentences, 3);
    assert_eq!(report.aggregate.qualifying_sentences, 2);
    // "go" and "!" only occur in the short sentence
    assert_eq!(report.relationships, 16);

    assert!(report.summary.contains("Original rows: 22"));
    assert!(report.summary.contains("Sentences: 3 (qualifying: 2)"));
    assert!(report.summary.contains("Sample semantic relationships:"));
}

#[test]
fn lib_pipeline_writes_cleaned_table() {
    let td = assert_fs::TempDir::new().unwrap();
    let input = write_file(&td, "ner.csv", CORPUS);
    let cfg = config(td.path(), &input, ExportFormat::Csv);
    run_pipeline(&cfg).expect("pipeline");

    let cleaned = read_to_string(&cfg.cleaned_output_path);
    let lines: Vec<&str> = cleaned.lines().collect();
    assert_eq!(lines.len(), 22, "header + 21 rows");
    assert_eq!(lines[0], "Sentence #,Word,POS,Tag");
    assert_eq!(lines[1], "Sentence: 1,thousands,NNS,O");
    assert_eq!(lines[7], ",london,NNP,B-geo");
    assert!(!cleaned.contains('%'));
}

#[test]
fn lib_pipeline_writes_relationship_table() {
    let td = assert_fs::TempDir::new().unwrap();
    let input = write_file(&td, "ner.csv", CORPUS);
    let cfg = config(td.path(), &input, ExportFormat::Csv);
    run_pipeline(&cfg).expect("pipeline");

    let semantic = read_to_string(&cfg.semantic_output_path);
    assert_eq!(
        semantic.lines().next(),
        Some("Word,Common_POS,Next_Words,Prev_Words,Related_Words")
    );

    assert_eq!(
        semantic_line(&semantic, "the"),
        Some(
            r#"the,DT,"conflict:1,protesters:1","in:1,joined:1","conflict:2,joined:2,the:2,.:1,in:1,killed:1,protesters:1,soldiers:1""#
        )
    );
    assert_eq!(
        semantic_line(&semantic, "of"),
        Some(
            r#"of,IN,"demonstrators:1,soldiers:1","families:1,thousands:1","demonstrators:1,families:1,have:1,in:1,killed:1,marched:1,soldiers:1,thousands:1""#
        )
    );
    // no previous word at sentence start, no next word at sentence end
    assert_eq!(
        semantic_line(&semantic, "thousands"),
        Some(r#"thousands,NNS,of:1,,"demonstrators:1,have:1,of:1""#)
    );
    assert!(semantic_line(&semantic, "go").is_none());

    // rows are ordered by word
    let words: Vec<&str> = semantic
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    let mut sorted = words.clone();
    sorted.sort();
    assert_eq!(words, sorted);
}

#[test]
fn lib_ranked_lists_respect_caps() {
    let td = assert_fs::TempDir::new().unwrap();
    // one long sentence where "x" is surrounded by many distinct words
    let mut corpus = String::from("Sentence #,Word,POS\nSentence: 1,x,NN\n");
    for i in 0..30 {
        corpus.push_str(&format!(",w{i:02},NN\n,x,NN\n"));
    }
    let input = write_file(&td, "long.csv", &corpus);
    let mut cfg = config(td.path(), &input, ExportFormat::Json);
    cfg.semantic_output_path = td.path().join("semantic.json");
    run_pipeline(&cfg).expect("pipeline");

    let v: Json = serde_json::from_str(&read_to_string(&cfg.semantic_output_path)).unwrap();
    for row in v.as_array().unwrap() {
        assert!(row["Next_Words"].as_array().unwrap().len() <= 5);
        assert!(row["Prev_Words"].as_array().unwrap().len() <= 5);
        assert!(row["Related_Words"].as_array().unwrap().len() <= 10);
    }
    let x = v
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["Word"] == "x")
        .unwrap();
    assert_eq!(x["Next_Words"].as_array().unwrap().len(), 5);
    assert_eq!(x["Related_Words"].as_array().unwrap().len(), 10);
    assert_eq!(x["Related_Words"][0]["word"], "x");
}

#[test]
fn lib_rerun_is_byte_identical_and_parallel_matches() {
    let td = assert_fs::TempDir::new().unwrap();
    let input = write_file(&td, "ner.csv", CORPUS);

    let cfg = config(td.path(), &input, ExportFormat::Csv);
    run_pipeline(&cfg).expect("first run");
    let first = fs::read(&cfg.semantic_output_path).unwrap();
    run_pipeline(&cfg).expect("second run");
    let second = fs::read(&cfg.semantic_output_path).unwrap();
    assert_eq!(first, second);

    let mut par = config(td.path(), &input, ExportFormat::Csv);
    par.semantic_output_path = td.path().join("parallel.csv");
    par.options.parallel = true;
    run_pipeline(&par).expect("parallel run");
    assert_eq!(first, fs::read(&par.semantic_output_path).unwrap());
}

#[test]
fn lib_no_qualifying_sentences_writes_header_only() {
    let td = assert_fs::TempDir::new().unwrap();
    let input = write_file(
        &td,
        "short.csv",
        "Sentence #,Word,POS,Tag\nSentence: 1,Go,VB,O\nSentence: 2,Stop,VB,O\n,now,RB,O\n",
    );
    let cfg = config(td.path(), &input, ExportFormat::Csv);
    let report = run_pipeline(&cfg).expect("empty result is not an error");
    assert_eq!(report.relationships, 0);
    assert_eq!(
        read_to_string(&cfg.semantic_output_path),
        "Word,Common_POS,Next_Words,Prev_Words,Related_Words\n"
    );
}

#[test]
fn lib_missing_input_aborts_without_output() {
    let td = tempdir().unwrap();
    let missing = td.path().join("nope.csv");
    let cfg = config(td.path(), &missing, ExportFormat::Csv);
    let err = run_pipeline(&cfg).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "unexpected error: {err}");
    assert!(!cfg.cleaned_output_path.exists());
    assert!(!cfg.semantic_output_path.exists());
}

#[test]
fn lib_missing_column_aborts() {
    let td = assert_fs::TempDir::new().unwrap();
    let input = write_file(&td, "bad.csv", "Sentence #,Token,POS\n1,a,DT\n");
    let err = run_pipeline(&config(td.path(), &input, ExportFormat::Csv)).unwrap_err();
    assert!(err.to_string().contains("`Word`"), "unexpected error: {err}");
}

#[test]
fn lib_invalid_options_are_rejected_before_reading() {
    let td = tempdir().unwrap();
    let mut cfg = config(td.path(), &td.path().join("never-read.csv"), ExportFormat::Csv);
    cfg.options.max_related = 0;
    let err = run_pipeline(&cfg).unwrap_err();
    assert!(matches!(err, Error::InvalidOption(_)));
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_basic_run_csv() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);

    run_cli_ok_in(
        td.path(),
        &[
            "--input",
            "ner.csv",
            "--cleaned-output",
            "out/cleaned.csv",
            "--semantic-output",
            "out/semantic.csv",
        ],
    )
    .stdout(
        predicate::str::contains("Cleaned rows: 21")
            .and(predicate::str::contains("Unique POS tags: 10"))
            .and(predicate::str::contains("Sample semantic relationships:")),
    );

    let semantic = read_to_string(td.path().join("out/semantic.csv"));
    assert!(semantic_line(&semantic, "london").is_some());
    assert!(td.path().join("out/cleaned.csv").exists());
}

#[test]
fn cli_export_json_and_window() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);

    run_cli_ok_in(
        td.path(),
        &[
            "--input",
            "ner.csv",
            "--cleaned-output",
            "cleaned.csv",
            "--semantic-output",
            "semantic.json",
            "--export-format",
            "json",
            "--window",
            "1",
            "--parallel",
        ],
    );

    let v: Json = serde_json::from_str(&read_to_string(td.path().join("semantic.json"))).unwrap();
    let london = v
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["Word"] == "london")
        .expect("london row");
    assert_eq!(london["Common_POS"], "NNP");
    // window of 1: only the direct neighbours
    let related: Vec<&str> = london["Related_Words"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["word"].as_str().unwrap())
        .collect();
    assert_eq!(related, vec![".", "through"]);
}

#[test]
fn cli_export_tsv() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);

    run_cli_ok_in(
        td.path(),
        &[
            "--input",
            "ner.csv",
            "--cleaned-output",
            "cleaned.csv",
            "--semantic-output",
            "semantic.tsv",
            "--export-format",
            "tsv",
        ],
    );

    let tsv = read_to_string(td.path().join("semantic.tsv"));
    assert!(tsv.starts_with("Word\tCommon_POS\tNext_Words\tPrev_Words\tRelated_Words\n"));
    assert!(tsv.contains("\nof\tIN\tdemonstrators:1,soldiers:1\tfamilies:1,thousands:1\t"));
}

#[test]
fn cli_nonexistent_input_fails() {
    let td = tempdir().unwrap();
    run_cli_fail_in(
        td.path(),
        &[
            "--input",
            "does_not_exist_here.csv",
            "--cleaned-output",
            "cleaned.csv",
            "--semantic-output",
            "semantic.csv",
        ],
    )
    .stderr(predicate::str::contains("does_not_exist_here.csv"));
    assert!(!td.path().join("semantic.csv").exists());
}

#[test]
fn cli_zero_window_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);
    run_cli_fail_in(td.path(), &["--input", "ner.csv", "--window", "0"])
        .stderr(predicate::str::contains("window"));
}

#[test]
fn cli_unknown_export_format_fails() {
    let td = tempdir().unwrap();
    run_cli_fail_in(td.path(), &["--export-format", "xml"]);
}

#[test]
fn cli_query_reads_existing_table() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);
    run_cli_ok_in(
        td.path(),
        &[
            "--input",
            "ner.csv",
            "--cleaned-output",
            "cleaned.csv",
            "--semantic-output",
            "semantic.csv",
        ],
    );

    run_cli_ok_in(
        td.path(),
        &[
            "--semantic-output",
            "semantic.csv",
            "--query",
            "The",
            "--query",
            "unicorn",
        ],
    )
    .stdout(
        predicate::str::contains("the (DT)")
            .and(predicate::str::contains("next:    conflict:1,protesters:1"))
            .and(predicate::str::contains("unicorn: no entry")),
    );
}

#[test]
fn cli_query_without_table_fails() {
    let td = tempdir().unwrap();
    run_cli_fail_in(
        td.path(),
        &["--semantic-output", "missing.csv", "--query", "london"],
    )
    .stderr(predicate::str::contains("missing.csv"));
}

#[test]
fn cli_query_uses_the_format_the_table_was_written_in() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);
    let written = [
        "--input",
        "ner.csv",
        "--cleaned-output",
        "cleaned.csv",
        "--semantic-output",
        "semantic.csv",
        "--export-format",
        "json",
    ];
    run_cli_ok_in(td.path(), &written);
    let v: Json = serde_json::from_str(&read_to_string(td.path().join("semantic.csv"))).unwrap();
    assert!(v.is_array());

    run_cli_ok_in(
        td.path(),
        &[
            "--semantic-output",
            "semantic.csv",
            "--export-format",
            "json",
            "--query",
            "the",
        ],
    )
    .stdout(predicate::str::contains("the (DT)"));

    // without the flag the .csv extension says CSV
    run_cli_fail_in(td.path(), &["--semantic-output", "semantic.csv", "--query", "the"])
        .stderr(predicate::str::contains("Word"));
}

#[test]
fn cli_format_defaults_to_the_extension() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);
    run_cli_ok_in(
        td.path(),
        &[
            "--input",
            "ner.csv",
            "--cleaned-output",
            "cleaned.csv",
            "--semantic-output",
            "semantic.tsv",
        ],
    );
    let tsv = read_to_string(td.path().join("semantic.tsv"));
    assert!(tsv.starts_with("Word\tCommon_POS\t"));

    run_cli_ok_in(
        td.path(),
        &["--semantic-output", "semantic.tsv", "--query", "london"],
    )
    .stdout(predicate::str::contains("london (NNP)"));
}

#[test]
fn cli_predict_uses_multi_word_context() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);
    run_cli_ok_in(
        td.path(),
        &[
            "--input",
            "ner.csv",
            "--cleaned-output",
            "cleaned.csv",
            "--semantic-output",
            "semantic.csv",
        ],
    );

    run_cli_ok_in(
        td.path(),
        &[
            "--cleaned-output",
            "cleaned.csv",
            "--semantic-output",
            "semantic.csv",
            "--predict",
            "Families of",
        ],
    )
    .stdout(
        // "families of" was followed by soldiers; "of" alone also by demonstrators
        predicate::str::contains("  words:   soldiers demonstrators ")
            .and(predicate::str::contains("  phrase:  families of soldiers killed in\n"))
            .and(predicate::str::contains(
                "  phrase:  families of demonstrators have marched\n",
            )),
    );
}

#[test]
fn cli_tags_sentences_with_the_trained_chain() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);
    run_cli_ok_in(
        td.path(),
        &[
            "--input",
            "ner.csv",
            "--tag",
            "Families of soldiers",
            "--tag",
            "London .",
        ],
    )
    .stdout(
        predicate::str::contains("families/NNS of/IN soldiers/NNS\n")
            .and(predicate::str::contains("london/NNP ./.\n")),
    );
}

#[test]
fn cli_evaluates_taggers_per_fold() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "ner.csv", CORPUS);
    run_cli_ok_in(
        td.path(),
        &[
            "--input",
            "ner.csv",
            "--evaluate-taggers",
            "--fold-size",
            "1",
            "--parallel",
        ],
    )
    .stdout(
        predicate::str::contains("Fold 3/3: training on 2 sentences, testing on 1")
            .and(predicate::str::contains("Average over 3 folds:"))
            .and(predicate::str::contains("Quadgram:")),
    );

    run_cli_fail_in(
        td.path(),
        &["--input", "ner.csv", "--evaluate-taggers", "--fold-size", "0"],
    )
    .stderr(predicate::str::contains("fold size"));
}
