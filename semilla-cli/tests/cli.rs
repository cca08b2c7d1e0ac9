use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("fixture to be written");
    path
}

const MBOX: &str = "\
From ann@example.org Fri Mar  1 10:00:00 2024
Subject: Older
Date: Fri, 1 Mar 2024 10:00:00 +0000
From: ann@example.org
Message-ID: <older@example.org>
Tags: notes

First body.
From bob@example.org Sat Mar  2 10:00:00 2024
Subject: Re: Older
Date: Sat, 2 Mar 2024 10:00:00 +0000
From: bob@example.org
Message-ID: <newer@example.org>
Tags: replies

Second <body>.
From nobody Sun Mar  3 10:00:00 2024
Subject: No author

Dropped.
";

#[test]
fn tokens_as_json() {
    let dir = TempDir::new().unwrap();
    let source = fixture(&dir, "main.cc", "int main;\n");
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("tokens").arg(&source).arg("--chunk").arg("1");

    cmd.assert().success().stdout(
        predicate::str::contains(r#""text": "main""#)
            .and(predicate::str::contains(r#""kind": "newline""#)),
    );
}

#[test]
fn tokens_as_annotation() {
    let dir = TempDir::new().unwrap();
    let source = fixture(&dir, "notes.txt", "a&b");
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("tokens")
        .arg(&source)
        .arg("--lang")
        .arg("xml-escape")
        .arg("--format")
        .arg("annotate");

    cmd.assert().success().stdout(predicate::str::contains(
        r#"<ampEscape text="[1,2]">&amp;</ampEscape>"#,
    ));
}

#[test]
fn unknown_file_type_needs_a_language() {
    let dir = TempDir::new().unwrap();
    let source = fixture(&dir, "README", "hello\n");
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("tokens").arg(&source);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot tell the language"));
}

#[test]
fn highlight_wraps_spans_in_pre() {
    let dir = TempDir::new().unwrap();
    let source = fixture(&dir, "loop.c", "while (x < 1) {}\n");
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("highlight").arg(&source);

    cmd.assert().success().stdout(
        predicate::str::starts_with("<pre>")
            .and(predicate::str::contains(r#"<span class="keyword">while</span>"#))
            .and(predicate::str::contains("&lt;"))
            .and(predicate::str::ends_with("</pre>\n")),
    );
}

#[test]
fn highlight_honours_the_config_file() {
    let dir = TempDir::new().unwrap();
    let source = fixture(&dir, "loop.c", "while (x) {}\n");
    let config = fixture(&dir, "semilla.toml", "[highlight]\nwrap_pre = false\n");
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("highlight").arg(&source).arg("--config").arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(r#"<span class="keyword">"#));
}

#[test]
fn check_links_classifies_hrefs() {
    let dir = TempDir::new().unwrap();
    fixture(&dir, "present.html", "");
    let page = fixture(
        &dir,
        "index.html",
        r#"<a href="present.html">p</a><a href="gone.html">g</a>"#,
    );
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("highlight").arg(&page).arg("--check-links");

    cmd.assert().success().stdout(
        predicate::str::contains(r#"<a href="present.html">p</a>"#)
            .and(predicate::str::contains(r#"<a href="gone.html" class="new">g</a>"#))
            .and(predicate::str::contains("<pre>").not()),
    );
}

#[test]
fn errors_as_json() {
    let dir = TempDir::new().unwrap();
    let log = fixture(&dir, "build.log", "x.c:4: error: boom\nnoise\n");
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("errors").arg(&log).arg("--to").arg("json");

    cmd.assert().success().stdout(
        predicate::str::contains(r#""file": "x.c""#)
            .and(predicate::str::contains(r#""line": 4"#))
            .and(predicate::str::contains("noise").not()),
    );
}

#[test]
fn feed_rows_newest_first_without_invalid_posts() {
    let dir = TempDir::new().unwrap();
    let mbox = fixture(&dir, "list.mbox", MBOX);
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("feed").arg(&mbox).arg("--to").arg("rows");

    let output = cmd.assert().success().get_output().stdout.clone();
    let rows = String::from_utf8(output).unwrap();
    assert_eq!(rows.lines().count(), 2);
    assert!(rows.lines().next().unwrap().contains("Re: Older"));
    assert!(!rows.contains("No author"));
}

#[test]
fn feed_pages() {
    let dir = TempDir::new().unwrap();
    let mbox = fixture(&dir, "list.mbox", MBOX);
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("feed")
        .arg(&mbox)
        .arg("--to")
        .arg("json")
        .arg("--page")
        .arg("1")
        .arg("--page-length")
        .arg("1");

    cmd.assert().success().stdout(
        predicate::str::contains(r#""guid":"older@example.org""#)
            .and(predicate::str::contains("newer@example.org").not()),
    );
}

#[test]
fn feed_rss_escapes_content() {
    let dir = TempDir::new().unwrap();
    let mbox = fixture(&dir, "list.mbox", MBOX);
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("feed")
        .arg(&mbox)
        .arg("--to")
        .arg("rss")
        .arg("--title")
        .arg("List");

    cmd.assert().success().stdout(
        predicate::str::contains("<title>List</title>")
            .and(predicate::str::contains("Second &lt;body&gt;."))
            .and(predicate::str::ends_with("</rss>\n")),
    );
}

#[test]
fn feed_index_counts_threads() {
    let dir = TempDir::new().unwrap();
    let mbox = fixture(&dir, "list.mbox", MBOX);
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("feed")
        .arg(&mbox)
        .arg("--to")
        .arg("index")
        .arg("--order")
        .arg("subject");

    cmd.assert().success().stdout("older\t2\n");
}

#[test]
fn feed_selects_tags() {
    let dir = TempDir::new().unwrap();
    let mbox = fixture(&dir, "list.mbox", MBOX);
    let mut cmd = cargo_bin_cmd!("semilla");
    cmd.arg("feed")
        .arg(&mbox)
        .arg("--to")
        .arg("json")
        .arg("--order")
        .arg("tag")
        .arg("--select")
        .arg("notes");

    cmd.assert().success().stdout(
        predicate::str::contains("older@example.org")
            .and(predicate::str::contains("newer@example.org").not()),
    );
}
