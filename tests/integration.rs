use std::path::Path;
use std::process::{Command, Output};

fn uscnav_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_uscnav"));
    cmd.current_dir(Path::new("tests/fixtures").join(fixture));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    uscnav_cmd("library").args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn titles_lists_catalog_in_order() {
    let out = run(&["titles"]);
    assert!(out.status.success(), "titles failed: {}", stderr(&out));
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("Title 5 — GOVERNMENT ORGANIZATION AND EMPLOYEES"));
    assert!(lines[1].contains("Title 7 — AGRICULTURE"));
    assert!(lines[2].contains("Title 9 — ARBITRATION"));
    assert!(lines[3].contains("[not checked out]"));
}

#[test]
fn show_section_by_number_and_identifier() {
    for token in ["101", "§ 101.", "/us/usc/t5/s101"] {
        let out = run(&["show", "Title 5", token]);
        assert!(out.status.success(), "show {token} failed: {}", stderr(&out));
        let text = stdout(&out);
        assert!(
            text.starts_with("Title 5 GOVERNMENT ORGANIZATION AND EMPLOYEES › PART I THE AGENCIES GENERALLY"),
            "unexpected breadcrumbs: {text}"
        );
        assert!(text.contains("§ 101. Executive departments"));
        assert!(text.contains("The Executive departments are: The Department of State."));
        assert!(text.contains("Each officer of an Executive department"));
    }
}

#[test]
fn show_without_section_prints_overview() {
    let out = run(&["show", "5"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.starts_with("Title 5 — GOVERNMENT ORGANIZATION AND EMPLOYEES\n/us/usc/t5\n"));
    assert!(text.contains("  PART I THE AGENCIES GENERALLY"));
}

#[test]
fn missing_section_and_title_exit_one() {
    let out = run(&["show", "5", "999"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), "Section could not be located in this title.");

    let out = run(&["show", "99"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), "Title 99 not found.");
}

#[test]
fn title_without_addressable_sections_says_so() {
    let out = run(&["show", "9", "1"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), "This title has no addressable sections.");

    let out = run(&["show", "9"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("  CHAPTER 1 GENERAL PROVISIONS"));
}

#[test]
fn invalid_title_token_is_an_error() {
    let out = run(&["show", "§ ."]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Invalid Title"));
}

#[test]
fn placeholder_title_reports_lfs_notice() {
    let out = run(&["toc", "42"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Git LFS storage"));
}

#[test]
fn broken_title_is_a_malformed_xml_error() {
    let out = run(&["show", "7", "1"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Malformed XML"));
}

#[test]
fn toc_is_indented_by_depth() {
    let out = run(&["toc", "5"]);
    assert!(out.status.success());
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "Title 5 GOVERNMENT ORGANIZATION AND EMPLOYEES",
            "  PART I THE AGENCIES GENERALLY",
            "    CHAPTER 1 ORGANIZATION",
            "      § 101. Executive departments",
            "      § 102. Military departments",
        ]
    );
}

#[test]
fn search_reports_matches_skipped_and_failed() {
    let out = run(&["search", "OFFICER"]);
    assert!(out.status.success(), "search failed: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Title 5 § 101 Executive departments"));
    assert!(text.contains("[officer]"));
    assert!(text.contains("-> /us/usc/t5/s101"));
    assert!(text.contains("Skipped (content stored via Git LFS): Title 42"));
    assert!(text.contains("Unable to search: Title 7"));
}

#[test]
fn search_json_has_all_buckets() {
    let out = run(&["search", "officer", "--json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["query"], "officer");

    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["identifier"], "/us/usc/t5/s101");
    assert_eq!(matches[0]["title"]["number"], "5");

    let skipped = json["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["file"], "usc/usc42.xml");

    let failed = json["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["file"], "usc/usc07.xml");
}

#[test]
fn search_without_matches_exits_one() {
    let out = run(&["search", "nonexistent"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("No matches for \"nonexistent\"."));

    let out = run(&["search", "   "]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Empty Query"));
}

#[test]
fn link_then_open_shows_the_section() {
    let out = run(&["link", "5", "§ 101.", "--base", "https://example.org/usc/"]);
    assert!(out.status.success(), "link failed: {}", stderr(&out));
    let link = stdout(&out).trim().to_string();
    assert_eq!(link, "https://example.org/usc/?t=5&s=101");

    let out = run(&["open", &link]);
    assert!(out.status.success(), "open failed: {}", stderr(&out));
    assert!(stdout(&out).contains("§ 101. Executive departments"));

    let out = run(&["open", "?title=/us/usc/t5&section=/us/usc/t5/s102"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("The military departments are"));
}

#[test]
fn catalog_rebuilds_from_xml() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = Path::new("tests/fixtures/library");
    std::fs::create_dir_all(dir.path().join("usc")).unwrap();
    std::fs::copy(fixture.join(".uscnav.toml"), dir.path().join(".uscnav.toml")).unwrap();
    for name in ["usc05.xml", "usc07.xml", "usc42.xml"] {
        std::fs::copy(fixture.join("usc").join(name), dir.path().join("usc").join(name)).unwrap();
    }

    let out = Command::new(env!("CARGO_BIN_EXE_uscnav")).arg("catalog").current_dir(dir.path()).output().unwrap();
    assert!(out.status.success(), "catalog failed: {}", stderr(&out));

    let raw = std::fs::read_to_string(dir.path().join("data/titles.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json["generated"].as_str().is_some_and(|g| !g.is_empty()));
    let numbers: Vec<&str> = json["titles"].as_array().unwrap().iter().map(|t| t["number"].as_str().unwrap()).collect();
    assert_eq!(numbers, ["5", "7", "42"]);
    assert_eq!(json["titles"][0]["label"], "Title 5");
    assert_eq!(json["titles"][2]["pointer"], true);

    let out = Command::new(env!("CARGO_BIN_EXE_uscnav"))
        .args(["search", "army"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).contains("§ 102 Military departments"));
}
