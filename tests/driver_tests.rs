use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn textsearch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_textsearch"))
}

#[test]
fn test_find_lists_matches_with_lines() -> Result<()> {
    let temp_dir = tempdir()?;
    let file_path = temp_dir.path().join("story.txt");
    let mut file = File::create(&file_path)?;
    write!(file, "the cat sat\non the\ncat mat")?;

    let output = textsearch()
        .args(["find", "cat"])
        .arg(&file_path)
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Found 2 matches:"));
    assert!(stdout.contains(":1: 4-7 cat"));
    assert!(stdout.contains(":3: 19-22 cat"));

    Ok(())
}

#[test]
fn test_find_json_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let file_path = temp_dir.path().join("story.txt");
    let mut file = File::create(&file_path)?;
    writeln!(file, "Cat cot cut")?;

    let output = textsearch()
        .args(["find", "c#t", "--case-sensitive", "--json"])
        .arg(&file_path)
        .output()?;
    assert!(output.status.success());

    let found: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let starts: Vec<u64> = found
        .as_array()
        .expect("an array of matches")
        .iter()
        .filter_map(|m| m["start"].as_u64())
        .collect();
    assert_eq!(starts, vec![4, 8]);

    Ok(())
}

#[test]
fn test_find_wildcard_only_pattern() -> Result<()> {
    let temp_dir = tempdir()?;
    let file_path = temp_dir.path().join("story.txt");
    let mut file = File::create(&file_path)?;
    writeln!(file, "anything")?;

    let output = textsearch().args(["find", "*"]).arg(&file_path).output()?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("No matches found."));

    Ok(())
}

#[test]
fn test_find_missing_file_fails() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = textsearch()
        .args(["find", "cat"])
        .arg(temp_dir.path().join("missing.txt"))
        .output()?;
    assert!(!output.status.success());

    Ok(())
}

#[test]
fn test_monkey_session_script() -> Result<()> {
    let mut child = textsearch()
        .arg("monkey")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("piped stdin");
        writeln!(stdin, "TEXT the cat sat on the cat mat")?;
        writeln!(stdin, "SEARCH cat")?;
        writeln!(stdin, "SEARCH cat")?;
        writeln!(stdin, "SEARCH cat")?;
        writeln!(stdin, "SEARCH -b cat")?;
        writeln!(stdin, "SEARCH *")?;
        writeln!(stdin, "CLOSE")?;
        writeln!(stdin, "QUIT")?;
    }

    let output = child.wait_with_output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let results: Vec<&str> = stdout.lines().filter(|l| l.starts_with("RESULT")).collect();
    assert_eq!(
        results,
        vec![
            "RESULT matches=2 current=4-7 rebuilt=true",
            "RESULT matches=2 current=19-22 rebuilt=false",
            "RESULT matches=2 current=19-22 rebuilt=false",
            "RESULT matches=2 current=4-7 rebuilt=false",
            "RESULT matches=0 current=none rebuilt=false",
        ]
    );
    assert!(stdout.contains("EVENT FORWARD OFF"));
    assert!(stdout.contains("EVENT SCROLL RESET"));
    assert!(stdout.contains("CLOSED"));

    Ok(())
}

#[test]
fn test_monkey_search_without_document() -> Result<()> {
    let mut child = textsearch()
        .arg("monkey")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("piped stdin");
        writeln!(stdin, "SEARCH cat")?;
    }

    let output = child.wait_with_output()?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("ERROR no document"));

    Ok(())
}

#[test]
fn test_monkey_bad_load_keeps_running() -> Result<()> {
    let temp_dir = tempdir()?;
    let mut child = textsearch()
        .arg("monkey")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("piped stdin");
        writeln!(stdin, "TEXT the cat")?;
        writeln!(stdin, "LOAD {}", temp_dir.path().join("missing.txt").display())?;
        writeln!(stdin, "SEARCH cat")?;
        writeln!(stdin, "TEXT a cat and a cat")?;
        writeln!(stdin, "SEARCH cat")?;
        writeln!(stdin, "QUIT")?;
    }

    let output = child.wait_with_output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("ERROR Failed to read file"));
    let results: Vec<&str> = stdout.lines().filter(|l| l.starts_with("RESULT")).collect();
    assert_eq!(
        results,
        vec![
            // searched the document loaded before the failed LOAD
            "RESULT matches=1 current=4-7 rebuilt=true",
            "RESULT matches=2 current=2-5 rebuilt=true",
        ]
    );

    Ok(())
}

#[test]
fn test_monkey_json_lines() -> Result<()> {
    let mut child = textsearch()
        .args(["monkey", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("piped stdin");
        writeln!(stdin, "TEXT the cat")?;
        writeln!(stdin, "SEARCH cat")?;
        writeln!(stdin, "SEARCH *")?;
        writeln!(stdin, "CLOSE")?;
        writeln!(stdin, "BOGUS")?;
    }

    let output = child.wait_with_output()?;
    assert!(output.status.success());

    let lines = String::from_utf8(output.stdout)?
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<Vec<serde_json::Value>, _>>()?;

    assert_eq!(lines[0], serde_json::json!({ "loaded": { "lines": 1 } }));
    assert!(lines.contains(&serde_json::json!({ "event": { "type": "add_recent", "value": "cat" } })));
    assert!(lines.contains(&serde_json::json!({ "event": { "type": "status", "value": true } })));
    assert!(lines.contains(&serde_json::json!({ "event": { "type": "scroll", "value": null } })));
    assert!(lines.contains(&serde_json::json!("closed")));
    assert_eq!(
        lines.last(),
        Some(&serde_json::json!({ "error": "unknown command BOGUS" }))
    );

    let scroll = lines
        .iter()
        .find_map(|l| l["event"]["value"].as_object().filter(|v| v.contains_key("x0")))
        .expect("a scroll to the first match");
    assert!(scroll["x1"].as_i64() > scroll["x0"].as_i64());

    let results: Vec<&serde_json::Value> = lines.iter().filter_map(|l| l.get("result")).collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["rebuilt"], true);
    assert_eq!(results[0]["match_count"], 1);
    assert_eq!(results[0]["current"]["start"], 4);
    assert_eq!(results[0]["current"]["end"], 7);
    assert_eq!(results[0]["current"]["start_anchor"], serde_json::Value::Null);
    assert_eq!(results[1]["match_count"], 0);
    assert_eq!(results[1]["current"], serde_json::Value::Null);

    Ok(())
}

#[test]
fn test_find_offsets_follow_replaced_invalid_utf8() -> Result<()> {
    let temp_dir = tempdir()?;
    let file_path = temp_dir.path().join("latin1.txt");
    std::fs::write(&file_path, b"\xffcat")?;

    let output = textsearch().args(["find", "cat"]).arg(&file_path).output()?;
    assert!(output.status.success());

    // the invalid byte became the three byte U+FFFD
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains(":1: 3-6 cat"));

    Ok(())
}
