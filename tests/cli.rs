use assert_cmd::cargo;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HELLO: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

fn source_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write source file");
    path
}

#[test]
fn test_emit_prints_go() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = source_file(&dir, "clear.bf", "+++[-].");

    let assert = cargo::cargo_bin_cmd!("bfgo")
        .arg("emit")
        .arg(&src)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    assert!(stdout.starts_with("package main\n"));
    assert!(stdout.contains("\tbuffer[ptr] = 0\n"));
    assert!(stdout.contains("\tout.WriteByte(buffer[ptr])\n"));

    Ok(())
}

#[test]
fn test_export_writes_go_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = source_file(&dir, "hello.bf", HELLO);
    let out = dir.path().join("hello");

    cargo::cargo_bin_cmd!("bfgo")
        .arg("export")
        .arg(&src)
        .arg(&out)
        .assert()
        .success();

    let go = fs::read_to_string(dir.path().join("hello.go"))?;
    assert!(go.contains("func main() {"));
    assert!(go.contains("for buffer[ptr] != 0 {"));

    Ok(())
}

#[test]
fn test_export_tape_size_flag() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = source_file(&dir, "p.bf", "+.");
    let out = dir.path().join("p.go");

    cargo::cargo_bin_cmd!("bfgo")
        .args(["export", "--tape-size", "30000"])
        .arg(&src)
        .arg(&out)
        .assert()
        .success();

    assert!(fs::read_to_string(&out)?.contains("make([]byte, 30000)"));

    Ok(())
}

#[test]
fn test_interpret_hello_world() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = source_file(&dir, "hello.bf", HELLO);

    cargo::cargo_bin_cmd!("bfgo")
        .arg("interpret")
        .arg(&src)
        .assert()
        .success()
        .stdout("Hello World!\n");

    Ok(())
}

#[test]
fn test_interpret_reads_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = source_file(&dir, "cat.bf", ",[.,]");

    // a read past the end leaves the cell alone, so the NUL is what ends the loop
    cargo::cargo_bin_cmd!("bfgo")
        .arg("interpret")
        .arg(&src)
        .write_stdin("echo\0")
        .assert()
        .success()
        .stdout("echo");

    Ok(())
}

#[test]
fn test_saved_ops_can_be_interpreted() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = source_file(&dir, "hello.bf", HELLO);
    let ir = dir.path().join("hello.bfo");

    cargo::cargo_bin_cmd!("bfgo")
        .arg("ops")
        .arg(&src)
        .arg("--emit")
        .arg(&ir)
        .assert()
        .success();

    cargo::cargo_bin_cmd!("bfgo")
        .arg("interpret")
        .arg("--ir")
        .arg(&ir)
        .assert()
        .success()
        .stdout("Hello World!\n");

    Ok(())
}

#[test]
fn test_ops_listing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = source_file(&dir, "p.bf", "[-]>[->+<]");

    let assert = cargo::cargo_bin_cmd!("bfgo")
        .arg("ops")
        .arg(&src)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    assert!(stdout.contains("0000 CLEAR"));
    assert!(stdout.contains("0002 LOOP   (↔ 0007)"));

    Ok(())
}

#[test]
fn test_ops_raw_listing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = source_file(&dir, "p.bf", "+++\n>.");

    cargo::cargo_bin_cmd!("bfgo")
        .args(["ops", "--raw", "--no-color"])
        .arg(&src)
        .assert()
        .success()
        .stdout(
            "[01:01] ARITH  IncrementCell(3)\n\
             [02:01] MOVE   MovePtrForward(1)\n\
             [02:02] IO     OutputCell\n",
        );

    Ok(())
}

#[rstest]
#[case::extra_close("+]", "mismatched loop close")]
#[case::unclosed("[+", "unclosed loop")]
#[case::empty("only comments", "no instructions")]
fn test_bad_programs_fail(#[case] program: &str, #[case] message: &str) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let src = source_file(&dir, "bad.bf", program);
    let out = dir.path().join("bad");

    let assert = cargo::cargo_bin_cmd!("bfgo")
        .arg("export")
        .arg(&src)
        .arg(&out)
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains(message), "stderr was: {}", stderr);
    assert!(!dir.path().join("bad.go").exists());
}

#[test]
fn test_extra_loop_close_shows_its_own_help() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let src = source_file(&dir, "bad.bf", "+]");

    let assert = cargo::cargo_bin_cmd!("bfgo")
        .arg("emit")
        .arg(&src)
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("remove the extra ']'"), "stderr was: {}", stderr);
    assert!(!stderr.contains("needs a matching ']'"), "stderr was: {}", stderr);
}

#[test]
fn test_missing_source_file() {
    cargo::cargo_bin_cmd!("bfgo")
        .args(["emit", "/no/such/program.bf"])
        .assert()
        .failure();
}
