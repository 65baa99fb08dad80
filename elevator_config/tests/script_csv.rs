use std::fs;

use elevator_config::{ScriptAction, ScriptStep, load_script_csv};
use tempfile::tempdir;

fn write_script(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("script.csv");
    fs::write(&path, body).unwrap();
    (dir, path)
}

#[test]
fn parses_every_kind() {
    let (_dir, path) = write_script(
        "at_ms,kind,value\n0,destination,2\n10,button,0\n10,key,3\n2500,speed,slow\n2600,speed,fast\n",
    );
    let steps = load_script_csv(&path).unwrap();
    assert_eq!(
        steps,
        vec![
            ScriptStep { at_ms: 0, action: ScriptAction::Destination(2) },
            ScriptStep { at_ms: 10, action: ScriptAction::Button(0) },
            ScriptStep { at_ms: 10, action: ScriptAction::Key('3') },
            ScriptStep { at_ms: 2500, action: ScriptAction::Speed(false) },
            ScriptStep { at_ms: 2600, action: ScriptAction::Speed(true) },
        ]
    );
}

#[test]
fn rejects_wrong_headers() {
    let (_dir, path) = write_script("time,kind,value\n0,button,1\n");
    let err = load_script_csv(&path).unwrap_err();
    assert!(err.to_string().contains("must have headers 'at_ms,kind,value'"));
}

#[test]
fn rejects_time_going_backwards() {
    let (_dir, path) = write_script("at_ms,kind,value\n100,button,1\n50,button,2\n");
    let err = load_script_csv(&path).unwrap_err();
    assert!(err.to_string().contains("non-decreasing"), "{err}");
}

#[test]
fn rejects_unknown_kind_and_bad_floor() {
    let (_dir, path) = write_script("at_ms,kind,value\n0,teleport,1\n");
    assert!(load_script_csv(&path).unwrap_err().to_string().contains("unknown kind"));

    let (_dir, path) = write_script("at_ms,kind,value\n0,destination,7\n");
    assert!(load_script_csv(&path).unwrap_err().to_string().contains("floor 0..=3"));
}

#[test]
fn rejects_non_numeric_time() {
    let (_dir, path) = write_script("at_ms,kind,value\nsoon,button,1\n");
    let err = load_script_csv(&path).unwrap_err();
    assert!(err.to_string().contains("invalid CSV row 2"), "{err}");
}
