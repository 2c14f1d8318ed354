// Integration tests driving the real `fruitdex` binary against scratch storage.
//
// Run with: cargo test -p fruitdex-cli --test cli_tests

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn fruitdex() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fruitdex"));
    cmd.env_remove("FRUITDEX_STORAGE");
    cmd.env_remove("FRUITDEX_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str], storage: &Path) -> Output {
    fruitdex()
        .args(args)
        .arg("--storage")
        .arg(storage)
        .output()
        .expect("run fruitdex")
}

fn write(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read(dir: &Path, name: &str) -> Value {
    serde_json::from_str(&std::fs::read_to_string(dir.join(name)).unwrap()).unwrap()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// Storage with a primary fruit list and an empty info document: no diagnostics.
fn clean_storage() -> TempDir {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "data_bfv_fruits.json",
        &json!([
            {"name": "Flame", "regValue": 250000, "permValue": 4000000, "rarity": "Uncommon"},
            {"name": "Ice", "regValue": 300000, "rarity": "Uncommon"}
        ]),
    );
    write(dir.path(), "info.json", &json!([]));
    write(dir.path(), "stock.json", &json!({"normal": ["Flame"], "mirage": ["Ice"]}));
    dir
}

// ===========================================================================
// build
// ===========================================================================

#[test]
fn build_writes_catalog() {
    let dir = clean_storage();
    let out = run(&["build"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(out.stdout.is_empty(), "stdout must stay empty without --json");

    let all = read(dir.path(), "all.json");
    let obj = all.as_object().unwrap();
    for key in ["stock", "fruits", "gamepasses", "specials"] {
        assert!(obj.contains_key(key), "missing '{key}'");
    }
    assert_eq!(all["stock"]["normal"], json!(["Flame"]));
    let names: Vec<&str> = all["fruits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Flame", "Ice"]);
    assert_eq!(all["fruits"][0]["permValue"], 4000000);
    assert!(stderr(&out).contains("2 fruits"));
}

#[test]
fn build_json_is_single_document() {
    let dir = clean_storage();
    let out = run(&["build", "--json"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let doc: Value = serde_json::from_str(stdout.trim()).expect("stdout must be one JSON value");
    assert_eq!(doc["summary"]["fruits"], 2);
    assert_eq!(doc["summary"]["unresolved"], 0);
    assert_eq!(doc["report"]["mismatches"], json!([]));
    assert!(doc["output"].as_str().unwrap().ends_with("all.json"));
}

#[test]
fn build_output_flag_redirects_catalog() {
    let dir = clean_storage();
    let target = dir.path().join("out").join("catalog.json");
    let out = run(&["build", "--output", target.to_str().unwrap()], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(target.is_file());
    assert!(!dir.path().join("all.json").exists());
}

#[test]
fn build_falls_back_to_embedded_seed() {
    let dir = tempdir().unwrap();
    write(dir.path(), "data_bfv_fruits.json", &json!([{"name": "Flame", "regValue": 1}]));
    let out = run(&["build", "--json"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let all = read(dir.path(), "all.json");
    let fruits = all["fruits"].as_array().unwrap();
    assert!(fruits.len() > 1);
    assert!(fruits.iter().any(|f| f["name"] == "East Dragon"));
    assert!(!fruits.iter().any(|f| f["name"] == "Dragon"));
}

#[test]
fn build_without_primary_is_io_error() {
    let dir = tempdir().unwrap();
    let out = run(&["build"], dir.path());
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("data_bfv_fruits.json"));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn build_with_malformed_primary_is_source_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("data_bfv_fruits.json"), "{not json").unwrap();
    let out = run(&["build"], dir.path());
    assert_eq!(out.status.code(), Some(5));
}

#[test]
fn strict_build_fails_on_unresolved_listing() {
    let dir = clean_storage();
    write(dir.path(), "data_bfv_skins.json", &json!([{"name": "Glacier Rift", "regValue": 5}]));

    let relaxed = run(&["build"], dir.path());
    assert!(relaxed.status.success(), "stderr: {}", stderr(&relaxed));
    assert!(stderr(&relaxed).contains("Glacier Rift"));

    let strict = run(&["build", "--strict"], dir.path());
    assert_eq!(strict.status.code(), Some(6));
    assert!(dir.path().join("all.json").is_file());
}

#[test]
fn strict_build_passes_when_clean() {
    let dir = clean_storage();
    let out = run(&["build", "--strict"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));
}

#[test]
fn build_with_invalid_config_fails_before_writing() {
    let dir = clean_storage();
    let config = dir.path().join("catalog.toml");
    std::fs::write(&config, "[bridge]\nsource = \"Dragon\"\nsuccessors = []\n").unwrap();

    let out = run(&["build", "--config", config.to_str().unwrap()], dir.path());
    assert_eq!(out.status.code(), Some(4));
    assert!(!dir.path().join("all.json").exists());
}

#[test]
fn config_from_environment() {
    let dir = clean_storage();
    let config = dir.path().join("catalog.toml");
    std::fs::write(&config, "name = \"ice-only\"\n[aliases]\n\"Flame\" = \"Ice\"\n").unwrap();

    let out = fruitdex()
        .arg("build")
        .env("FRUITDEX_STORAGE", dir.path())
        .env("FRUITDEX_CONFIG", &config)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let all = read(dir.path(), "all.json");
    assert_eq!(all["fruits"].as_array().unwrap().len(), 1);
}

// ===========================================================================
// shape / seed / status
// ===========================================================================

#[test]
fn shape_then_build() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "raw_bfv.json",
        &json!({"items": [
            {"id": 1, "name": "Flame", "category": "Fruits", "regValue": 250000},
            {"id": 2, "name": "2x Mastery", "category": "Gamepasses", "regValue": 100000}
        ]}),
    );
    write(
        dir.path(),
        "raw_fruity.json",
        &json!({
            "fruits": [{"name": "Flame", "values": [{"raw": "350K", "numeric": 350000}, {"raw": "4M", "numeric": 4000000}]}],
            "gamepasses": [{"name": "2x Mastery", "values": [{"raw": "120K", "numeric": 120000}]}]
        }),
    );

    let shaped = run(&["shape"], dir.path());
    assert!(shaped.status.success(), "stderr: {}", stderr(&shaped));
    assert!(dir.path().join("data_bfv_fruits.json").is_file());
    assert_eq!(read(dir.path(), "data_fruity_fruits.json")[0]["regValueNumeric"], 350000);

    write(dir.path(), "info.json", &json!([]));
    let built = run(&["build"], dir.path());
    assert!(built.status.success(), "stderr: {}", stderr(&built));
    let all = read(dir.path(), "all.json");
    assert_eq!(all["fruits"][0]["regValue"], 300000);
    assert_eq!(all["gamepasses"][0]["regValue"], 110000);
}

#[test]
fn shape_rejects_unexpected_dump() {
    let dir = tempdir().unwrap();
    write(dir.path(), "raw_bfv.json", &json!({"fruits": []}));
    let out = run(&["shape"], dir.path());
    assert_eq!(out.status.code(), Some(5));
}

#[test]
fn shape_without_dumps_is_io_error() {
    let dir = tempdir().unwrap();
    let out = run(&["shape"], dir.path());
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn seed_respects_force() {
    let dir = tempdir().unwrap();
    let first = run(&["seed"], dir.path());
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    assert_eq!(read(dir.path(), "info.json").as_array().unwrap().len(), 41);

    write(dir.path(), "info.json", &json!([]));
    let kept = run(&["seed"], dir.path());
    assert!(kept.status.success());
    assert!(stderr(&kept).contains("--force"));
    assert_eq!(read(dir.path(), "info.json"), json!([]));

    let forced = run(&["seed", "--force"], dir.path());
    assert!(forced.status.success());
    assert_eq!(read(dir.path(), "info.json").as_array().unwrap().len(), 41);
}

#[test]
fn status_json_lists_well_known_documents() {
    let dir = clean_storage();
    write(dir.path(), "stock.json", &json!({}));

    let out = run(&["status", "--json"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let doc: Value = serde_json::from_slice(&out.stdout).unwrap();
    let entries = doc.as_array().unwrap();
    assert_eq!(entries.len(), 11);

    let entry = |name: &str| entries.iter().find(|e| e["name"] == name).unwrap().clone();
    assert_eq!(entry("data_bfv_fruits.json")["fresh"], true);
    assert_eq!(entry("stock.json")["fresh"], false);
    assert_eq!(entry("stock.json")["exists"], true);
    assert_eq!(entry("all.json")["exists"], false);
}

#[test]
fn status_rejects_zero_ttl() {
    let dir = tempdir().unwrap();
    let out = run(&["status", "--ttl", "0"], dir.path());
    assert_eq!(out.status.code(), Some(2));
}

// ===========================================================================
// validate
// ===========================================================================

#[test]
fn validate_accepts_default_shape() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("catalog.toml");
    std::fs::write(
        &config,
        r#"
name = "default"

[aliases]
"Lightning" = "Rumble"

[bridge]
source = "Dragon"
successors = ["East Dragon", "West Dragon"]
family = ["Dragon", "East Dragon", "West Dragon"]
"#,
    )
    .unwrap();

    let out = fruitdex().arg("validate").arg(&config).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("valid: catalog 'default'"));
}

#[test]
fn validate_rejects_alias_chain() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("catalog.toml");
    std::fs::write(&config, "[aliases]\n\"Lightning\" = \"Rumble\"\n\"Rumble\" = \"Thunder\"\n")
        .unwrap();

    let out = fruitdex().arg("validate").arg(&config).output().unwrap();
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn validate_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let out = fruitdex()
        .arg("validate")
        .arg(dir.path().join("nope.toml"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn unknown_flag_is_usage_error() {
    let out = fruitdex().args(["build", "--bogus"]).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
}
