use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_autodqm"))
}

fn repo_root() -> PathBuf {
    // crates/dqm-cli -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    repo_root().join("tests/fixtures").join(name)
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("autodqm_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn read_json(path: &PathBuf) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[test]
fn compare_with_run_config() {
    let pairs = fixture_path("pairs_basic.json");
    let config = fixture_path("run_config.yaml");
    assert!(pairs.exists(), "missing fixture: {}", pairs.display());

    let out_path = tmp_path("compare.json");
    let out = run(&[
        "compare",
        "--input",
        pairs.to_string_lossy().as_ref(),
        "--config",
        config.to_string_lossy().as_ref(),
        "--output",
        out_path.to_string_lossy().as_ref(),
        "--threads",
        "1",
    ]);
    assert!(
        out.status.success(),
        "compare should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let v = read_json(&out_path);
    let response = &v["response"];
    assert_eq!(response["status"], "success");
    assert!(response["fail_reason"].is_null());
    assert!(v["duration"].as_f64().unwrap() >= 0.0);

    // Input order, then comparator order; not-applicable pairs are skipped.
    let results = response["payload"]["results"].as_array().unwrap();
    let order: Vec<(&str, &str)> = results
        .iter()
        .map(|r| (r["data_name"].as_str().unwrap(), r["comparator"].as_str().unwrap()))
        .collect();
    assert_eq!(
        order,
        vec![("hORecHits", "pull_values"), ("hSnhits", "ks_test"), ("hOStrips", "pull_values")]
    );

    // Scaled data matches the reference exactly.
    assert_eq!(results[0]["is_outlier"], false);
    assert_eq!(results[0]["info"]["Chi_Squared"], 0.0);
    assert_eq!(results[0]["plot"]["kind"], "pull_map");
    assert_eq!(results[0]["plot"]["cap"], 10.0);
    assert_eq!(results[0]["plot"]["x_labels"][0], "ME+1/1");

    assert_eq!(results[1]["info"]["KS_Val"], 0.0);
    assert_eq!(results[1]["is_outlier"], false);

    assert_eq!(results[2]["is_outlier"], true);
    assert!(results[2]["info"]["Max_Pull_Val"].as_f64().unwrap().abs() > 20.0);

    let summary = &response["payload"]["summary"];
    assert_eq!(summary["schema_version"], "autodqm_summary_v0");
    assert_eq!(summary["meta"]["n_outliers"], 1);
    assert_eq!(summary["entries"][0]["data_name"], "hOStrips");

    let times = response["payload"]["times"].as_object().unwrap();
    assert!(times.contains_key("load_pairs0"));
    assert!(times.contains_key("pull_values_hOStrips_0"));
    assert!(response["payload"].get("figures").is_none());
}

#[test]
fn compare_single_comparator_with_figures() {
    let pairs = fixture_path("pairs_basic.json");
    let out_path = tmp_path("compare_ks.json");
    let out = run(&[
        "compare",
        "--input",
        pairs.to_string_lossy().as_ref(),
        "--comparator",
        "ks_test",
        "--figures",
        "--output",
        out_path.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let v = read_json(&out_path);
    let payload = &v["response"]["payload"];
    let results = payload["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["data_name"], "hSnhits");

    let figures = payload["figures"].as_array().unwrap();
    assert_eq!(figures.len(), 1);
    assert_eq!(figures[0]["layout"]["title"], "hSnhits KS Test 300811 | 301531");
    assert_eq!(figures[0]["traces"][0]["type"], "bar");
}

#[test]
fn compare_invalid_histogram_fails() {
    let pairs = fixture_path("pairs_bad_shape.json");
    let out_path = tmp_path("compare_bad.json");
    let out = run(&[
        "compare",
        "--input",
        pairs.to_string_lossy().as_ref(),
        "--output",
        out_path.to_string_lossy().as_ref(),
    ]);
    assert!(!out.status.success(), "malformed histogram must fail");

    let v = read_json(&out_path);
    assert_eq!(v["response"]["status"], "fail");
    let reason = v["response"]["fail_reason"].as_str().unwrap();
    assert!(reason.contains("pairs_bad_shape.json"), "reason={reason}");
    assert!(v["response"]["payload"]["results"].as_array().unwrap().is_empty());
}

#[test]
fn compare_unknown_comparator_fails() {
    let pairs = fixture_path("pairs_basic.json");
    let input = pairs.to_string_lossy();
    let out = run(&["compare", "--input", input.as_ref(), "--comparator", "chi2"]);
    assert!(!out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["response"]["status"], "fail");
    assert!(v["response"]["fail_reason"].as_str().unwrap().contains("chi2"));
}

#[test]
fn comparators_lists_builtins() {
    let out = run(&["comparators"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let names: Vec<&str> = stdout.lines().collect();
    assert_eq!(names, vec!["pull_values", "ks_test"]);
}

#[test]
fn version_prints_crate_version() {
    let out = run(&["version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("autodqm "), "stdout={stdout}");
}
