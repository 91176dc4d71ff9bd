use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "REF_AREA_NAME,FREQ_ID,FREQ_NAME,TIME_PERIOD,OBS_VALUE,UNIT_MEASURE_NAME";

const INPUT: &str = "\
DATASET,REF_AREA_ID,REF_AREA_NAME,INDICATOR_NAME,FREQ_ID,FREQ_NAME,TIME_PERIOD,OBS_VALUE,UNIT_MEASURE_NAME,OBS_STATUS
IMF.STA:FSI,ESP,Spain,Nominal GDP,A,Annual,2019,1245513.0,Domestic currency,A
IMF.STA:FSI,FRA,France,Nominal GDP,A,Annual,2019,2437635.0,Domestic currency,A
IMF.STA:FSI,ESP,Spain,Nominal GDP,A,Annual,2020,1119010.0,Domestic currency,A
IMF.STA:FSI,KOR,\"Korea, Rep.\",Nominal GDP,A,Annual,2020,1940726.2,Domestic currency,A
IMF.STA:FSI,ESP,spain,Nominal GDP,A,Annual,2021,1.0,Domestic currency,A
IMF.STA:FSI,ESP,Spain ,Nominal GDP,A,Annual,2021,2.0,Domestic currency,A
";

fn command(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("country-extract").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn setup(input_name: &str, content: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(input_name), content).unwrap();
    temp_dir
}

#[test]
fn extracts_with_default_arguments() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", INPUT);

    command(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully extracted 2 rows for Spain"))
        .stdout(predicate::str::contains(
            "Output saved to: spain_gdp_imf_data.csv",
        ));

    let content = fs::read_to_string(temp_dir.path().join("spain_gdp_imf_data.csv")).unwrap();
    let expected = format!(
        "{}\nSpain,A,Annual,2019,1245513.0,Domestic currency\nSpain,A,Annual,2020,1119010.0,Domestic currency\n",
        HEADER
    );
    assert_eq!(content, expected);
}

#[test]
fn extracts_with_positional_arguments() {
    let temp_dir = setup("data.csv", INPUT);

    command(temp_dir.path())
        .args(["Korea, Rep.", "korea.csv", "data.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully extracted 1 rows for Korea, Rep."));

    let content = fs::read_to_string(temp_dir.path().join("korea.csv")).unwrap();
    assert_eq!(
        content,
        format!(
            "{}\n\"Korea, Rep.\",A,Annual,2020,1940726.2,Domestic currency\n",
            HEADER
        )
    );
}

#[test]
fn no_match_writes_header_only() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", INPUT);

    command(temp_dir.path())
        .args(["Atlantis", "atlantis.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully extracted 0 rows for Atlantis"));

    let content = fs::read_to_string(temp_dir.path().join("atlantis.csv")).unwrap();
    assert_eq!(content, format!("{}\n", HEADER));
}

#[test]
fn header_only_input_succeeds() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", &format!("{}\n", HEADER));

    command(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully extracted 0 rows for Spain"));

    let content = fs::read_to_string(temp_dir.path().join("spain_gdp_imf_data.csv")).unwrap();
    assert_eq!(content, format!("{}\n", HEADER));
}

#[test]
fn overwrites_existing_output() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", INPUT);
    let output = temp_dir.path().join("france.csv");
    fs::write(&output, "old,data\n1,2\n3,4\n5,6\n").unwrap();

    command(temp_dir.path())
        .args(["France", "france.csv"])
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.starts_with(HEADER));
    assert!(!content.contains("old,data"));
}

#[test]
fn missing_input_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    command(temp_dir.path())
        .args(["Spain", "out.csv", "missing.csv"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("File 'missing.csv' not found."));

    assert!(!temp_dir.path().join("out.csv").exists());
}

#[test]
fn missing_column_fails() {
    let temp_dir = setup(
        "IMF_FSI_NGDP.csv",
        "REF_AREA_NAME,FREQ_ID,FREQ_NAME,TIME_PERIOD,UNIT_MEASURE_NAME\nSpain,A,Annual,2020,Percent\n",
    );

    command(temp_dir.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Column 'OBS_VALUE' not found"));

    assert!(!temp_dir.path().join("spain_gdp_imf_data.csv").exists());
}

#[test]
fn malformed_csv_fails_generically() {
    let temp_dir = setup(
        "IMF_FSI_NGDP.csv",
        &format!("{}\nSpain,A,Annual,2020\n", HEADER),
    );

    command(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Malformed CSV"));

    assert!(!temp_dir.path().join("spain_gdp_imf_data.csv").exists());
}

#[test]
fn missing_output_directory_fails_generically() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", INPUT);

    command(temp_dir.path())
        .args(["Spain", "no_such_dir/out.csv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to write no_such_dir/out.csv"));
}

#[test]
fn dry_run_writes_nothing() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", INPUT);

    command(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: 2 rows for Spain would be extracted"));

    assert!(!temp_dir.path().join("spain_gdp_imf_data.csv").exists());
}

#[test]
fn json_output_reports_counts() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", INPUT);

    let output = command(temp_dir.path())
        .args(["France", "fr.csv", "--output-format", "json", "--quiet"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["country"], "France");
    assert_eq!(report["rows_read"], 6);
    assert_eq!(report["rows_written"], 1);
    assert_eq!(report["output_path"], "fr.csv");
}

#[test]
fn config_file_changes_defaults() {
    let temp_dir = setup("indicators.csv", INPUT);
    fs::write(
        temp_dir.path().join("country-extract.toml"),
        "[defaults]\ncountry = \"France\"\ninput_path = \"indicators.csv\"\noutput_path = \"fr.csv\"\n\n\
         [schema]\ncolumns = [\"TIME_PERIOD\", \"OBS_VALUE\"]\n",
    )
    .unwrap();

    command(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully extracted 1 rows for France"));

    let content = fs::read_to_string(temp_dir.path().join("fr.csv")).unwrap();
    assert_eq!(content, "TIME_PERIOD,OBS_VALUE\n2019,2437635.0\n");
}

#[test]
fn discovered_config_file_is_announced() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", INPUT);
    fs::write(
        temp_dir.path().join("country-extract.toml"),
        "[schema]\ncolumns = [\"TIME_PERIOD\", \"OBS_VALUE\"]\n",
    )
    .unwrap();

    command(temp_dir.path())
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Using configuration file country-extract.toml",
        ))
        .stdout(predicate::str::contains(
            "output columns to TIME_PERIOD, OBS_VALUE",
        ));

    command(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Using configuration file").not());
}

#[test]
fn invalid_config_file_fails() {
    let temp_dir = setup("IMF_FSI_NGDP.csv", INPUT);
    fs::write(temp_dir.path().join("bad.toml"), "[schema]\ncolumns = []\n").unwrap();

    command(temp_dir.path())
        .args(["--config", "bad.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn generate_config_writes_sample() {
    let temp_dir = TempDir::new().unwrap();

    command(temp_dir.path())
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(temp_dir.path().join("country-extract.toml")).unwrap();
    assert!(content.contains("REF_AREA_NAME"));
}
